use crate::dtos::TenantDTO;
use noshow_domain::{Tenant, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub tenant: TenantDTO,
}

impl TenantResponse {
    pub fn new(tenant: Tenant) -> Self {
        Self {
            tenant: TenantDTO::new(&tenant),
        }
    }
}

#[derive(Deserialize)]
pub struct TenantPathParams {
    pub tenant_id: ID,
}

pub mod create_tenant {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub clinic_name: String,
        #[serde(default)]
        pub clinic_phone: Option<String>,
    }

    pub type APIResponse = TenantResponse;
}

pub mod get_tenant {
    use super::*;

    pub type PathParams = TenantPathParams;

    pub type APIResponse = TenantResponse;
}

pub mod renew_billing_period {
    use super::*;

    pub type PathParams = TenantPathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Timestamp in millis of the following renewal
        pub renews_at: i64,
    }

    pub type APIResponse = TenantResponse;
}

pub mod cancel_subscription {
    use super::*;

    pub type PathParams = TenantPathParams;

    pub type APIResponse = TenantResponse;
}

pub mod set_calendar_connection {
    use super::*;

    pub type PathParams = TenantPathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub calendar_id: String,
        pub access_token: String,
    }

    pub type APIResponse = TenantResponse;
}
