use crate::{APIResponse, BaseClient, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TenantClient {
    base: Arc<BaseClient>,
}

pub struct CreateTenantInput {
    pub clinic_name: String,
    pub clinic_phone: Option<String>,
}

pub struct RenewBillingPeriodInput {
    pub tenant_id: ID,
    pub renews_at: i64,
}

pub struct SetCalendarConnectionInput {
    pub tenant_id: ID,
    pub calendar_id: String,
    pub access_token: String,
}

impl TenantClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateTenantInput) -> APIResponse<create_tenant::APIResponse> {
        let body = create_tenant::RequestBody {
            clinic_name: input.clinic_name,
            clinic_phone: input.clinic_phone,
        };
        self.base
            .post(body, "tenants".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, tenant_id: ID) -> APIResponse<get_tenant::APIResponse> {
        self.base
            .get(format!("tenants/{}", tenant_id), StatusCode::OK)
            .await
    }

    pub async fn renew_billing_period(
        &self,
        input: RenewBillingPeriodInput,
    ) -> APIResponse<renew_billing_period::APIResponse> {
        let body = renew_billing_period::RequestBody {
            renews_at: input.renews_at,
        };
        self.base
            .post(
                body,
                format!("tenants/{}/billing/renewal", input.tenant_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn cancel_subscription(
        &self,
        tenant_id: ID,
    ) -> APIResponse<cancel_subscription::APIResponse> {
        self.base
            .post(
                (),
                format!("tenants/{}/billing/cancel", tenant_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn set_calendar_connection(
        &self,
        input: SetCalendarConnectionInput,
    ) -> APIResponse<set_calendar_connection::APIResponse> {
        let body = set_calendar_connection::RequestBody {
            calendar_id: input.calendar_id,
            access_token: input.access_token,
        };
        self.base
            .put(
                body,
                format!("tenants/{}/calendar", input.tenant_id),
                StatusCode::OK,
            )
            .await
    }
}
