use noshow_domain::{SubscriptionState, Tenant, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantDTO {
    pub id: ID,
    pub clinic_name: String,
    pub clinic_phone: Option<String>,
    pub subscription: SubscriptionState,
    pub credits: i64,
    pub billing_renews_at: Option<i64>,
    /// Whether calendar credentials are stored. The credentials themselves are never exposed.
    pub calendar_connected: bool,
    pub created: i64,
}

impl TenantDTO {
    pub fn new(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id.clone(),
            clinic_name: tenant.clinic_name.clone(),
            clinic_phone: tenant.clinic_phone.clone(),
            subscription: tenant.subscription,
            credits: tenant.credits,
            billing_renews_at: tenant.billing_renews_at,
            calendar_connected: tenant.calendar.is_some(),
            created: tenant.created,
        }
    }
}
