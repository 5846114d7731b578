use crate::{APIResponse, BaseClient, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppointmentClient {
    base: Arc<BaseClient>,
}

impl AppointmentClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn sync(&self, tenant_id: ID) -> APIResponse<sync_appointments::APIResponse> {
        self.base
            .post(
                (),
                format!("tenants/{}/appointments/sync", tenant_id),
                StatusCode::OK,
            )
            .await
    }
}
