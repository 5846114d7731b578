use crate::{APIResponse, BaseClient, ReminderTiming, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ScheduleClient {
    base: Arc<BaseClient>,
}

pub struct UpsertScheduleInput {
    pub tenant_id: ID,
    pub timing: ReminderTiming,
    pub template_id: ID,
    pub enabled: Option<bool>,
}

impl ScheduleClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn list(&self, tenant_id: ID) -> APIResponse<get_schedules::APIResponse> {
        self.base
            .get(format!("tenants/{}/schedules", tenant_id), StatusCode::OK)
            .await
    }

    pub async fn upsert(
        &self,
        input: UpsertScheduleInput,
    ) -> APIResponse<upsert_schedule::APIResponse> {
        let body = upsert_schedule::RequestBody {
            template_id: input.template_id,
            enabled: input.enabled,
        };
        self.base
            .put(
                body,
                format!("tenants/{}/schedules/{}", input.tenant_id, input.timing),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(
        &self,
        tenant_id: ID,
        timing: ReminderTiming,
    ) -> APIResponse<delete_schedule::APIResponse> {
        self.base
            .delete(
                format!("tenants/{}/schedules/{}", tenant_id, timing),
                StatusCode::OK,
            )
            .await
    }
}
