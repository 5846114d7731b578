use crate::{APIResponse, BaseClient, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct DispatchClient {
    base: Arc<BaseClient>,
}

pub struct SendTestReminderInput {
    pub tenant_id: ID,
    pub phone: String,
    pub template_id: Option<ID>,
}

impl DispatchClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Triggers one reminder dispatch run over all tenants
    pub async fn dispatch(&self) -> APIResponse<dispatch_reminders::APIResponse> {
        self.base
            .post((), "reminders/dispatch".into(), StatusCode::OK)
            .await
    }

    pub async fn send_test(
        &self,
        input: SendTestReminderInput,
    ) -> APIResponse<send_test_reminder::APIResponse> {
        let body = send_test_reminder::RequestBody {
            phone: input.phone,
            template_id: input.template_id,
        };
        self.base
            .post(
                body,
                format!("tenants/{}/test-send", input.tenant_id),
                StatusCode::OK,
            )
            .await
    }
}
