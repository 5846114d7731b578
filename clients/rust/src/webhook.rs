use crate::{APIResponse, BaseClient};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Delivers carrier status callbacks. Mostly useful to exercise a deployment.
#[derive(Clone)]
pub struct WebhookClient {
    base: Arc<BaseClient>,
}

impl WebhookClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn carrier_status(
        &self,
        params: &BTreeMap<String, String>,
        signature: String,
    ) -> APIResponse<carrier_status_callback::APIResponse> {
        self.base
            .post_form(
                params,
                vec![("X-Twilio-Signature", signature)],
                "webhooks/carrier/status".into(),
                StatusCode::OK,
            )
            .await
    }
}
