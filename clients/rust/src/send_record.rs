use crate::{APIResponse, BaseClient, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SendRecordClient {
    base: Arc<BaseClient>,
}

impl SendRecordClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Newest first
    pub async fn list(
        &self,
        tenant_id: ID,
        limit: Option<usize>,
    ) -> APIResponse<get_send_records::APIResponse> {
        let query = match limit {
            Some(limit) => format!("?limit={}", limit),
            None => String::new(),
        };
        self.base
            .get(
                format!("tenants/{}/send-records{}", tenant_id, query),
                StatusCode::OK,
            )
            .await
    }
}
