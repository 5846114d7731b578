use crate::{APIResponse, BaseClient, ID};
use noshow_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TemplateClient {
    base: Arc<BaseClient>,
}

pub struct CreateTemplateInput {
    pub tenant_id: ID,
    pub name: String,
    pub body: String,
    pub is_default: bool,
}

impl TemplateClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Seeds the default templates the first time it is called for a tenant
    pub async fn list(&self, tenant_id: ID) -> APIResponse<get_templates::APIResponse> {
        self.base
            .get(format!("tenants/{}/templates", tenant_id), StatusCode::OK)
            .await
    }

    pub async fn create(
        &self,
        input: CreateTemplateInput,
    ) -> APIResponse<create_template::APIResponse> {
        let body = create_template::RequestBody {
            name: input.name,
            body: input.body,
            is_default: Some(input.is_default),
        };
        self.base
            .post(
                body,
                format!("tenants/{}/templates", input.tenant_id),
                StatusCode::CREATED,
            )
            .await
    }
}
