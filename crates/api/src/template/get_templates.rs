use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::get_templates::{APIResponse, PathParams};
use noshow_domain::{MessageTemplate, ID};
use noshow_infra::NoShowContext;
use tracing::info;

pub async fn get_templates_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetTemplatesUseCase {
        tenant_id: path.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|templates| HttpResponse::Ok().json(APIResponse::new(templates)))
        .map_err(NoShowError::from)
}

/// Lists the templates of a `Tenant`, seeding the defaults the first time
#[derive(Debug)]
pub struct GetTemplatesUseCase {
    pub tenant_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTemplatesUseCase {
    type Response = Vec<MessageTemplate>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTemplates";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.tenants.find(&self.tenant_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.tenant_id.clone()));
        }

        // Two concurrent first reads must not both seed
        let _guard = ctx.tenant_locks.lock(&self.tenant_id).await;
        let templates = ctx
            .repos
            .message_templates
            .find_by_tenant(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !templates.is_empty() {
            return Ok(templates);
        }

        let defaults = MessageTemplate::defaults(&self.tenant_id);
        ctx.repos
            .message_templates
            .bulk_insert(&defaults)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!("Seeded the default templates of tenant: {}", self.tenant_id);

        Ok(defaults)
    }
}
