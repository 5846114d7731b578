use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::get_tenant::{APIResponse, PathParams};
use noshow_domain::{Tenant, ID};
use noshow_infra::NoShowContext;

pub async fn get_tenant_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetTenantUseCase {
        tenant_id: path.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|tenant| HttpResponse::Ok().json(APIResponse::new(tenant)))
        .map_err(NoShowError::from)
}

#[derive(Debug)]
struct GetTenantUseCase {
    pub tenant_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTenantUseCase {
    type Response = Tenant;

    type Error = UseCaseError;

    const NAME: &'static str = "GetTenant";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.tenant_id.clone()))
    }
}
