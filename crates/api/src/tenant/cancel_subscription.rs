use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::cancel_subscription::{APIResponse, PathParams};
use noshow_domain::{Tenant, ID};
use noshow_infra::NoShowContext;

pub async fn cancel_subscription_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = CancelSubscriptionUseCase {
        tenant_id: path.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|tenant| HttpResponse::Ok().json(APIResponse::new(tenant)))
        .map_err(NoShowError::from)
}

/// Remaining credits are kept and can still be spent
#[derive(Debug)]
pub struct CancelSubscriptionUseCase {
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
impl UseCase for CancelSubscriptionUseCase {
    type Response = Tenant;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelSubscription";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let _guard = ctx.tenant_locks.lock(&self.tenant_id).await;
        let mut tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.tenant_id.clone()))?;

        tenant.cancel_subscription();
        ctx.repos
            .tenants
            .save(&tenant)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(tenant)
    }
}
