use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::renew_billing_period::{APIResponse, PathParams, RequestBody};
use noshow_domain::{Tenant, ID};
use noshow_infra::NoShowContext;
use tracing::info;

pub async fn renew_billing_period_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = RenewBillingPeriodUseCase {
        tenant_id: path.tenant_id.clone(),
        renews_at: body.renews_at,
    };

    execute(usecase, &ctx)
        .await
        .map(|tenant| HttpResponse::Ok().json(APIResponse::new(tenant)))
        .map_err(NoShowError::from)
}

/// A billing period was paid for. Resets the credits to the plan allotment.
#[derive(Debug)]
pub struct RenewBillingPeriodUseCase {
    pub tenant_id: ID,
    pub renews_at: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    RenewalInThePast(i64),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::RenewalInThePast(renews_at) => Self::BadClientData(format!(
                "The next renewal: {} must be in the future",
                renews_at
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RenewBillingPeriodUseCase {
    type Response = Tenant;

    type Error = UseCaseError;

    const NAME: &'static str = "RenewBillingPeriod";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if self.renews_at <= ctx.sys.get_timestamp_millis() {
            return Err(UseCaseError::RenewalInThePast(self.renews_at));
        }

        // Credits must not change under an admitted send
        let _guard = ctx.tenant_locks.lock(&self.tenant_id).await;
        let mut tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.tenant_id.clone()))?;

        tenant.renew_billing_period(ctx.config.plan_credits, self.renews_at);
        ctx.repos
            .tenants
            .save(&tenant)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Tenant: {} renewed its billing period with {} credits",
            tenant.id, tenant.credits
        );

        Ok(tenant)
    }
}
