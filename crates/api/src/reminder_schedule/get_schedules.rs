use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::get_schedules::{APIResponse, PathParams};
use noshow_domain::{ReminderSchedule, ID};
use noshow_infra::NoShowContext;

pub async fn get_schedules_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetSchedulesUseCase {
        tenant_id: path.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|schedules| HttpResponse::Ok().json(APIResponse::new(schedules)))
        .map_err(NoShowError::from)
}

#[derive(Debug)]
struct GetSchedulesUseCase {
    pub tenant_id: ID,
}

#[derive(Debug)]
enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetSchedulesUseCase {
    type Response = Vec<ReminderSchedule>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetSchedules";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminder_schedules
            .find_by_tenant(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
