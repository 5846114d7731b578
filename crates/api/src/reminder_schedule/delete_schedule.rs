use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::delete_schedule::{APIResponse, PathParams};
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
use noshow_infra::NoShowContext;

pub async fn delete_schedule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = DeleteScheduleUseCase {
        tenant_id: path.tenant_id.clone(),
        timing: path.timing,
    };

    execute(usecase, &ctx)
        .await
        .map(|schedule| HttpResponse::Ok().json(APIResponse::new(schedule)))
        .map_err(NoShowError::from)
}

#[derive(Debug)]
pub struct DeleteScheduleUseCase {
    pub tenant_id: ID,
    pub timing: ReminderTiming,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID, ReminderTiming),
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id, timing) => Self::NotFound(format!(
                "The tenant with id: {}, has no {} schedule.",
                tenant_id, timing
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteScheduleUseCase {
    type Response = ReminderSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteSchedule";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminder_schedules
            .delete(&self.tenant_id, self.timing)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.tenant_id.clone(), self.timing))
    }
}
