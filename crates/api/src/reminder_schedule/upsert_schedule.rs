use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::upsert_schedule::{APIResponse, PathParams, RequestBody};
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
use noshow_infra::NoShowContext;

pub async fn upsert_schedule_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = UpsertScheduleUseCase {
        tenant_id: path.tenant_id.clone(),
        timing: path.timing,
        template_id: body.template_id.clone(),
        enabled: body.enabled.unwrap_or(true),
    };

    execute(usecase, &ctx)
        .await
        .map(|schedule| HttpResponse::Ok().json(APIResponse::new(schedule)))
        .map_err(NoShowError::from)
}

/// Creates or replaces the single `ReminderSchedule` of a tenant for one timing
#[derive(Debug)]
pub struct UpsertScheduleUseCase {
    pub tenant_id: ID,
    pub timing: ReminderTiming,
    pub template_id: ID,
    pub enabled: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    TenantNotFound(ID),
    TemplateNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::TemplateNotFound(template_id) => Self::BadClientData(format!(
                "The template with id: {}, does not belong to the tenant.",
                template_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpsertScheduleUseCase {
    type Response = ReminderSchedule;

    type Error = UseCaseError;

    const NAME: &'static str = "UpsertSchedule";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.tenants.find(&self.tenant_id).await.is_none() {
            return Err(UseCaseError::TenantNotFound(self.tenant_id.clone()));
        }
        match ctx.repos.message_templates.find(&self.template_id).await {
            Some(template) if template.tenant_id == self.tenant_id => {}
            _ => return Err(UseCaseError::TemplateNotFound(self.template_id.clone())),
        }

        let mut schedule =
            ReminderSchedule::new(self.tenant_id.clone(), self.timing, self.template_id.clone());
        schedule.enabled = self.enabled;

        ctx.repos
            .reminder_schedules
            .upsert(&schedule)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
