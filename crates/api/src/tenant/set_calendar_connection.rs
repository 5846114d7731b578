use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::set_calendar_connection::{APIResponse, PathParams, RequestBody};
use noshow_domain::{CalendarConnection, Tenant, ID};
use noshow_infra::NoShowContext;

pub async fn set_calendar_connection_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SetCalendarConnectionUseCase {
        tenant_id: path.tenant_id.clone(),
        calendar_id: body.calendar_id,
        access_token: body.access_token,
    };

    execute(usecase, &ctx)
        .await
        .map(|tenant| HttpResponse::Ok().json(APIResponse::new(tenant)))
        .map_err(NoShowError::from)
}

/// Stores the credentials handed over by the calendar OAuth exchange
pub struct SetCalendarConnectionUseCase {
    pub tenant_id: ID,
    pub calendar_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for SetCalendarConnectionUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetCalendarConnectionUseCase")
            .field("tenant_id", &self.tenant_id)
            .field("calendar_id", &self.calendar_id)
            .finish()
    }
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    MissingCredentials,
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::MissingCredentials => Self::BadClientData(
                "Both the calendar id and the access token are required".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetCalendarConnectionUseCase {
    type Response = Tenant;

    type Error = UseCaseError;

    const NAME: &'static str = "SetCalendarConnection";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let calendar_id = self.calendar_id.trim();
        let access_token = self.access_token.trim();
        if calendar_id.is_empty() || access_token.is_empty() {
            return Err(UseCaseError::MissingCredentials);
        }

        let _guard = ctx.tenant_locks.lock(&self.tenant_id).await;
        let mut tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.tenant_id.clone()))?;

        tenant.calendar = Some(CalendarConnection {
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
        });
        ctx.repos
            .tenants
            .save(&tenant)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(tenant)
    }
}
