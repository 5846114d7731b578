use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::get_send_records::{APIResponse, PathParams, QueryParams};
use noshow_domain::{SendRecord, ID};
use noshow_infra::NoShowContext;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 100;

pub async fn get_send_records_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    query: web::Query<QueryParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = GetSendRecordsUseCase {
        tenant_id: path.tenant_id.clone(),
        limit: query.limit,
    };

    execute(usecase, &ctx)
        .await
        .map(|records| HttpResponse::Ok().json(APIResponse::new(records)))
        .map_err(NoShowError::from)
}

/// The most recent `SendRecord`s of a tenant, newest first
#[derive(Debug)]
pub struct GetSendRecordsUseCase {
    pub tenant_id: ID,
    pub limit: Option<usize>,
}

#[derive(Debug)]
pub enum UseCaseError {
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
impl UseCase for GetSendRecordsUseCase {
    type Response = Vec<SendRecord>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetSendRecords";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        ctx.repos
            .send_records
            .find_recent_by_tenant(&self.tenant_id, limit)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
