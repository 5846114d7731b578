use super::dispatch_reminders::send;
use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    credit_ledger::{try_reserve, LedgerError, ReserveOutcome},
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::send_test_reminder::*;
use noshow_domain::{phone, Denial, MessageTemplate, SendRecord, ID};
use noshow_infra::NoShowContext;
use tracing::error;

pub async fn send_test_reminder_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SendTestReminderUseCase {
        tenant_id: path.tenant_id.clone(),
        phone: body.phone,
        template_id: body.template_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|record| HttpResponse::Ok().json(APIResponse::new(record)))
        .map_err(NoShowError::from)
}

/// Sends one message rendered with sample values to an arbitrary number
#[derive(Debug)]
pub struct SendTestReminderUseCase {
    pub tenant_id: ID,
    pub phone: String,
    pub template_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CarrierNotConfigured,
    TenantNotFound(ID),
    TemplateNotFound(ID),
    InvalidPhone(String),
    Denied(Denial),
    /// The carrier refused the message. The failed `SendRecord` is stored.
    SendFailed(String),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CarrierNotConfigured => {
                Self::Misconfigured("The SMS carrier credentials are not configured".into())
            }
            UseCaseError::TenantNotFound(id) => {
                Self::NotFound(format!("The tenant with id: {}, was not found.", id))
            }
            UseCaseError::TemplateNotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::InvalidPhone(phone) => Self::BadClientData(format!(
                "{}. Got: {}",
                phone::OUT_OF_SCOPE_MESSAGE,
                phone
            )),
            UseCaseError::Denied(denial) => Self::Forbidden(denial.to_string()),
            UseCaseError::SendFailed(msg) => {
                Self::BadClientData(format!("The carrier did not accept the message: {}", msg))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

impl SendTestReminderUseCase {
    /// The requested template, or else the default one of the tenant, or else the built in default
    async fn template(&self, ctx: &NoShowContext) -> Result<MessageTemplate, UseCaseError> {
        if let Some(template_id) = &self.template_id {
            return match ctx.repos.message_templates.find(template_id).await {
                Some(template) if template.tenant_id == self.tenant_id => Ok(template),
                _ => Err(UseCaseError::TemplateNotFound(template_id.clone())),
            };
        }

        let templates = ctx
            .repos
            .message_templates
            .find_by_tenant(&self.tenant_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let template = match templates.iter().position(|t| t.is_default) {
            Some(index) => templates.into_iter().nth(index),
            None => templates.into_iter().next(),
        };
        template
            .or_else(|| {
                MessageTemplate::defaults(&self.tenant_id)
                    .into_iter()
                    .find(|t| t.is_default)
            })
            .ok_or(UseCaseError::StorageError)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestReminderUseCase {
    type Response = SendRecord;

    type Error = UseCaseError;

    const NAME: &'static str = "SendTestReminder";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if !ctx.carrier.is_configured() {
            return Err(UseCaseError::CarrierNotConfigured);
        }

        let tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::TenantNotFound(self.tenant_id.clone()))?;
        let recipient =
            phone::normalize(&self.phone).ok_or_else(|| UseCaseError::InvalidPhone(self.phone.clone()))?;
        let template = self.template(ctx).await?;

        let reservation = match try_reserve(&tenant.id, ctx).await {
            Ok(ReserveOutcome::Admitted(reservation)) => reservation,
            Ok(ReserveOutcome::Denied(denial)) => return Err(UseCaseError::Denied(denial)),
            Err(LedgerError::TenantNotFound(id)) => return Err(UseCaseError::TenantNotFound(id)),
        };

        let now = ctx.sys.get_timestamp_millis();
        let vars = super::sample_vars(&tenant, now, &ctx.config.dispatch_timezone);
        // Built in defaults that were never stored are not referenced
        let template_id = ctx
            .repos
            .message_templates
            .find(&template.id)
            .await
            .map(|t| t.id);
        let mut record = SendRecord::new_pending(
            tenant.id.clone(),
            None,
            template_id,
            recipient,
            template.render(&vars),
            now,
        );
        ctx.repos
            .send_records
            .insert(&record)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        match send(&record, ctx).await {
            Ok(message_id) => {
                let mut stored = ctx
                    .repos
                    .send_records
                    .find(&record.id)
                    .await
                    .unwrap_or(record);
                stored.mark_sent(message_id, ctx.sys.get_timestamp_millis());
                ctx.repos
                    .send_records
                    .save(&stored)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                if let Err(e) = reservation.commit(ctx).await {
                    error!(
                        "Unable to spend the credit of tenant: {}. Error: {:?}",
                        tenant.id, e
                    );
                }
                Ok(stored)
            }
            Err(e) => {
                record.mark_failed(e.code(), e.to_string());
                if let Err(e) = ctx.repos.send_records.save(&record).await {
                    error!("Unable to save failed record: {}. Error: {:?}", record.id, e);
                }
                Err(UseCaseError::SendFailed(e.to_string()))
            }
        }
    }
}
