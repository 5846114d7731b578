use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::create_template::{APIResponse, PathParams, RequestBody};
use noshow_domain::{unknown_placeholders, MessageTemplate, ID};
use noshow_infra::NoShowContext;

pub async fn create_template_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateTemplateUseCase {
        tenant_id: path.tenant_id.clone(),
        name: body.name,
        body: body.body,
        is_default: body.is_default.unwrap_or(false),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse::new(res.template, res.unknown_placeholders))
        })
        .map_err(NoShowError::from)
}

#[derive(Debug)]
pub struct CreateTemplateUseCase {
    pub tenant_id: ID,
    pub name: String,
    pub body: String,
    pub is_default: bool,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub template: MessageTemplate,
    pub unknown_placeholders: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    EmptyBody,
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::EmptyBody => {
                Self::BadClientData("The template body can not be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTemplateUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTemplate";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if self.body.trim().is_empty() {
            return Err(UseCaseError::EmptyBody);
        }
        if ctx.repos.tenants.find(&self.tenant_id).await.is_none() {
            return Err(UseCaseError::NotFound(self.tenant_id.clone()));
        }

        let name = match self.name.trim() {
            "" => "Untitled".to_string(),
            name => name.to_string(),
        };
        let mut template = MessageTemplate::new(self.tenant_id.clone(), name, self.body.clone());
        template.is_default = self.is_default;

        // Switching the default and inserting the new one happen as one step per tenant
        let _guard = ctx.tenant_locks.lock(&self.tenant_id).await;
        if template.is_default {
            ctx.repos
                .message_templates
                .unset_default(&self.tenant_id)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        ctx.repos
            .message_templates
            .insert(&template)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseResponse {
            unknown_placeholders: unknown_placeholders(&template.body),
            template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noshow_domain::Tenant;

    async fn setup() -> (NoShowContext, Tenant) {
        let ctx = NoShowContext::create_inmemory();
        let tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        ctx.repos
            .message_templates
            .bulk_insert(&MessageTemplate::defaults(&tenant.id))
            .await
            .unwrap();
        (ctx, tenant)
    }

    #[actix_web::main]
    #[test]
    async fn a_new_default_replaces_the_old_one() {
        let (ctx, tenant) = setup().await;

        let mut usecase = CreateTemplateUseCase {
            tenant_id: tenant.id.clone(),
            name: "Friendly".into(),
            body: "Hey {{patientName}}! See you {{appointmentDate}}.".into(),
            is_default: true,
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert!(res.unknown_placeholders.is_empty());

        let templates = ctx
            .repos
            .message_templates
            .find_by_tenant(&tenant.id)
            .await
            .unwrap();
        assert_eq!(templates.len(), 4);
        let defaults = templates.iter().filter(|t| t.is_default).collect::<Vec<_>>();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, res.template.id);
    }

    #[actix_web::main]
    #[test]
    async fn reports_unknown_placeholders() {
        let (ctx, tenant) = setup().await;

        let mut usecase = CreateTemplateUseCase {
            tenant_id: tenant.id.clone(),
            name: "Typo".into(),
            body: "Hi {{patientNme}}, call {{clinicPhone}}".into(),
            is_default: false,
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res.unknown_placeholders, vec!["patientNme".to_string()]);
        assert!(!res.template.is_default);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_empty_bodies() {
        let (ctx, tenant) = setup().await;

        let mut usecase = CreateTemplateUseCase {
            tenant_id: tenant.id.clone(),
            name: "Empty".into(),
            body: "   ".into(),
            is_default: false,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap_err(), UseCaseError::EmptyBody);
    }
}
