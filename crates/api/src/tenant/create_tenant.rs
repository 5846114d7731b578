use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::create_tenant::{APIResponse, RequestBody};
use noshow_domain::{phone, Tenant};
use noshow_infra::NoShowContext;

pub async fn create_tenant_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateTenantUseCase {
        clinic_name: body.clinic_name,
        clinic_phone: body.clinic_phone,
    };

    execute(usecase, &ctx)
        .await
        .map(|tenant| HttpResponse::Created().json(APIResponse::new(tenant)))
        .map_err(NoShowError::from)
}

/// Starts the trial of a new `Tenant`
#[derive(Debug)]
pub struct CreateTenantUseCase {
    pub clinic_name: String,
    pub clinic_phone: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyClinicName,
    InvalidClinicPhone(String),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyClinicName => {
                Self::BadClientData("The clinic name can not be empty".into())
            }
            UseCaseError::InvalidClinicPhone(phone) => Self::BadClientData(format!(
                "{}. Got: {}",
                phone::OUT_OF_SCOPE_MESSAGE,
                phone
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTenantUseCase {
    type Response = Tenant;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateTenant";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let clinic_name = self.clinic_name.trim();
        if clinic_name.is_empty() {
            return Err(UseCaseError::EmptyClinicName);
        }
        let clinic_phone = match self.clinic_phone.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(raw) if phone::is_in_scope(raw) => Some(raw.to_string()),
            Some(raw) => return Err(UseCaseError::InvalidClinicPhone(raw.to_string())),
        };

        let tenant = Tenant::new_trial(
            clinic_name.to_string(),
            clinic_phone,
            ctx.sys.get_timestamp_millis(),
        );
        ctx.repos
            .tenants
            .insert(&tenant)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noshow_domain::{SubscriptionState, TRIAL_CREDITS};

    #[actix_web::main]
    #[test]
    async fn starts_a_trial() {
        let ctx = NoShowContext::create_inmemory();
        let mut usecase = CreateTenantUseCase {
            clinic_name: " Smile Dental ".into(),
            clinic_phone: Some("(555) 000-1234".into()),
        };

        let tenant = usecase.execute(&ctx).await.unwrap();
        assert_eq!(tenant.clinic_name, "Smile Dental");
        assert_eq!(tenant.subscription, SubscriptionState::Trial);
        assert_eq!(tenant.credits, TRIAL_CREDITS);
        assert!(ctx.repos.tenants.find(&tenant.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_clinic_details() {
        let ctx = NoShowContext::create_inmemory();

        let mut usecase = CreateTenantUseCase {
            clinic_name: "  ".into(),
            clinic_phone: None,
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EmptyClinicName
        );

        let mut usecase = CreateTenantUseCase {
            clinic_name: "Smile Dental".into(),
            clinic_phone: Some("12345".into()),
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidClinicPhone("12345".into())
        );
    }
}
