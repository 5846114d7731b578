use crate::error::NoShowError;
use crate::shared::{
    carrier_signature,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::carrier_status_callback::{APIResponse, CallbackOutcome};
use noshow_domain::SendStatus;
use noshow_infra::NoShowContext;
use std::collections::BTreeMap;
use tracing::{error, warn};

pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

const MESSAGE_ID_FIELD: &str = "MessageSid";
const STATUS_FIELD: &str = "MessageStatus";
const ERROR_CODE_FIELD: &str = "ErrorCode";
const ERROR_MESSAGE_FIELD: &str = "ErrorMessage";

/// Checks the carrier signature over every posted form field
fn verify_signature(
    http_req: &HttpRequest,
    params: &BTreeMap<String, String>,
    ctx: &NoShowContext,
) -> Result<(), NoShowError> {
    let auth_token = match &ctx.config.carrier {
        Some(credentials) => &credentials.auth_token,
        None => {
            return Err(NoShowError::Misconfigured(
                "The carrier auth token needed to verify callbacks is not configured".into(),
            ))
        }
    };
    let url = ctx.config.carrier_status_callback_url().ok_or_else(|| {
        NoShowError::Misconfigured(
            "PUBLIC_BASE_URL is needed to verify carrier callbacks but is not configured".into(),
        )
    })?;

    let signature = http_req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            NoShowError::Forbidden(format!("Missing the {} header", SIGNATURE_HEADER))
        })?;

    if carrier_signature::verify(auth_token, &url, params, signature) {
        Ok(())
    } else {
        Err(NoShowError::Forbidden(
            "The carrier signature is not valid".into(),
        ))
    }
}

fn required_field(params: &BTreeMap<String, String>, field: &str) -> Result<String, NoShowError> {
    params
        .get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .ok_or_else(|| NoShowError::BadClientData(format!("Missing the {} field", field)))
}

pub async fn carrier_status_callback_controller(
    http_req: HttpRequest,
    form: web::Form<BTreeMap<String, String>>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    let params = form.into_inner();
    verify_signature(&http_req, &params, &ctx)?;

    let usecase = CarrierStatusCallbackUseCase {
        carrier_message_id: required_field(&params, MESSAGE_ID_FIELD)?,
        carrier_status: required_field(&params, STATUS_FIELD)?,
        error_code: params.get(ERROR_CODE_FIELD).cloned(),
        error_message: params.get(ERROR_MESSAGE_FIELD).cloned(),
    };

    // Processing errors are acknowledged, otherwise the carrier keeps retrying the callback
    let outcome = execute(usecase, &ctx)
        .await
        .unwrap_or(CallbackOutcome::NotStored);
    Ok(HttpResponse::Ok().json(APIResponse { outcome }))
}

/// Applies a delivery status reported by the carrier to the matching `SendRecord`
#[derive(Debug)]
pub struct CarrierStatusCallbackUseCase {
    pub carrier_message_id: String,
    pub carrier_status: String,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CarrierStatusCallbackUseCase {
    type Response = CallbackOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "CarrierStatusCallback";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let status = match SendStatus::from_carrier_status(&self.carrier_status) {
            Some(status) => status,
            None => {
                warn!(
                    "Unrecognized carrier status: {} for message: {}",
                    self.carrier_status, self.carrier_message_id
                );
                return Ok(CallbackOutcome::Unrecognized);
            }
        };

        let mut record = match ctx
            .repos
            .send_records
            .find_by_carrier_message_id(&self.carrier_message_id)
            .await
        {
            Some(record) => record,
            None => {
                warn!(
                    "No send record found for carrier message: {}",
                    self.carrier_message_id
                );
                return Ok(CallbackOutcome::NotFound);
            }
        };

        let changed = record.apply_carrier_status(
            status,
            self.error_code.clone(),
            self.error_message.clone(),
            ctx.sys.get_timestamp_millis(),
        );
        if changed {
            let written = ctx.repos.send_records.save(&record).await.map_err(|e| {
                error!("Unable to save send record: {}. Error: {:?}", record.id, e);
                UseCaseError::StorageError
            })?;
            if !written {
                warn!(
                    "Send record: {} was updated concurrently, status: {} not applied",
                    record.id, status
                );
            }
        }

        Ok(CallbackOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use noshow_domain::{SendRecord, ID};
    use noshow_infra::{CarrierCredentials, StaticTimeSys};
    use std::sync::Arc;

    const NOW: i64 = 1710406800000;

    async fn setup() -> (NoShowContext, SendRecord) {
        let mut ctx = NoShowContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        let mut record = SendRecord::new_pending(
            ID::new(),
            Some(ID::new()),
            Some(ID::new()),
            "+15551234567".into(),
            "Hi".into(),
            NOW - 1000,
        );
        record.mark_sent("SM123".into(), NOW - 500);
        ctx.repos.send_records.insert(&record).await.unwrap();
        (ctx, record)
    }

    fn callback(status: &str) -> CarrierStatusCallbackUseCase {
        CarrierStatusCallbackUseCase {
            carrier_message_id: "SM123".into(),
            carrier_status: status.into(),
            error_code: None,
            error_message: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn applies_delivered_once() {
        let (ctx, record) = setup().await;

        let outcome = callback("delivered").execute(&ctx).await.unwrap();
        assert_eq!(outcome, CallbackOutcome::Applied);
        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Delivered);
        assert_eq!(stored.delivered_at, Some(NOW));

        // A repeated callback changes nothing
        let outcome = callback("delivered").execute(&ctx).await.unwrap();
        assert_eq!(outcome, CallbackOutcome::Applied);
        assert_eq!(ctx.repos.send_records.find(&record.id).await.unwrap(), stored);
    }

    #[actix_web::main]
    #[test]
    async fn attaches_the_carrier_error() {
        let (ctx, record) = setup().await;

        let mut usecase = callback("undelivered");
        usecase.error_code = Some("30003".into());
        usecase.error_message = Some("Unreachable handset".into());
        usecase.execute(&ctx).await.unwrap();

        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Undelivered);
        assert_eq!(stored.error_code, Some("30003".into()));
        assert!(stored.error_message.unwrap().contains("Unreachable handset"));

        // Terminal states are not left for an earlier one
        callback("sending").execute(&ctx).await.unwrap();
        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Undelivered);
    }

    #[actix_web::main]
    #[test]
    async fn out_of_order_callbacks_keep_the_sent_status() {
        let (ctx, record) = setup().await;

        for status in ["queued", "sending", "accepted"] {
            let outcome = callback(status).execute(&ctx).await.unwrap();
            assert_eq!(outcome, CallbackOutcome::Applied);
        }
        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Sent);

        // The first terminal outcome wins
        callback("failed").execute(&ctx).await.unwrap();
        callback("delivered").execute(&ctx).await.unwrap();
        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Failed);
        assert_eq!(stored.delivered_at, None);
    }

    #[actix_web::main]
    #[test]
    async fn unknown_messages_and_statuses_are_acknowledged() {
        let (ctx, record) = setup().await;

        let mut usecase = callback("delivered");
        usecase.carrier_message_id = "SM999".into();
        assert_eq!(usecase.execute(&ctx).await.unwrap(), CallbackOutcome::NotFound);

        assert_eq!(
            callback("teleported").execute(&ctx).await.unwrap(),
            CallbackOutcome::Unrecognized
        );
        let stored = ctx.repos.send_records.find(&record.id).await.unwrap();
        assert_eq!(stored.status, SendStatus::Sent);
    }

    fn signed_ctx() -> NoShowContext {
        let mut ctx = NoShowContext::create_inmemory();
        ctx.config.carrier = Some(CarrierCredentials {
            account_sid: "AC123".into(),
            auth_token: "token".into(),
            from_number: "+15550000000".into(),
        });
        ctx.config.public_base_url = Some("https://noshow.test".into());
        ctx
    }

    fn params() -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("MessageSid".to_string(), "SM123".to_string());
        params.insert("MessageStatus".to_string(), "delivered".to_string());
        params
    }

    #[test]
    fn verifies_the_signature() {
        let ctx = signed_ctx();
        let url = ctx.config.carrier_status_callback_url().unwrap();
        let signature = carrier_signature::compute("token", &url, &params()).unwrap();

        let req = TestRequest::default()
            .insert_header((SIGNATURE_HEADER, signature.as_str()))
            .to_http_request();
        assert!(verify_signature(&req, &params(), &ctx).is_ok());

        let mut tampered = params();
        tampered.insert("MessageStatus".to_string(), "failed".to_string());
        assert!(matches!(
            verify_signature(&req, &tampered, &ctx),
            Err(NoShowError::Forbidden(_))
        ));

        let unsigned = TestRequest::default().to_http_request();
        assert!(matches!(
            verify_signature(&unsigned, &params(), &ctx),
            Err(NoShowError::Forbidden(_))
        ));
    }

    #[test]
    fn signature_checks_need_the_carrier_configuration() {
        let mut ctx = signed_ctx();
        ctx.config.public_base_url = None;
        let req = TestRequest::default()
            .insert_header((SIGNATURE_HEADER, "abc"))
            .to_http_request();
        assert!(matches!(
            verify_signature(&req, &params(), &ctx),
            Err(NoShowError::Misconfigured(_))
        ));
    }

    #[test]
    fn required_fields_must_be_present() {
        let mut params = params();
        assert_eq!(required_field(&params, "MessageSid").unwrap(), "SM123");
        params.insert("MessageSid".to_string(), " ".to_string());
        assert!(matches!(
            required_field(&params, "MessageSid"),
            Err(NoShowError::BadClientData(_))
        ));
    }
}
