use super::{CarrierError, CarrierReceipt, ISmsCarrier, OutboundSms};
use crate::config::CarrierCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

const TWILIO_API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    message: Option<String>,
}

pub struct TwilioSmsCarrier {
    client: Client,
    credentials: CarrierCredentials,
}

impl TwilioSmsCarrier {
    pub fn new(credentials: CarrierCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
        }
    }
}

#[async_trait]
impl ISmsCarrier for TwilioSmsCarrier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, sms: &OutboundSms) -> Result<CarrierReceipt, CarrierError> {
        let mut form_data = vec![
            ("To", sms.to.as_str()),
            ("From", self.credentials.from_number.as_str()),
            ("Body", sms.body.as_str()),
        ];
        if let Some(callback) = &sms.status_callback {
            form_data.push(("StatusCallback", callback.as_str()));
        }

        let res = self
            .client
            .post(format!(
                "{}/Accounts/{}/Messages.json",
                TWILIO_API_BASE_URL, self.credentials.account_sid
            ))
            .basic_auth(
                &self.credentials.account_sid,
                Some(&self.credentials.auth_token),
            )
            .form(&form_data)
            .send()
            .await
            .map_err(|e| {
                error!("[Network Error] Twilio send error. Error message: {:?}", e);
                CarrierError::Transport(e.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!("Twilio send error: status {}, body: {}", status, text);
            let (code, message) = match serde_json::from_str::<ErrorResponse>(&text) {
                Ok(body) => (
                    body.code.map(|code| code.to_string()),
                    body.message.unwrap_or_else(|| text.clone()),
                ),
                Err(_) => (None, format!("Carrier responded with status {}", status)),
            };
            return Err(CarrierError::Rejected { code, message });
        }

        let response: MessageResponse = res.json().await.map_err(|e| {
            error!(
                "[Unexpected Response] Twilio send error. Error message: {:?}",
                e
            );
            CarrierError::Transport(e.to_string())
        })?;
        debug!("Successfully sent message with SID: {}", response.sid);

        Ok(CarrierReceipt {
            message_id: response.sid,
        })
    }
}
