mod twilio;

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;
pub use twilio::TwilioSmsCarrier;

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundSms {
    pub to: String,
    pub body: String,
    /// Where the carrier should post delivery status updates
    pub status_callback: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarrierReceipt {
    pub message_id: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarrierError {
    #[error("The SMS carrier is not configured")]
    NotConfigured,
    #[error("The carrier rejected the message: {message}")]
    Rejected {
        code: Option<String>,
        message: String,
    },
    #[error("Unable to reach the carrier: {0}")]
    Transport(String),
}

impl CarrierError {
    pub fn code(&self) -> Option<String> {
        match self {
            Self::Rejected { code, .. } => code.clone(),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ISmsCarrier: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn send(&self, sms: &OutboundSms) -> Result<CarrierReceipt, CarrierError>;
}

/// Carrier used when no credentials are configured. Every send fails.
pub struct UnconfiguredSmsCarrier;

#[async_trait]
impl ISmsCarrier for UnconfiguredSmsCarrier {
    fn is_configured(&self) -> bool {
        false
    }

    async fn send(&self, _sms: &OutboundSms) -> Result<CarrierReceipt, CarrierError> {
        Err(CarrierError::NotConfigured)
    }
}

/// Records every message instead of sending it
pub struct InMemorySmsCarrier {
    configured: bool,
    sent: Mutex<Vec<OutboundSms>>,
    rejected_recipients: Mutex<Vec<String>>,
}

impl InMemorySmsCarrier {
    pub fn new() -> Self {
        Self {
            configured: true,
            sent: Mutex::new(Vec::new()),
            rejected_recipients: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Every later send to `recipient` is rejected by the carrier
    pub fn reject_recipient(&self, recipient: &str) {
        self.rejected_recipients
            .lock()
            .unwrap()
            .push(recipient.to_string());
    }

    pub fn sent(&self) -> Vec<OutboundSms> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemorySmsCarrier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ISmsCarrier for InMemorySmsCarrier {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, sms: &OutboundSms) -> Result<CarrierReceipt, CarrierError> {
        if !self.configured {
            return Err(CarrierError::NotConfigured);
        }
        if self.rejected_recipients.lock().unwrap().contains(&sms.to) {
            return Err(CarrierError::Rejected {
                code: Some("21211".into()),
                message: format!("The 'To' number {} is not a valid phone number.", sms.to),
            });
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(sms.clone());
        Ok(CarrierReceipt {
            message_id: format!("SM{:032}", sent.len()),
        })
    }
}
