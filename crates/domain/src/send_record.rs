use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Pending,
    Queued,
    Sending,
    Sent,
    Delivered,
    Undelivered,
    Failed,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Sending => "sending",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Undelivered => "undelivered",
            Self::Failed => "failed",
        }
    }

    /// Position in the carrier lifecycle
    fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Queued => 1,
            Self::Sending => 2,
            Self::Sent => 3,
            Self::Delivered | Self::Undelivered | Self::Failed => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank() == 4
    }

    pub const ALL: [SendStatus; 7] = [
        Self::Pending,
        Self::Queued,
        Self::Sending,
        Self::Sent,
        Self::Delivered,
        Self::Undelivered,
        Self::Failed,
    ];

    /// Statuses only move forward through the carrier lifecycle and terminal
    /// states are final. Staying in the same status is always allowed.
    pub fn can_move_to(&self, next: SendStatus) -> bool {
        if self.is_terminal() {
            return *self == next;
        }
        next.rank() >= self.rank()
    }

    /// Maps the carrier's message status vocabulary onto `SendStatus`.
    /// Returns `None` for statuses this system does not know about.
    pub fn from_carrier_status(carrier_status: &str) -> Option<Self> {
        let status = match carrier_status.trim().to_ascii_lowercase().as_str() {
            "accepted" | "scheduled" => Self::Pending,
            "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" | "read" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "failed" | "canceled" => Self::Failed,
            _ => return None,
        };
        Some(status)
    }
}

impl Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown send status: {0}")]
pub struct InvalidSendStatus(pub String);

impl FromStr for SendStatus {
    type Err = InvalidSendStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "queued" => Ok(Self::Queued),
            "sending" => Ok(Self::Sending),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "undelivered" => Ok(Self::Undelivered),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidSendStatus(s.to_string())),
        }
    }
}

/// One attempt to deliver one reminder.
///
/// The existence of a `SendRecord` for an (appointment, template) pair is
/// what keeps a reminder from being sent twice.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRecord {
    pub id: ID,
    pub tenant_id: ID,
    /// `None` for test sends
    pub appointment_id: Option<ID>,
    pub template_id: Option<ID>,
    pub recipient: String,
    pub body: String,
    pub status: SendStatus,
    /// Assigned by the carrier, used to correlate status callbacks
    pub carrier_message_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created: i64,
    pub sent_at: Option<i64>,
    pub delivered_at: Option<i64>,
}

impl SendRecord {
    pub fn new_pending(
        tenant_id: ID,
        appointment_id: Option<ID>,
        template_id: Option<ID>,
        recipient: String,
        body: String,
        now: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            appointment_id,
            template_id,
            recipient,
            body,
            status: SendStatus::Pending,
            carrier_message_id: None,
            error_code: None,
            error_message: None,
            created: now,
            sent_at: None,
            delivered_at: None,
        }
    }

    /// The carrier accepted the message. A status callback that already
    /// moved the record further along is not overwritten.
    pub fn mark_sent(&mut self, carrier_message_id: String, now: i64) {
        self.carrier_message_id = Some(carrier_message_id);
        self.sent_at = Some(now);
        if self.status.rank() < SendStatus::Sent.rank() {
            self.status = SendStatus::Sent;
        }
    }

    pub fn mark_failed(&mut self, error_code: Option<String>, error_message: String) {
        self.status = SendStatus::Failed;
        self.error_code = error_code;
        self.error_message = Some(error_message);
    }

    /// Applies a delivery status reported by the carrier.
    ///
    /// Late, re-delivered or out of order callbacks never move a record
    /// backwards. Returns whether anything changed.
    pub fn apply_carrier_status(
        &mut self,
        status: SendStatus,
        error_code: Option<String>,
        error_message: Option<String>,
        now: i64,
    ) -> bool {
        if self.status == status || !self.status.can_move_to(status) {
            return false;
        }

        self.status = status;
        match status {
            SendStatus::Delivered => {
                self.delivered_at = Some(now);
                self.error_code = None;
                self.error_message = None;
            }
            SendStatus::Failed | SendStatus::Undelivered => {
                self.error_message = compose_carrier_error(error_code.as_deref(), error_message.as_deref());
                self.error_code = error_code;
            }
            _ => {}
        }
        true
    }
}

/// Single human readable error string out of the carrier's code and message
pub fn compose_carrier_error(code: Option<&str>, message: Option<&str>) -> Option<String> {
    let code = code.map(str::trim).filter(|c| !c.is_empty());
    let message = message.map(str::trim).filter(|m| !m.is_empty());
    match (code, message) {
        (Some(code), Some(message)) => Some(format!("{} (carrier error {})", message, code)),
        (Some(code), None) => Some(format!("Carrier error {}", code)),
        (None, Some(message)) => Some(message.to_string()),
        (None, None) => None,
    }
}

impl Entity for SendRecord {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record() -> SendRecord {
        SendRecord::new_pending(
            ID::new(),
            Some(ID::new()),
            Some(ID::new()),
            "+15551234567".into(),
            "Hi".into(),
            0,
        )
    }

    #[test]
    fn it_maps_carrier_statuses() {
        assert_eq!(SendStatus::from_carrier_status("delivered"), Some(SendStatus::Delivered));
        assert_eq!(SendStatus::from_carrier_status("Undelivered"), Some(SendStatus::Undelivered));
        assert_eq!(SendStatus::from_carrier_status("queued"), Some(SendStatus::Queued));
        assert_eq!(SendStatus::from_carrier_status("accepted"), Some(SendStatus::Pending));
        assert_eq!(SendStatus::from_carrier_status("canceled"), Some(SendStatus::Failed));
        assert_eq!(SendStatus::from_carrier_status("receiving"), None);
        assert_eq!(SendStatus::from_carrier_status(""), None);
    }

    #[test]
    fn it_stamps_delivery() {
        let mut r = record();
        r.mark_sent("SM1".into(), 10);
        assert!(r.apply_carrier_status(SendStatus::Delivered, None, None, 20));
        assert_eq!(r.status, SendStatus::Delivered);
        assert_eq!(r.delivered_at, Some(20));

        // The same callback again is a no-op
        assert!(!r.apply_carrier_status(SendStatus::Delivered, None, None, 30));
        assert_eq!(r.delivered_at, Some(20));
    }

    #[test]
    fn it_never_leaves_a_terminal_state_backwards() {
        let mut r = record();
        r.mark_sent("SM1".into(), 10);
        r.apply_carrier_status(SendStatus::Delivered, None, None, 20);
        assert!(!r.apply_carrier_status(SendStatus::Sending, None, None, 25));
        assert!(!r.apply_carrier_status(SendStatus::Sent, None, None, 25));
        assert_eq!(r.status, SendStatus::Delivered);
    }

    #[test]
    fn it_ignores_out_of_order_callbacks() {
        let mut r = record();
        r.mark_sent("SM1".into(), 10);
        assert!(!r.apply_carrier_status(SendStatus::Queued, None, None, 15));
        assert!(!r.apply_carrier_status(SendStatus::Sending, None, None, 15));
        assert!(!r.apply_carrier_status(SendStatus::Pending, None, None, 15));
        assert_eq!(r.status, SendStatus::Sent);

        // A terminal outcome is final
        assert!(r.apply_carrier_status(SendStatus::Failed, Some("30008".into()), None, 20));
        assert!(!r.apply_carrier_status(SendStatus::Delivered, None, None, 25));
        assert_eq!(r.status, SendStatus::Failed);
        assert_eq!(r.delivered_at, None);
    }

    #[test]
    fn it_only_moves_statuses_forward() {
        assert!(SendStatus::Pending.can_move_to(SendStatus::Sent));
        assert!(SendStatus::Queued.can_move_to(SendStatus::Failed));
        assert!(SendStatus::Sent.can_move_to(SendStatus::Sent));
        assert!(!SendStatus::Sent.can_move_to(SendStatus::Queued));
        assert!(SendStatus::Delivered.can_move_to(SendStatus::Delivered));
        assert!(!SendStatus::Delivered.can_move_to(SendStatus::Undelivered));
        assert!(!SendStatus::Failed.can_move_to(SendStatus::Sent));
    }

    #[test]
    fn it_attaches_carrier_errors() {
        let mut r = record();
        r.mark_sent("SM1".into(), 10);
        r.apply_carrier_status(
            SendStatus::Undelivered,
            Some("30003".into()),
            Some("Unreachable destination handset".into()),
            20,
        );
        assert_eq!(r.error_code.as_deref(), Some("30003"));
        assert_eq!(
            r.error_message.as_deref(),
            Some("Unreachable destination handset (carrier error 30003)")
        );
    }

    #[test]
    fn sent_write_does_not_regress_an_earlier_callback() {
        let mut r = record();
        r.apply_carrier_status(SendStatus::Delivered, None, None, 5);
        r.mark_sent("SM1".into(), 10);
        assert_eq!(r.status, SendStatus::Delivered);
        assert_eq!(r.carrier_message_id.as_deref(), Some("SM1"));
    }

    #[test]
    fn it_composes_error_strings() {
        assert_eq!(compose_carrier_error(None, None), None);
        assert_eq!(compose_carrier_error(Some(" "), None), None);
        assert_eq!(compose_carrier_error(Some("21211"), None), Some("Carrier error 21211".into()));
        assert_eq!(compose_carrier_error(None, Some("Bad number")), Some("Bad number".into()));
    }
}
