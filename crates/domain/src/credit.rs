use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Outcome of the credit admission check that gates every send
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Admitted,
    Denied(Denial),
}

/// A send that was refused because the `Tenant` has no credits left.
/// This is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Denial {
    pub reason: DenialReason,
    pub action: RemediationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    TrialExhausted,
    PlanExhausted,
    SubscriptionInactive,
}

impl Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::TrialExhausted => "exhausted trial credits",
            Self::PlanExhausted => "exhausted plan credits",
            Self::SubscriptionInactive => "subscription inactive",
        };
        f.write_str(msg)
    }
}

/// What the caller should suggest to the `Tenant` after a `Denial`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationAction {
    Subscribe,
    Upgrade,
}

impl Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self.action {
            RemediationAction::Subscribe => "subscribe",
            RemediationAction::Upgrade => "upgrade",
        };
        write!(f, "{}, {} to continue sending", self.reason, action)
    }
}
