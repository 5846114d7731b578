use crate::credit::{Admission, Denial, DenialReason, RemediationAction};
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Number of sends granted once when a `Tenant` starts its trial
pub const TRIAL_CREDITS: i64 = 20;

/// A `Tenant` is a business account. It owns every `ReminderSchedule`,
/// `MessageTemplate`, `Appointment` and `SendRecord` that references it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tenant {
    pub id: ID,
    pub clinic_name: String,
    pub clinic_phone: Option<String>,
    pub subscription: SubscriptionState,
    /// Remaining sends. Never negative.
    pub credits: i64,
    /// Timestamp in millis of the next billing period renewal
    pub billing_renews_at: Option<i64>,
    pub calendar: Option<CalendarConnection>,
    pub created: i64,
}

/// Credentials handed over by the calendar provider after the OAuth exchange.
/// Opaque to everything except the calendar provider client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConnection {
    pub calendar_id: String,
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionState {
    Trial,
    Active,
    Inactive,
}

impl SubscriptionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown subscription state: {0}")]
pub struct InvalidSubscriptionState(pub String);

impl FromStr for SubscriptionState {
    type Err = InvalidSubscriptionState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Self::Trial),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(InvalidSubscriptionState(s.to_string())),
        }
    }
}

impl Tenant {
    /// Creates a `Tenant` at the start of its trial with the one-off trial grant
    pub fn new_trial(clinic_name: String, clinic_phone: Option<String>, now: i64) -> Self {
        Self {
            id: Default::default(),
            clinic_name,
            clinic_phone,
            subscription: SubscriptionState::Trial,
            credits: TRIAL_CREDITS,
            billing_renews_at: None,
            calendar: None,
            created: now,
        }
    }

    /// Admission policy evaluated before every single send
    pub fn admission(&self) -> Admission {
        if self.credits > 0 {
            return Admission::Admitted;
        }

        let denial = match self.subscription {
            SubscriptionState::Trial => Denial {
                reason: DenialReason::TrialExhausted,
                action: RemediationAction::Subscribe,
            },
            SubscriptionState::Active => Denial {
                reason: DenialReason::PlanExhausted,
                action: RemediationAction::Upgrade,
            },
            SubscriptionState::Inactive => Denial {
                reason: DenialReason::SubscriptionInactive,
                action: RemediationAction::Subscribe,
            },
        };
        Admission::Denied(denial)
    }

    pub fn has_exhausted_trial(&self) -> bool {
        self.subscription == SubscriptionState::Trial && self.credits <= 0
    }

    /// A successful billing period renewal resets the credits to the plan allotment
    pub fn renew_billing_period(&mut self, plan_credits: i64, renews_at: i64) {
        self.subscription = SubscriptionState::Active;
        self.credits = plan_credits.max(0);
        self.billing_renews_at = Some(renews_at);
    }

    pub fn cancel_subscription(&mut self) {
        self.subscription = SubscriptionState::Inactive;
        self.billing_renews_at = None;
    }

    pub fn clinic_phone_or_fallback(&self) -> String {
        match &self.clinic_phone {
            Some(phone) if !phone.trim().is_empty() => phone.clone(),
            _ => "the clinic".into(),
        }
    }
}

impl Entity for Tenant {
    fn id(&self) -> &ID {
        &self.id
    }
}
