use crate::date::{day_window, DayWindow};
use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// When, relative to the appointment day, a reminder goes out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTiming {
    OneWeek,
    OneDay,
    SameDay,
}

impl ReminderTiming {
    pub const ALL: [ReminderTiming; 3] = [Self::OneWeek, Self::OneDay, Self::SameDay];

    pub fn days_ahead(&self) -> u64 {
        match self {
            Self::OneWeek => 7,
            Self::OneDay => 1,
            Self::SameDay => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWeek => "one_week",
            Self::OneDay => "one_day",
            Self::SameDay => "same_day",
        }
    }

    /// The day whose appointments are due a reminder for a run at `now_ts`
    pub fn target_window(&self, now_ts: i64, tz: &Tz) -> DayWindow {
        day_window(now_ts, self.days_ahead(), tz)
    }
}

impl Display for ReminderTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown reminder timing: {0}")]
pub struct InvalidReminderTiming(pub String);

impl FromStr for ReminderTiming {
    type Err = InvalidReminderTiming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_week" => Ok(Self::OneWeek),
            "one_day" => Ok(Self::OneDay),
            "same_day" => Ok(Self::SameDay),
            _ => Err(InvalidReminderTiming(s.to_string())),
        }
    }
}

/// A `Tenant`s configuration of when to send which `MessageTemplate`.
/// There is at most one per (tenant, timing).
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderSchedule {
    pub id: ID,
    pub tenant_id: ID,
    pub timing: ReminderTiming,
    pub template_id: ID,
    pub enabled: bool,
}

impl ReminderSchedule {
    pub fn new(tenant_id: ID, timing: ReminderTiming, template_id: ID) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            timing,
            template_id,
            enabled: true,
        }
    }
}

impl Entity for ReminderSchedule {
    fn id(&self) -> &ID {
        &self.id
    }
}
