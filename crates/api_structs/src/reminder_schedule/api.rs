use crate::dtos::ReminderScheduleDTO;
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderScheduleResponse {
    pub schedule: ReminderScheduleDTO,
}

impl ReminderScheduleResponse {
    pub fn new(schedule: ReminderSchedule) -> Self {
        Self {
            schedule: ReminderScheduleDTO::new(schedule),
        }
    }
}

#[derive(Deserialize)]
pub struct ReminderSchedulePathParams {
    pub tenant_id: ID,
    pub timing: ReminderTiming,
}

pub mod get_schedules {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub schedules: Vec<ReminderScheduleDTO>,
    }

    impl APIResponse {
        pub fn new(schedules: Vec<ReminderSchedule>) -> Self {
            Self {
                schedules: schedules.into_iter().map(ReminderScheduleDTO::new).collect(),
            }
        }
    }
}

pub mod upsert_schedule {
    use super::*;

    pub type PathParams = ReminderSchedulePathParams;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub template_id: ID,
        #[serde(default)]
        pub enabled: Option<bool>,
    }

    pub type APIResponse = ReminderScheduleResponse;
}

pub mod delete_schedule {
    use super::*;

    pub type PathParams = ReminderSchedulePathParams;

    pub type APIResponse = ReminderScheduleResponse;
}
