use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderScheduleDTO {
    pub id: ID,
    pub tenant_id: ID,
    pub timing: ReminderTiming,
    pub template_id: ID,
    pub enabled: bool,
}

impl ReminderScheduleDTO {
    pub fn new(schedule: ReminderSchedule) -> Self {
        Self {
            id: schedule.id,
            tenant_id: schedule.tenant_id,
            timing: schedule.timing,
            template_id: schedule.template_id,
            enabled: schedule.enabled,
        }
    }
}
