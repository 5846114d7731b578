use super::IReminderScheduleRepo;
use crate::repos::shared::inmemory_repo::*;
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};

pub struct InMemoryReminderScheduleRepo {
    schedules: std::sync::Mutex<Vec<ReminderSchedule>>,
}

impl InMemoryReminderScheduleRepo {
    pub fn new() -> Self {
        Self {
            schedules: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderScheduleRepo for InMemoryReminderScheduleRepo {
    async fn upsert(&self, schedule: &ReminderSchedule) -> anyhow::Result<ReminderSchedule> {
        let updated = update_one(
            &self.schedules,
            |s| s.tenant_id == schedule.tenant_id && s.timing == schedule.timing,
            |s| {
                s.template_id = schedule.template_id.clone();
                s.enabled = schedule.enabled;
            },
        );
        match updated {
            Some(updated) => Ok(updated),
            None => {
                insert(schedule, &self.schedules);
                Ok(schedule.clone())
            }
        }
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<ReminderSchedule>> {
        Ok(find_by(&self.schedules, |s| s.tenant_id == *tenant_id))
    }

    async fn find_enabled(&self) -> anyhow::Result<Vec<ReminderSchedule>> {
        Ok(find_by(&self.schedules, |s| s.enabled))
    }

    async fn delete(&self, tenant_id: &ID, timing: ReminderTiming) -> Option<ReminderSchedule> {
        let existing = find_one_by(&self.schedules, |s| {
            s.tenant_id == *tenant_id && s.timing == timing
        })?;
        delete(&existing.id, &self.schedules)
    }
}
