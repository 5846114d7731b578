mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderScheduleRepo;
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
pub use postgres::PostgresReminderScheduleRepo;

#[async_trait::async_trait]
pub trait IReminderScheduleRepo: Send + Sync {
    /// Stores the `ReminderSchedule` as the one for its tenant and timing,
    /// replacing whatever was there. The stored version is returned.
    async fn upsert(&self, schedule: &ReminderSchedule) -> anyhow::Result<ReminderSchedule>;
    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<ReminderSchedule>>;
    /// Every enabled `ReminderSchedule` across all tenants
    async fn find_enabled(&self) -> anyhow::Result<Vec<ReminderSchedule>>;
    async fn delete(&self, tenant_id: &ID, timing: ReminderTiming) -> Option<ReminderSchedule>;
}
