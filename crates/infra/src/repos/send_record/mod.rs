mod inmemory;
mod postgres;

pub use inmemory::InMemorySendRecordRepo;
use noshow_domain::{SendRecord, ID};
pub use postgres::PostgresSendRecordRepo;

#[async_trait::async_trait]
pub trait ISendRecordRepo: Send + Sync {
    /// Fails when a `SendRecord` already exists for the same appointment and template
    async fn insert(&self, record: &SendRecord) -> anyhow::Result<()>;
    /// Leaves the stored record untouched when its status can not move to the
    /// status of `record`, so a stale copy never regresses a newer write.
    /// Returns whether the record was written.
    async fn save(&self, record: &SendRecord) -> anyhow::Result<bool>;
    async fn find(&self, record_id: &ID) -> Option<SendRecord>;
    async fn exists_for(&self, appointment_id: &ID, template_id: &ID) -> anyhow::Result<bool>;
    async fn find_by_carrier_message_id(&self, carrier_message_id: &str) -> Option<SendRecord>;
    /// Newest first
    async fn find_recent_by_tenant(
        &self,
        tenant_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<SendRecord>>;
}
