mod inmemory;
mod postgres;

pub use inmemory::InMemoryTenantRepo;
use noshow_domain::{Tenant, ID};
pub use postgres::PostgresTenantRepo;

#[async_trait::async_trait]
pub trait ITenantRepo: Send + Sync {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn save(&self, tenant: &Tenant) -> anyhow::Result<()>;
    async fn find(&self, tenant_id: &ID) -> Option<Tenant>;
    /// Takes a single credit from the `Tenant` if it has any left.
    /// Returns the remaining credits, or `None` when nothing was taken.
    async fn decrement_credits(&self, tenant_id: &ID) -> anyhow::Result<Option<i64>>;
}
