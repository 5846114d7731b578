use super::ITenantRepo;
use crate::repos::shared::inmemory_repo::*;
use noshow_domain::{Tenant, ID};

pub struct InMemoryTenantRepo {
    tenants: std::sync::Mutex<Vec<Tenant>>,
}

impl InMemoryTenantRepo {
    pub fn new() -> Self {
        Self {
            tenants: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITenantRepo for InMemoryTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        insert(tenant, &self.tenants);
        Ok(())
    }

    async fn save(&self, tenant: &Tenant) -> anyhow::Result<()> {
        save(tenant, &self.tenants);
        Ok(())
    }

    async fn find(&self, tenant_id: &ID) -> Option<Tenant> {
        find(tenant_id, &self.tenants)
    }

    async fn decrement_credits(&self, tenant_id: &ID) -> anyhow::Result<Option<i64>> {
        let updated = update_one(
            &self.tenants,
            |tenant| tenant.id == *tenant_id && tenant.credits > 0,
            |tenant| tenant.credits -= 1,
        );
        Ok(updated.map(|tenant| tenant.credits))
    }
}
