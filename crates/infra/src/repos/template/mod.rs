mod inmemory;
mod postgres;

pub use inmemory::InMemoryMessageTemplateRepo;
use noshow_domain::{MessageTemplate, ID};
pub use postgres::PostgresMessageTemplateRepo;

#[async_trait::async_trait]
pub trait IMessageTemplateRepo: Send + Sync {
    async fn insert(&self, template: &MessageTemplate) -> anyhow::Result<()>;
    async fn bulk_insert(&self, templates: &[MessageTemplate]) -> anyhow::Result<()>;
    async fn find(&self, template_id: &ID) -> Option<MessageTemplate>;
    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<MessageTemplate>>;
    /// Clears the default flag of every `MessageTemplate` of the tenant
    async fn unset_default(&self, tenant_id: &ID) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::{setup_context, NoShowContext};
    use noshow_domain::{MessageTemplate, Tenant};

    async fn create_contexts() -> Vec<NoShowContext> {
        vec![NoShowContext::create_inmemory(), setup_context().await]
    }

    #[tokio::test]
    async fn seed_and_switch_default() {
        for ctx in create_contexts().await {
            let tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
            ctx.repos.tenants.insert(&tenant).await.expect("To insert tenant");
            let repo = &ctx.repos.message_templates;

            let defaults = MessageTemplate::defaults(&tenant.id);
            repo.bulk_insert(&defaults).await.expect("To insert templates");
            let stored = repo.find_by_tenant(&tenant.id).await.expect("To find templates");
            assert_eq!(stored.len(), defaults.len());
            assert_eq!(stored.iter().filter(|t| t.is_default).count(), 1);

            repo.unset_default(&tenant.id).await.expect("To unset default");
            let mut template =
                MessageTemplate::new(tenant.id.clone(), "Custom".into(), "Hi {{patientName}}".into());
            template.is_default = true;
            repo.insert(&template).await.expect("To insert template");

            let stored = repo.find_by_tenant(&tenant.id).await.unwrap();
            let default_ids = stored
                .iter()
                .filter(|t| t.is_default)
                .map(|t| t.id.clone())
                .collect::<Vec<_>>();
            assert_eq!(default_ids, vec![template.id.clone()]);
            assert_eq!(repo.find(&template.id).await, Some(template));
        }
    }
}
