use super::IMessageTemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use noshow_domain::{MessageTemplate, ID};

pub struct InMemoryMessageTemplateRepo {
    templates: std::sync::Mutex<Vec<MessageTemplate>>,
}

impl InMemoryMessageTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IMessageTemplateRepo for InMemoryMessageTemplateRepo {
    async fn insert(&self, template: &MessageTemplate) -> anyhow::Result<()> {
        insert(template, &self.templates);
        Ok(())
    }

    async fn bulk_insert(&self, templates: &[MessageTemplate]) -> anyhow::Result<()> {
        for template in templates {
            insert(template, &self.templates);
        }
        Ok(())
    }

    async fn find(&self, template_id: &ID) -> Option<MessageTemplate> {
        find(template_id, &self.templates)
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<MessageTemplate>> {
        Ok(find_by(&self.templates, |t| t.tenant_id == *tenant_id))
    }

    async fn unset_default(&self, tenant_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.templates,
            |t| t.tenant_id == *tenant_id && t.is_default,
            |t| t.is_default = false,
        );
        Ok(())
    }
}
