use noshow_domain::{MessageTemplate, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplateDTO {
    pub id: ID,
    pub tenant_id: ID,
    pub name: String,
    pub body: String,
    pub is_default: bool,
}

impl MessageTemplateDTO {
    pub fn new(template: MessageTemplate) -> Self {
        Self {
            id: template.id,
            tenant_id: template.tenant_id,
            name: template.name,
            body: template.body,
            is_default: template.is_default,
        }
    }
}
