use crate::dtos::MessageTemplateDTO;
use noshow_domain::{MessageTemplate, ID};
use serde::{Deserialize, Serialize};

pub mod get_templates {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub templates: Vec<MessageTemplateDTO>,
    }

    impl APIResponse {
        pub fn new(templates: Vec<MessageTemplate>) -> Self {
            Self {
                templates: templates.into_iter().map(MessageTemplateDTO::new).collect(),
            }
        }
    }
}

pub mod create_template {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub body: String,
        #[serde(default)]
        pub is_default: Option<bool>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub template: MessageTemplateDTO,
        /// `{{...}}` tokens in the body that will never be substituted
        pub unknown_placeholders: Vec<String>,
    }

    impl APIResponse {
        pub fn new(template: MessageTemplate, unknown_placeholders: Vec<String>) -> Self {
            Self {
                template: MessageTemplateDTO::new(template),
                unknown_placeholders,
            }
        }
    }
}
