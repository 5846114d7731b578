use crate::dtos::SendRecordDTO;
use noshow_domain::{SendRecord, ID};
use serde::{Deserialize, Serialize};

pub mod get_send_records {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub limit: Option<usize>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub send_records: Vec<SendRecordDTO>,
    }

    impl APIResponse {
        pub fn new(records: Vec<SendRecord>) -> Self {
            Self {
                send_records: records.into_iter().map(SendRecordDTO::new).collect(),
            }
        }
    }
}
