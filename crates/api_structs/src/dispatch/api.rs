use crate::dtos::SendRecordDTO;
use noshow_domain::{SendRecord, ID};
use serde::{Deserialize, Serialize};

pub mod dispatch_reminders {
    use super::*;

    /// Aggregate outcome of one dispatch run
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub checked: usize,
        pub sent: usize,
        pub failed: usize,
        pub skipped: usize,
        pub timestamp: i64,
    }
}

pub mod send_test_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub phone: String,
        #[serde(default)]
        pub template_id: Option<ID>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub send_record: SendRecordDTO,
    }

    impl APIResponse {
        pub fn new(record: SendRecord) -> Self {
            Self {
                send_record: SendRecordDTO::new(record),
            }
        }
    }
}
