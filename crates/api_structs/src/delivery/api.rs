use serde::{Deserialize, Serialize};

pub mod carrier_status_callback {
    use super::*;

    /// Form fields posted by the carrier
    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        #[serde(rename = "MessageSid")]
        pub message_sid: Option<String>,
        #[serde(rename = "MessageStatus")]
        pub message_status: Option<String>,
        #[serde(rename = "ErrorCode", default)]
        pub error_code: Option<String>,
        #[serde(rename = "ErrorMessage", default)]
        pub error_message: Option<String>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CallbackOutcome {
        Applied,
        NotFound,
        Unrecognized,
        /// The update could not be stored. Acknowledged anyway so the carrier does not retry.
        NotStored,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub outcome: CallbackOutcome,
    }
}
