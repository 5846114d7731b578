use noshow_domain::{SendRecord, SendStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRecordDTO {
    pub id: ID,
    pub tenant_id: ID,
    pub appointment_id: Option<ID>,
    pub template_id: Option<ID>,
    pub recipient: String,
    pub body: String,
    pub status: SendStatus,
    pub carrier_message_id: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub created: i64,
    pub sent_at: Option<i64>,
    pub delivered_at: Option<i64>,
}

impl SendRecordDTO {
    pub fn new(record: SendRecord) -> Self {
        Self {
            id: record.id,
            tenant_id: record.tenant_id,
            appointment_id: record.appointment_id,
            template_id: record.template_id,
            recipient: record.recipient,
            body: record.body,
            status: record.status,
            carrier_message_id: record.carrier_message_id,
            error_code: record.error_code,
            error_message: record.error_message,
            created: record.created,
            sent_at: record.sent_at,
            delivered_at: record.delivered_at,
        }
    }
}
