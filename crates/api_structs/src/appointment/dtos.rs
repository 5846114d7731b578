use noshow_domain::{Appointment, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDTO {
    pub id: ID,
    pub tenant_id: ID,
    pub calendar_event_id: String,
    pub patient_name: String,
    pub patient_phone: Option<String>,
    pub start_ts: i64,
    pub end_ts: i64,
    pub reminder_sent: bool,
    pub reminder_sent_at: Option<i64>,
    pub last_synced_at: i64,
}

impl AppointmentDTO {
    pub fn new(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            tenant_id: appointment.tenant_id,
            calendar_event_id: appointment.calendar_event_id,
            patient_name: appointment.patient_name,
            patient_phone: appointment.patient_phone,
            start_ts: appointment.start_ts,
            end_ts: appointment.end_ts,
            reminder_sent: appointment.reminder_sent,
            reminder_sent_at: appointment.reminder_sent_at,
            last_synced_at: appointment.last_synced_at,
        }
    }
}
