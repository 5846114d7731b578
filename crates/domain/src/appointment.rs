use crate::calendar::CalendarEventSnapshot;
use crate::shared::entity::{Entity, ID};

/// A scheduled visit, mirrored from an event in the `Tenant`s calendar.
/// (tenant_id, calendar_event_id) is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: ID,
    pub tenant_id: ID,
    pub calendar_event_id: String,
    pub patient_name: String,
    pub patient_phone: Option<String>,
    pub start_ts: i64,
    pub end_ts: i64,
    /// Only ever set by reminder dispatch, never by calendar sync
    pub reminder_sent: bool,
    pub reminder_sent_at: Option<i64>,
    pub last_synced_at: i64,
}

impl Appointment {
    pub fn from_event(tenant_id: ID, event: &CalendarEventSnapshot, now: i64) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            calendar_event_id: event.id.clone(),
            patient_name: event.patient_name(),
            patient_phone: event.patient_phone(),
            start_ts: event.start_ts,
            end_ts: event.end_ts,
            reminder_sent: false,
            reminder_sent_at: None,
            last_synced_at: now,
        }
    }

    /// Refreshes the synced fields, keeping the reminder markers intact
    pub fn apply_event(&mut self, event: &CalendarEventSnapshot, now: i64) {
        self.patient_name = event.patient_name();
        self.patient_phone = event.patient_phone();
        self.start_ts = event.start_ts;
        self.end_ts = event.end_ts;
        self.last_synced_at = now;
    }

    pub fn mark_reminder_sent(&mut self, now: i64) {
        self.reminder_sent = true;
        self.reminder_sent_at = Some(now);
    }
}

impl Entity for Appointment {
    fn id(&self) -> &ID {
        &self.id
    }
}
