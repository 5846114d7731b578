pub mod google_calendar;
pub mod sms;

use async_trait::async_trait;
use noshow_domain::{CalendarConnection, CalendarEventSnapshot};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarProviderError {
    #[error("The calendar provider rejected the stored credentials")]
    Unauthorized,
    #[error("The calendar provider could not be reached: {0}")]
    Unavailable(String),
    #[error("The calendar provider returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Read access to the external calendar a `Tenant` has connected
#[async_trait]
pub trait ICalendarProvider: Send + Sync {
    /// Events starting in `[start_ts, end_ts)`
    async fn list_events(
        &self,
        connection: &CalendarConnection,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<CalendarEventSnapshot>, CalendarProviderError>;
}

/// Serves events from memory, keyed by calendar id
pub struct InMemoryCalendarProvider {
    events: Mutex<Vec<(String, CalendarEventSnapshot)>>,
}

impl InMemoryCalendarProvider {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn add_event(&self, calendar_id: &str, event: CalendarEventSnapshot) {
        self.events
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event));
    }

    pub fn remove_event(&self, event_id: &str) {
        self.events
            .lock()
            .unwrap()
            .retain(|(_, event)| event.id != event_id);
    }
}

impl Default for InMemoryCalendarProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ICalendarProvider for InMemoryCalendarProvider {
    async fn list_events(
        &self,
        connection: &CalendarConnection,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<CalendarEventSnapshot>, CalendarProviderError> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|(calendar_id, event)| {
                *calendar_id == connection.calendar_id
                    && event.start_ts >= start_ts
                    && event.start_ts < end_ts
            })
            .map(|(_, event)| event.clone())
            .collect())
    }
}
