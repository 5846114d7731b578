use chrono::DateTime;
use noshow_domain::{CalendarAttendee, CalendarEventSnapshot};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::error;

use crate::services::CalendarProviderError;

const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Either `date_time` for timed events or `date` for all day events
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventDateTime {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl GoogleEventDateTime {
    fn timestamp_millis(&self) -> Option<i64> {
        let date_time = self.date_time.as_ref()?;
        DateTime::parse_from_rfc3339(date_time)
            .ok()
            .map(|dt| dt.timestamp_millis())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEventAttendee {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCalendarEvent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub start: Option<GoogleEventDateTime>,
    pub end: Option<GoogleEventDateTime>,
    #[serde(default)]
    pub attendees: Vec<GoogleEventAttendee>,
}

impl GoogleCalendarEvent {
    /// Cancelled and all day events have no appointment counterpart
    pub fn into_snapshot(self) -> Option<CalendarEventSnapshot> {
        if self.status.as_deref() == Some("cancelled") {
            return None;
        }
        let start_ts = self.start.as_ref()?.timestamp_millis()?;
        let end_ts = self
            .end
            .as_ref()
            .and_then(|end| end.timestamp_millis())
            .unwrap_or(start_ts);

        Some(CalendarEventSnapshot {
            id: self.id,
            title: self.summary,
            description: self.description,
            location: self.location,
            start_ts,
            end_ts,
            attendees: self
                .attendees
                .into_iter()
                .map(|a| CalendarAttendee {
                    email: a.email,
                    display_name: a.display_name,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleCalendarEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

pub struct GoogleCalendarRestApi {
    client: Client,
    access_token: String,
}

impl GoogleCalendarRestApi {
    pub fn new(client: Client, access_token: String) -> Self {
        Self {
            client,
            access_token,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: String,
        query: &[(&str, String)],
    ) -> Result<T, CalendarProviderError> {
        let res = self
            .client
            .get(&format!("{}/{}", GOOGLE_API_BASE_URL, path))
            .header("authorization", format!("Bearer {}", self.access_token))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(
                    "[Network Error] Google Calendar API GET error. Error message: {:?}",
                    e
                );
                CalendarProviderError::Unavailable(e.to_string())
            })?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CalendarProviderError::Unauthorized)
            }
            status if !status.is_success() => {
                error!("Google Calendar API GET responded with status: {}", status);
                return Err(CalendarProviderError::Unavailable(format!(
                    "Responded with status {}",
                    status
                )));
            }
            _ => {}
        }

        res.json::<T>().await.map_err(|e| {
            error!(
                "[Unexpected Response] Google Calendar API GET error. Error message: {:?}",
                e
            );
            CalendarProviderError::UnexpectedResponse(e.to_string())
        })
    }

    /// One page of the single (expanded) events of the calendar in the given timespan
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: String,
        time_max: String,
        page_token: Option<String>,
    ) -> Result<ListEventsResponse, CalendarProviderError> {
        let calendar_id: String = url::form_urlencoded::byte_serialize(calendar_id.as_bytes()).collect();
        let mut query = vec![
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
            ("maxResults", "250".to_string()),
        ];
        if let Some(page_token) = page_token {
            query.push(("pageToken", page_token));
        }

        self.get(format!("calendars/{}/events", calendar_id), &query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_converts_timed_events() {
        let raw = r#"{
            "id": "evt_1",
            "status": "confirmed",
            "summary": "Jane Doe 555-123-4567",
            "start": { "dateTime": "2024-03-15T14:00:00Z" },
            "end": { "dateTime": "2024-03-15T14:30:00Z" },
            "attendees": [{ "email": "jane@example.com", "displayName": "Jane" }]
        }"#;
        let event: GoogleCalendarEvent = serde_json::from_str(raw).unwrap();
        let snapshot = event.into_snapshot().expect("Timed event to convert");
        assert_eq!(snapshot.id, "evt_1");
        assert_eq!(snapshot.start_ts, 1710511200000);
        assert_eq!(snapshot.end_ts, 1710511200000 + 30 * 60 * 1000);
        assert_eq!(snapshot.attendees.len(), 1);
        assert_eq!(snapshot.patient_phone(), Some("+15551234567".into()));
    }

    #[test]
    fn it_ignores_all_day_and_cancelled_events() {
        let all_day = r#"{ "id": "a", "start": { "date": "2024-03-15" }, "end": { "date": "2024-03-16" } }"#;
        let event: GoogleCalendarEvent = serde_json::from_str(all_day).unwrap();
        assert!(event.into_snapshot().is_none());

        let cancelled = r#"{ "id": "b", "status": "cancelled" }"#;
        let event: GoogleCalendarEvent = serde_json::from_str(cancelled).unwrap();
        assert!(event.into_snapshot().is_none());
    }
}
