mod calendar_api;

use super::{CalendarProviderError, ICalendarProvider};
use async_trait::async_trait;
use calendar_api::GoogleCalendarRestApi;
use chrono::{SecondsFormat, TimeZone, Utc};
use noshow_domain::{CalendarConnection, CalendarEventSnapshot};
use reqwest::Client;

// https://developers.google.com/calendar/v3/reference/events/list

/// Upper bound on the pages fetched for a single listing
const MAX_PAGES: usize = 20;

pub struct GoogleCalendarProvider {
    client: Client,
}

impl GoogleCalendarProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for GoogleCalendarProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn to_rfc3339(timestamp_millis: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl ICalendarProvider for GoogleCalendarProvider {
    async fn list_events(
        &self,
        connection: &CalendarConnection,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<CalendarEventSnapshot>, CalendarProviderError> {
        let api = GoogleCalendarRestApi::new(self.client.clone(), connection.access_token.clone());
        let mut events = Vec::new();
        let mut page_token = None;

        for _ in 0..MAX_PAGES {
            let page = api
                .list_events(
                    &connection.calendar_id,
                    to_rfc3339(start_ts),
                    to_rfc3339(end_ts),
                    page_token.take(),
                )
                .await?;
            events.extend(
                page.items
                    .into_iter()
                    .filter_map(|event| event.into_snapshot())
                    .filter(|event| event.start_ts >= start_ts && event.start_ts < end_ts),
            );
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }
}
