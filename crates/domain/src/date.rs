use chrono::prelude::*;
use chrono::Days;
use chrono_tz::Tz;

/// Inclusive span of one calendar day in millis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start_ts: i64,
    pub end_ts: i64,
}

impl DayWindow {
    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts <= self.end_ts
    }
}

fn start_of_day(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::default());
    match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // Midnight skipped by a DST transition, the day starts one hour later
        None => tz
            .from_local_datetime(&(midnight + chrono::Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight).timestamp_millis()),
    }
}

/// The calendar date `now_ts` falls on in the given timezone
pub fn local_date(now_ts: i64, tz: &Tz) -> NaiveDate {
    match Utc.timestamp_millis_opt(now_ts).single() {
        Some(dt) => dt.with_timezone(tz).date_naive(),
        None => NaiveDate::MIN,
    }
}

/// The day `days_ahead` calendar days after the day of `now_ts`, as
/// `[start-of-day, end-of-day]` in `tz`.
pub fn day_window(now_ts: i64, days_ahead: u64, tz: &Tz) -> DayWindow {
    let target = local_date(now_ts, tz)
        .checked_add_days(Days::new(days_ahead))
        .unwrap_or(NaiveDate::MAX);
    let start_ts = start_of_day(target, tz);
    let end_ts = match target.succ_opt() {
        Some(next) => start_of_day(next, tz) - 1,
        None => i64::MAX,
    };
    DayWindow { start_ts, end_ts }
}

pub fn format_date(ts: i64, tz: &Tz) -> String {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.with_timezone(tz).format("%A, %B %-d").to_string(),
        None => String::new(),
    }
}

pub fn format_time(ts: i64, tz: &Tz) -> String {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(dt) => dt.with_timezone(tz).format("%-I:%M %p").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{America::New_York, UTC};

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn it_computes_utc_day_windows() {
        let now = ts(2024, 3, 14, 9, 30);
        let same_day = day_window(now, 0, &UTC);
        assert_eq!(same_day.start_ts, ts(2024, 3, 14, 0, 0));
        assert_eq!(same_day.end_ts, ts(2024, 3, 15, 0, 0) - 1);

        let one_week = day_window(now, 7, &UTC);
        assert_eq!(one_week.start_ts, ts(2024, 3, 21, 0, 0));
        assert!(one_week.contains(ts(2024, 3, 21, 23, 59)));
        assert!(!one_week.contains(ts(2024, 3, 22, 0, 0)));
    }

    #[test]
    fn it_crosses_month_and_year_boundaries() {
        let now = ts(2024, 12, 31, 23, 0);
        let one_day = day_window(now, 1, &UTC);
        assert_eq!(one_day.start_ts, ts(2025, 1, 1, 0, 0));
    }

    #[test]
    fn it_uses_the_configured_zone_for_day_boundaries() {
        // 02:00 UTC on the 14th is still the 13th in New York
        let now = ts(2024, 3, 14, 2, 0);
        let window = day_window(now, 0, &New_York);
        assert_eq!(window.start_ts, ts(2024, 3, 13, 4, 0));
        assert_eq!(window.end_ts, ts(2024, 3, 14, 4, 0) - 1);
    }

    #[test]
    fn it_formats_dates_and_times() {
        let at = ts(2024, 3, 14, 15, 5);
        assert_eq!(format_date(at, &UTC), "Thursday, March 14");
        assert_eq!(format_time(at, &UTC), "3:05 PM");
    }
}
