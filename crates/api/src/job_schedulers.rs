use crate::{dispatch::DispatchRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::sleep;
use chrono::{Days, TimeZone};
use noshow_domain::{date, Tz};
use noshow_infra::NoShowContext;
use std::time::Duration;
use tracing::info;

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

/// Millis from `now_ts` until the next time the clock in `tz` strikes `hour`
pub fn millis_until_next_run(now_ts: i64, hour: u32, tz: &Tz) -> i64 {
    let today = date::local_date(now_ts, tz);
    for days_ahead in 0..=2 {
        let run_at = today
            .checked_add_days(Days::new(days_ahead))
            .and_then(|day| day.and_hms_opt(hour, 0, 0))
            .and_then(|local| tz.from_local_datetime(&local).earliest())
            .map(|run_at| run_at.timestamp_millis());
        match run_at {
            Some(run_at) if run_at > now_ts => return run_at - now_ts,
            _ => continue,
        }
    }
    DAY_MILLIS
}

/// Runs the reminder dispatch once a day at the configured hour.
/// Does nothing when no hour is configured.
pub fn start_dispatch_job(ctx: NoShowContext) {
    let hour = match ctx.config.dispatch_job_hour {
        Some(hour) => hour,
        None => return,
    };

    actix_web::rt::spawn(async move {
        loop {
            let now = ctx.sys.get_timestamp_millis();
            let delay = millis_until_next_run(now, hour, &ctx.config.dispatch_timezone);
            info!("Next reminder dispatch run in {} seconds", delay / 1000);
            sleep(Duration::from_millis(delay.max(0) as u64)).await;

            let _ = execute(DispatchRemindersUseCase {}, &ctx).await;
        }
    });
}
