use chrono_tz::Tz;
use std::str::FromStr;
use tracing::{info, warn};

/// Credentials for the SMS carrier REST api
#[derive(Debug, Clone)]
pub struct CarrierCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Bearer secret required by the dispatch trigger and the tenant routes.
    /// When it is not set every caller is allowed.
    pub dispatch_secret: Option<String>,
    pub carrier: Option<CarrierCredentials>,
    /// Public address of this server. Used to build the carrier status callback
    /// url and to verify the signature of those callbacks.
    pub public_base_url: Option<String>,
    /// Calendar days for the dispatch windows are computed in this timezone
    pub dispatch_timezone: Tz,
    /// Hour of the day at which the in-process job triggers a dispatch run.
    /// `None` leaves triggering entirely to an external scheduler.
    pub dispatch_job_hour: Option<u32>,
    /// Credits a `Tenant` gets on every billing period renewal
    pub plan_credits: i64,
    /// Upper bound in seconds for a single carrier call
    pub dispatch_item_timeout_secs: u64,
}

pub const CARRIER_STATUS_CALLBACK_PATH: &str = "/api/v1/webhooks/carrier/status";

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn parse_or_default<T: FromStr>(key: &str, default: T) -> T {
    match env_var(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(val) => val,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default value.",
                    key, raw
                );
                default
            }
        },
        None => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let dispatch_secret = env_var("DISPATCH_SECRET");
        if dispatch_secret.is_none() {
            warn!("Did not find DISPATCH_SECRET environment variable. The dispatch trigger and tenant routes will accept any caller.");
        }

        let carrier = match (
            env_var("CARRIER_ACCOUNT_SID"),
            env_var("CARRIER_AUTH_TOKEN"),
            env_var("CARRIER_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(CarrierCredentials {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => {
                warn!("Carrier credentials are not fully configured. Reminders can not be sent.");
                None
            }
        };

        let dispatch_timezone = parse_or_default("DISPATCH_TIMEZONE", chrono_tz::UTC);
        let dispatch_job_hour = env_var("DISPATCH_JOB_HOUR").and_then(|raw| match raw.parse::<u32>() {
            Ok(hour) if hour < 24 => {
                info!("Reminders will be dispatched daily at {}:00 {}", hour, dispatch_timezone);
                Some(hour)
            }
            _ => {
                warn!("The given DISPATCH_JOB_HOUR: {} is not valid, the in-process job is disabled.", raw);
                None
            }
        });

        Self {
            port: parse_or_default("PORT", 5000),
            dispatch_secret,
            carrier,
            public_base_url: env_var("PUBLIC_BASE_URL").map(|url| url.trim_end_matches('/').to_string()),
            dispatch_timezone,
            dispatch_job_hour,
            plan_credits: parse_or_default("PLAN_CREDITS", 500),
            dispatch_item_timeout_secs: parse_or_default("DISPATCH_ITEM_TIMEOUT_SECS", 20),
        }
    }

    /// Url the carrier posts delivery status callbacks to
    pub fn carrier_status_callback_url(&self) -> Option<String> {
        self.public_base_url
            .as_ref()
            .map(|base| format!("{}{}", base, CARRIER_STATUS_CALLBACK_PATH))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
