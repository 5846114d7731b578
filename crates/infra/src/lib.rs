mod config;
mod repos;
mod services;
mod system;

pub use config::{CarrierCredentials, Config, CARRIER_STATUS_CALLBACK_PATH};
pub use repos::{DecodeError, DeleteResult, Repos};
pub use services::google_calendar::GoogleCalendarProvider;
pub use services::sms::{
    CarrierError, CarrierReceipt, ISmsCarrier, InMemorySmsCarrier, OutboundSms, TwilioSmsCarrier,
    UnconfiguredSmsCarrier,
};
pub use services::{CalendarProviderError, ICalendarProvider, InMemoryCalendarProvider};
pub use system::{ISys, RealSys, StaticTimeSys};

use noshow_domain::ID;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;
use tracing::warn;

pub type TenantLockGuard = OwnedMutexGuard<()>;

/// One async lock per `Tenant`. Held while a credit is checked and spent so
/// that concurrent sends for the same tenant are admitted one at a time.
#[derive(Clone, Default)]
pub struct TenantLocks {
    locks: Arc<Mutex<HashMap<ID, Arc<tokio::sync::Mutex<()>>>>>,
}

impl TenantLocks {
    pub async fn lock(&self, tenant_id: &ID) -> TenantLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap();
            locks
                .entry(tenant_id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[derive(Clone)]
pub struct NoShowContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub carrier: Arc<dyn ISmsCarrier>,
    pub calendar: Arc<dyn ICalendarProvider>,
    pub tenant_locks: TenantLocks,
}

impl NoShowContext {
    fn create(repos: Repos) -> Self {
        let config = Config::new();
        let carrier: Arc<dyn ISmsCarrier> = match &config.carrier {
            Some(credentials) => Arc::new(TwilioSmsCarrier::new(credentials.clone())),
            None => Arc::new(UnconfiguredSmsCarrier),
        };
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            carrier,
            calendar: Arc::new(GoogleCalendarProvider::new()),
            tenant_locks: Default::default(),
        }
    }

    /// Context backed by in-memory repositories and fake external services
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            carrier: Arc::new(InMemorySmsCarrier::new()),
            calendar: Arc::new(InMemoryCalendarProvider::new()),
            tenant_locks: Default::default(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> NoShowContext {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(connection_string) => {
            let repos = Repos::create_postgres(&connection_string)
                .await
                .expect("Postgres credentials must be valid and the migrations must run");
            NoShowContext::create(repos)
        }
        Err(_) => {
            warn!(
                "Did not find {} environment variable. Going to use in memory repositories.",
                PSQL_CONNECTION_STRING
            );
            NoShowContext::create(Repos::create_inmemory())
        }
    }
}
