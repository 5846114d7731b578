mod appointment;
mod reminder_schedule;
mod send_record;
mod shared;
mod template;
mod tenant;

use appointment::{IAppointmentRepo, InMemoryAppointmentRepo, PostgresAppointmentRepo};
use reminder_schedule::{
    IReminderScheduleRepo, InMemoryReminderScheduleRepo, PostgresReminderScheduleRepo,
};
use send_record::{ISendRecordRepo, InMemorySendRecordRepo, PostgresSendRecordRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use template::{IMessageTemplateRepo, InMemoryMessageTemplateRepo, PostgresMessageTemplateRepo};
use tenant::{ITenantRepo, InMemoryTenantRepo, PostgresTenantRepo};
use tracing::info;

pub use shared::repo::{DecodeError, DeleteResult};

#[derive(Clone)]
pub struct Repos {
    pub tenants: Arc<dyn ITenantRepo>,
    pub reminder_schedules: Arc<dyn IReminderScheduleRepo>,
    pub message_templates: Arc<dyn IMessageTemplateRepo>,
    pub appointments: Arc<dyn IAppointmentRepo>,
    pub send_records: Arc<dyn ISendRecordRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            tenants: Arc::new(PostgresTenantRepo::new(pool.clone())),
            reminder_schedules: Arc::new(PostgresReminderScheduleRepo::new(pool.clone())),
            message_templates: Arc::new(PostgresMessageTemplateRepo::new(pool.clone())),
            appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            send_records: Arc::new(PostgresSendRecordRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepo::new()),
            reminder_schedules: Arc::new(InMemoryReminderScheduleRepo::new()),
            message_templates: Arc::new(InMemoryMessageTemplateRepo::new()),
            appointments: Arc::new(InMemoryAppointmentRepo::new()),
            send_records: Arc::new(InMemorySendRecordRepo::new()),
        }
    }
}
