use super::IReminderScheduleRepo;
use crate::repos::shared::repo::{decode_all, DecodeError};
use noshow_domain::{ReminderSchedule, ReminderTiming, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderScheduleRepo {
    pool: PgPool,
}

impl PostgresReminderScheduleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderScheduleRaw {
    schedule_uid: Uuid,
    tenant_uid: Uuid,
    timing: String,
    template_uid: Uuid,
    enabled: bool,
}

impl TryFrom<ReminderScheduleRaw> for ReminderSchedule {
    type Error = DecodeError;

    fn try_from(e: ReminderScheduleRaw) -> Result<Self, Self::Error> {
        let timing = e
            .timing
            .parse()
            .map_err(|_| DecodeError::new("reminder_schedules", "timing", &e.timing))?;
        Ok(Self {
            id: e.schedule_uid.into(),
            tenant_id: e.tenant_uid.into(),
            timing,
            template_id: e.template_uid.into(),
            enabled: e.enabled,
        })
    }
}

#[async_trait::async_trait]
impl IReminderScheduleRepo for PostgresReminderScheduleRepo {
    async fn upsert(&self, schedule: &ReminderSchedule) -> anyhow::Result<ReminderSchedule> {
        let raw: ReminderScheduleRaw = sqlx::query_as(
            r#"
            INSERT INTO reminder_schedules(schedule_uid, tenant_uid, timing, template_uid, enabled)
            VALUES($1, $2, $3, $4, $5)
            ON CONFLICT (tenant_uid, timing) DO UPDATE SET
                template_uid = EXCLUDED.template_uid,
                enabled = EXCLUDED.enabled
            RETURNING *
            "#,
        )
        .bind(schedule.id.inner_ref())
        .bind(schedule.tenant_id.inner_ref())
        .bind(schedule.timing.as_str())
        .bind(schedule.template_id.inner_ref())
        .bind(schedule.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to upsert reminder schedule: {:?}. DB returned error: {:?}",
                schedule, e
            );
            e
        })?;

        Ok(raw.try_into()?)
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<ReminderSchedule>> {
        let rows: Vec<ReminderScheduleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_schedules AS r
            WHERE r.tenant_uid = $1
            ORDER BY r.timing
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_all(rows)?)
    }

    async fn find_enabled(&self) -> anyhow::Result<Vec<ReminderSchedule>> {
        let rows: Vec<ReminderScheduleRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_schedules AS r
            WHERE r.enabled
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_all(rows)?)
    }

    async fn delete(&self, tenant_id: &ID, timing: ReminderTiming) -> Option<ReminderSchedule> {
        let res: Option<ReminderScheduleRaw> = sqlx::query_as(
            r#"
            DELETE FROM reminder_schedules AS r
            WHERE r.tenant_uid = $1 AND r.timing = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(timing.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete reminder schedule for tenant: {:?} failed. DB returned error: {:?}",
                tenant_id, e
            );
            e
        })
        .ok()?;

        res.and_then(|raw| raw.try_into().ok())
    }
}
