use super::IAppointmentRepo;
use crate::repos::shared::repo::DeleteResult;
use noshow_domain::{Appointment, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresAppointmentRepo {
    pool: PgPool,
}

impl PostgresAppointmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRaw {
    appointment_uid: Uuid,
    tenant_uid: Uuid,
    calendar_event_id: String,
    patient_name: String,
    patient_phone: Option<String>,
    start_ts: i64,
    end_ts: i64,
    reminder_sent: bool,
    reminder_sent_at: Option<i64>,
    last_synced_at: i64,
}

impl From<AppointmentRaw> for Appointment {
    fn from(e: AppointmentRaw) -> Self {
        Self {
            id: e.appointment_uid.into(),
            tenant_id: e.tenant_uid.into(),
            calendar_event_id: e.calendar_event_id,
            patient_name: e.patient_name,
            patient_phone: e.patient_phone,
            start_ts: e.start_ts,
            end_ts: e.end_ts,
            reminder_sent: e.reminder_sent,
            reminder_sent_at: e.reminder_sent_at,
            last_synced_at: e.last_synced_at,
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for PostgresAppointmentRepo {
    async fn bulk_insert(&self, appointments: &[Appointment]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for appointment in appointments {
            sqlx::query(
                r#"
                INSERT INTO appointments(
                    appointment_uid, tenant_uid, calendar_event_id, patient_name, patient_phone,
                    start_ts, end_ts, reminder_sent, reminder_sent_at, last_synced_at
                )
                VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(appointment.id.inner_ref())
            .bind(appointment.tenant_id.inner_ref())
            .bind(&appointment.calendar_event_id)
            .bind(&appointment.patient_name)
            .bind(&appointment.patient_phone)
            .bind(appointment.start_ts)
            .bind(appointment.end_ts)
            .bind(appointment.reminder_sent)
            .bind(appointment.reminder_sent_at)
            .bind(appointment.last_synced_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert appointment: {:?}. DB returned error: {:?}",
                    appointment.id, e
                );
                e
            })?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE appointments SET
                patient_name = $2,
                patient_phone = $3,
                start_ts = $4,
                end_ts = $5,
                reminder_sent = $6,
                reminder_sent_at = $7,
                last_synced_at = $8
            WHERE appointment_uid = $1
            "#,
        )
        .bind(appointment.id.inner_ref())
        .bind(&appointment.patient_name)
        .bind(&appointment.patient_phone)
        .bind(appointment.start_ts)
        .bind(appointment.end_ts)
        .bind(appointment.reminder_sent)
        .bind(appointment.reminder_sent_at)
        .bind(appointment.last_synced_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save appointment: {:?}. DB returned error: {:?}",
                appointment.id, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        let res: Option<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.appointment_uid = $1
            "#,
        )
        .bind(appointment_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find appointment with id: {:?} failed. DB returned error: {:?}",
                appointment_id, e
            );
            e
        })
        .ok()?;

        res.map(|appointment| appointment.into())
    }

    async fn find_by_tenant_in_window(
        &self,
        tenant_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let rows: Vec<AppointmentRaw> = sqlx::query_as(
            r#"
            SELECT * FROM appointments AS a
            WHERE a.tenant_uid = $1 AND a.start_ts >= $2 AND a.start_ts < $3
            ORDER BY a.start_ts
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(start_ts)
        .bind(end_ts)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|a| a.into()).collect())
    }

    async fn delete_many(&self, appointment_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        let ids = appointment_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let res = sqlx::query(
            r#"
            DELETE FROM appointments AS a
            WHERE a.appointment_uid = ANY($1)
            "#,
        )
        .bind(&ids)
        .execute(&self.pool)
        .await?;

        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
