use super::ISendRecordRepo;
use crate::repos::shared::repo::{decode_all, DecodeError};
use noshow_domain::{SendRecord, SendStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresSendRecordRepo {
    pool: PgPool,
}

impl PostgresSendRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SendRecordRaw {
    send_record_uid: Uuid,
    tenant_uid: Uuid,
    appointment_uid: Option<Uuid>,
    template_uid: Option<Uuid>,
    recipient: String,
    body: String,
    status: String,
    carrier_message_id: Option<String>,
    error_code: Option<String>,
    error_message: Option<String>,
    created: i64,
    sent_at: Option<i64>,
    delivered_at: Option<i64>,
}

impl TryFrom<SendRecordRaw> for SendRecord {
    type Error = DecodeError;

    fn try_from(e: SendRecordRaw) -> Result<Self, Self::Error> {
        let status = e
            .status
            .parse()
            .map_err(|_| DecodeError::new("send_records", "status", &e.status))?;
        Ok(Self {
            id: e.send_record_uid.into(),
            tenant_id: e.tenant_uid.into(),
            appointment_id: e.appointment_uid.map(ID::from),
            template_id: e.template_uid.map(ID::from),
            recipient: e.recipient,
            body: e.body,
            status,
            carrier_message_id: e.carrier_message_id,
            error_code: e.error_code,
            error_message: e.error_message,
            created: e.created,
            sent_at: e.sent_at,
            delivered_at: e.delivered_at,
        })
    }
}

fn decode_one(raw: SendRecordRaw) -> Option<SendRecord> {
    SendRecord::try_from(raw)
        .map_err(|e| error!("Unable to decode send record: {:?}", e))
        .ok()
}

#[async_trait::async_trait]
impl ISendRecordRepo for PostgresSendRecordRepo {
    async fn insert(&self, record: &SendRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO send_records(
                send_record_uid, tenant_uid, appointment_uid, template_uid, recipient, body, status,
                carrier_message_id, error_code, error_message, created, sent_at, delivered_at
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(record.id.inner_ref())
        .bind(record.tenant_id.inner_ref())
        .bind(record.appointment_id.as_ref().map(|id| *id.inner_ref()))
        .bind(record.template_id.as_ref().map(|id| *id.inner_ref()))
        .bind(&record.recipient)
        .bind(&record.body)
        .bind(record.status.as_str())
        .bind(&record.carrier_message_id)
        .bind(&record.error_code)
        .bind(&record.error_message)
        .bind(record.created)
        .bind(record.sent_at)
        .bind(record.delivered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert send record: {:?}. DB returned error: {:?}",
                record.id, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, record: &SendRecord) -> anyhow::Result<bool> {
        let movable_from = SendStatus::ALL
            .iter()
            .filter(|status| status.can_move_to(record.status))
            .map(|status| status.as_str().to_string())
            .collect::<Vec<_>>();
        let res = sqlx::query(
            r#"
            UPDATE send_records SET
                status = $2,
                carrier_message_id = $3,
                error_code = $4,
                error_message = $5,
                sent_at = $6,
                delivered_at = $7
            WHERE send_record_uid = $1 AND status = ANY($8)
            "#,
        )
        .bind(record.id.inner_ref())
        .bind(record.status.as_str())
        .bind(&record.carrier_message_id)
        .bind(&record.error_code)
        .bind(&record.error_message)
        .bind(record.sent_at)
        .bind(record.delivered_at)
        .bind(&movable_from)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save send record: {:?}. DB returned error: {:?}",
                record.id, e
            );
            e
        })?;

        Ok(res.rows_affected() == 1)
    }

    async fn find(&self, record_id: &ID) -> Option<SendRecord> {
        let res: Option<SendRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM send_records AS s
            WHERE s.send_record_uid = $1
            "#,
        )
        .bind(record_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find send record with id: {:?} failed. DB returned error: {:?}",
                record_id, e
            );
            e
        })
        .ok()?;

        res.and_then(decode_one)
    }

    async fn exists_for(&self, appointment_id: &ID, template_id: &ID) -> anyhow::Result<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM send_records AS s
                WHERE s.appointment_uid = $1 AND s.template_uid = $2
            )
            "#,
        )
        .bind(appointment_id.inner_ref())
        .bind(template_id.inner_ref())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_by_carrier_message_id(&self, carrier_message_id: &str) -> Option<SendRecord> {
        let res: Option<SendRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM send_records AS s
            WHERE s.carrier_message_id = $1
            "#,
        )
        .bind(carrier_message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find send record with carrier message id: {} failed. DB returned error: {:?}",
                carrier_message_id, e
            );
            e
        })
        .ok()?;

        res.and_then(decode_one)
    }

    async fn find_recent_by_tenant(
        &self,
        tenant_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<SendRecord>> {
        let rows: Vec<SendRecordRaw> = sqlx::query_as(
            r#"
            SELECT * FROM send_records AS s
            WHERE s.tenant_uid = $1
            ORDER BY s.created DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_all(rows)?)
    }
}
