use super::ITenantRepo;
use crate::repos::shared::repo::DecodeError;
use noshow_domain::{CalendarConnection, Tenant, ID};
use serde_json::Value;
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};
use tracing::error;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRaw {
    tenant_uid: Uuid,
    clinic_name: String,
    clinic_phone: Option<String>,
    subscription: String,
    credits: i64,
    billing_renews_at: Option<i64>,
    calendar: Option<Value>,
    created: i64,
}

impl TryFrom<TenantRaw> for Tenant {
    type Error = DecodeError;

    fn try_from(e: TenantRaw) -> Result<Self, Self::Error> {
        let subscription = e
            .subscription
            .parse()
            .map_err(|_| DecodeError::new("tenants", "subscription", &e.subscription))?;
        if e.credits < 0 {
            return Err(DecodeError::new("tenants", "credits", e.credits.to_string()));
        }
        let calendar = match e.calendar {
            Some(json) => Some(
                serde_json::from_value::<CalendarConnection>(json.clone())
                    .map_err(|_| DecodeError::new("tenants", "calendar", json.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            id: e.tenant_uid.into(),
            clinic_name: e.clinic_name,
            clinic_phone: e.clinic_phone,
            subscription,
            credits: e.credits,
            billing_renews_at: e.billing_renews_at,
            calendar,
            created: e.created,
        })
    }
}

#[async_trait::async_trait]
impl ITenantRepo for PostgresTenantRepo {
    async fn insert(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants(tenant_uid, clinic_name, clinic_phone, subscription, credits, billing_renews_at, calendar, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.clinic_name)
        .bind(&tenant.clinic_phone)
        .bind(tenant.subscription.as_str())
        .bind(tenant.credits)
        .bind(tenant.billing_renews_at)
        .bind(tenant.calendar.as_ref().map(Json))
        .bind(tenant.created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert tenant: {:?}. DB returned error: {:?}",
                tenant.id, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, tenant: &Tenant) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE tenants SET
                clinic_name = $2,
                clinic_phone = $3,
                subscription = $4,
                credits = $5,
                billing_renews_at = $6,
                calendar = $7
            WHERE tenant_uid = $1
            "#,
        )
        .bind(tenant.id.inner_ref())
        .bind(&tenant.clinic_name)
        .bind(&tenant.clinic_phone)
        .bind(tenant.subscription.as_str())
        .bind(tenant.credits)
        .bind(tenant.billing_renews_at)
        .bind(tenant.calendar.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save tenant: {:?}. DB returned error: {:?}",
                tenant.id, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, tenant_id: &ID) -> Option<Tenant> {
        let res: Option<TenantRaw> = sqlx::query_as(
            r#"
            SELECT * FROM tenants AS t
            WHERE t.tenant_uid = $1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find tenant with id: {:?} failed. DB returned error: {:?}",
                tenant_id, e
            );
            e
        })
        .ok()?;

        res.and_then(|raw| {
            Tenant::try_from(raw)
                .map_err(|e| error!("Unable to decode tenant: {:?}", e))
                .ok()
        })
    }

    async fn decrement_credits(&self, tenant_id: &ID) -> anyhow::Result<Option<i64>> {
        let remaining: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE tenants SET credits = credits - 1
            WHERE tenant_uid = $1 AND credits > 0
            RETURNING credits
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to decrement credits of tenant: {:?}. DB returned error: {:?}",
                tenant_id, e
            );
            e
        })?;

        Ok(remaining.map(|(credits,)| credits))
    }
}
