use super::IMessageTemplateRepo;
use noshow_domain::{MessageTemplate, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresMessageTemplateRepo {
    pool: PgPool,
}

impl PostgresMessageTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MessageTemplateRaw {
    template_uid: Uuid,
    tenant_uid: Uuid,
    name: String,
    body: String,
    is_default: bool,
}

impl From<MessageTemplateRaw> for MessageTemplate {
    fn from(e: MessageTemplateRaw) -> Self {
        Self {
            id: e.template_uid.into(),
            tenant_id: e.tenant_uid.into(),
            name: e.name,
            body: e.body,
            is_default: e.is_default,
        }
    }
}

#[async_trait::async_trait]
impl IMessageTemplateRepo for PostgresMessageTemplateRepo {
    async fn insert(&self, template: &MessageTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO message_templates(template_uid, tenant_uid, name, body, is_default)
            VALUES($1, $2, $3, $4, $5)
            "#,
        )
        .bind(template.id.inner_ref())
        .bind(template.tenant_id.inner_ref())
        .bind(&template.name)
        .bind(&template.body)
        .bind(template.is_default)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert message template: {:?}. DB returned error: {:?}",
                template.id, e
            );
            e
        })?;

        Ok(())
    }

    async fn bulk_insert(&self, templates: &[MessageTemplate]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for template in templates {
            sqlx::query(
                r#"
                INSERT INTO message_templates(template_uid, tenant_uid, name, body, is_default)
                VALUES($1, $2, $3, $4, $5)
                "#,
            )
            .bind(template.id.inner_ref())
            .bind(template.tenant_id.inner_ref())
            .bind(&template.name)
            .bind(&template.body)
            .bind(template.is_default)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn find(&self, template_id: &ID) -> Option<MessageTemplate> {
        let res: Option<MessageTemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM message_templates AS m
            WHERE m.template_uid = $1
            "#,
        )
        .bind(template_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find message template with id: {:?} failed. DB returned error: {:?}",
                template_id, e
            );
            e
        })
        .ok()?;

        res.map(|template| template.into())
    }

    async fn find_by_tenant(&self, tenant_id: &ID) -> anyhow::Result<Vec<MessageTemplate>> {
        let rows: Vec<MessageTemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM message_templates AS m
            WHERE m.tenant_uid = $1
            ORDER BY m.name
            "#,
        )
        .bind(tenant_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|t| t.into()).collect())
    }

    async fn unset_default(&self, tenant_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE message_templates SET is_default = false
            WHERE tenant_uid = $1 AND is_default
            "#,
        )
        .bind(tenant_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
