mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
pub use inmemory::InMemoryAppointmentRepo;
use noshow_domain::{Appointment, ID};
pub use postgres::PostgresAppointmentRepo;

#[async_trait::async_trait]
pub trait IAppointmentRepo: Send + Sync {
    async fn bulk_insert(&self, appointments: &[Appointment]) -> anyhow::Result<()>;
    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()>;
    async fn find(&self, appointment_id: &ID) -> Option<Appointment>;
    /// Appointments of the tenant starting in `[start_ts, end_ts)`, earliest first
    async fn find_by_tenant_in_window(
        &self,
        tenant_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>>;
    async fn delete_many(&self, appointment_ids: &[ID]) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::{setup_context, NoShowContext};
    use noshow_domain::{Appointment, CalendarEventSnapshot, Tenant};

    async fn create_contexts() -> Vec<NoShowContext> {
        vec![NoShowContext::create_inmemory(), setup_context().await]
    }

    fn appointment(tenant: &Tenant, event_id: &str, start_ts: i64) -> Appointment {
        let event = CalendarEventSnapshot {
            id: event_id.into(),
            title: Some("Jane Doe 555-123-4567".into()),
            start_ts,
            end_ts: start_ts + 1000 * 60 * 30,
            ..Default::default()
        };
        Appointment::from_event(tenant.id.clone(), &event, 0)
    }

    #[tokio::test]
    async fn find_in_window_is_ordered_and_half_open() {
        for ctx in create_contexts().await {
            let tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
            ctx.repos.tenants.insert(&tenant).await.expect("To insert tenant");
            let repo = &ctx.repos.appointments;

            let late = appointment(&tenant, "late", 5000);
            let early = appointment(&tenant, "early", 1000);
            let outside = appointment(&tenant, "outside", 10000);
            repo.bulk_insert(&[late.clone(), early.clone(), outside.clone()])
                .await
                .expect("To insert appointments");

            let found = repo
                .find_by_tenant_in_window(&tenant.id, 1000, 10000)
                .await
                .expect("To find appointments");
            let ids = found.iter().map(|a| a.id.clone()).collect::<Vec<_>>();
            assert_eq!(ids, vec![early.id.clone(), late.id.clone()]);
        }
    }

    #[tokio::test]
    async fn save_and_delete_many() {
        for ctx in create_contexts().await {
            let tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
            ctx.repos.tenants.insert(&tenant).await.expect("To insert tenant");
            let repo = &ctx.repos.appointments;

            let mut first = appointment(&tenant, "first", 1000);
            let second = appointment(&tenant, "second", 2000);
            repo.bulk_insert(&[first.clone(), second.clone()])
                .await
                .expect("To insert appointments");

            first.mark_reminder_sent(50);
            repo.save(&first).await.expect("To save appointment");
            assert_eq!(repo.find(&first.id).await, Some(first.clone()));

            let res = repo
                .delete_many(&[first.id.clone(), second.id.clone()])
                .await
                .expect("To delete appointments");
            assert_eq!(res.deleted_count, 2);
            assert!(repo.find(&first.id).await.is_none());
        }
    }
}
