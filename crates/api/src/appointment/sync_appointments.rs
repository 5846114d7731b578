use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use noshow_api_structs::sync_appointments::{APIResponse, PathParams};
use noshow_domain::{plan_appointment_sync, Appointment, ID};
use noshow_infra::{CalendarProviderError, NoShowContext};
use std::collections::HashSet;
use tracing::{error, info};

const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;
/// Length of the synced window starting now
const SYNC_WINDOW_MILLIS: i64 = 8 * DAY_MILLIS;
/// Past appointments still listed by the calendar are matched this far back
const LOOKBACK_MILLIS: i64 = 30 * DAY_MILLIS;

pub async fn sync_appointments_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    let usecase = SyncAppointmentsUseCase {
        tenant_id: path.tenant_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(
                res.created,
                res.updated,
                res.deleted,
                res.appointments,
            ))
        })
        .map_err(NoShowError::from)
}

/// Mirrors the upcoming events of the connected calendar into `Appointment`s
#[derive(Debug)]
pub struct SyncAppointmentsUseCase {
    pub tenant_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug)]
pub enum UseCaseError {
    TenantNotFound(ID),
    CalendarNotConnected,
    Calendar(CalendarProviderError),
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TenantNotFound(tenant_id) => Self::NotFound(format!(
                "The tenant with id: {}, was not found.",
                tenant_id
            )),
            UseCaseError::CalendarNotConnected => {
                Self::BadClientData("The tenant has not connected a calendar yet".into())
            }
            UseCaseError::Calendar(CalendarProviderError::Unauthorized) => Self::BadClientData(
                "The calendar rejected the stored credentials, the calendar must be connected again"
                    .into(),
            ),
            UseCaseError::Calendar(_) | UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncAppointmentsUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncAppointments";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        let tenant = ctx
            .repos
            .tenants
            .find(&self.tenant_id)
            .await
            .ok_or_else(|| UseCaseError::TenantNotFound(self.tenant_id.clone()))?;
        let connection = tenant
            .calendar
            .as_ref()
            .ok_or(UseCaseError::CalendarNotConnected)?;

        let now = ctx.sys.get_timestamp_millis();
        let end = now + SYNC_WINDOW_MILLIS;
        let fetched = ctx
            .calendar
            .list_events(connection, now, end)
            .await
            .map_err(UseCaseError::Calendar)?;

        let stored = ctx
            .repos
            .appointments
            .find_by_tenant_in_window(&tenant.id, now - LOOKBACK_MILLIS, end)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        // Past appointments are only matched, never deleted
        let fetched_ids = fetched.iter().map(|e| e.id.as_str()).collect::<HashSet<_>>();
        let existing = stored
            .into_iter()
            .filter(|a| a.start_ts >= now || fetched_ids.contains(a.calendar_event_id.as_str()))
            .collect::<Vec<_>>();

        let plan = plan_appointment_sync(&tenant.id, existing, &fetched, now);
        if !plan.create.is_empty() {
            ctx.repos
                .appointments
                .bulk_insert(&plan.create)
                .await
                .map_err(|e| {
                    error!("Unable to insert synced appointments. Error: {:?}", e);
                    UseCaseError::StorageError
                })?;
        }
        for appointment in &plan.update {
            ctx.repos
                .appointments
                .save(appointment)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        let deleted = if plan.delete.is_empty() {
            0
        } else {
            ctx.repos
                .appointments
                .delete_many(&plan.delete)
                .await
                .map_err(|_| UseCaseError::StorageError)?
                .deleted_count as usize
        };

        info!(
            "Synced the calendar of tenant: {}. Created: {}, updated: {}, deleted: {}",
            tenant.id,
            plan.create.len(),
            plan.update.len(),
            deleted
        );

        let appointments = ctx
            .repos
            .appointments
            .find_by_tenant_in_window(&tenant.id, now, end)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseResponse {
            created: plan.create.len(),
            updated: plan.update.len(),
            deleted,
            appointments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noshow_domain::{CalendarConnection, CalendarEventSnapshot, SendRecord, Tenant};
    use noshow_infra::{InMemoryCalendarProvider, StaticTimeSys};
    use std::sync::Arc;

    const NOW: i64 = 1710406800000;
    const HOUR: i64 = 1000 * 60 * 60;

    fn event(id: &str, title: &str, start_ts: i64) -> CalendarEventSnapshot {
        CalendarEventSnapshot {
            id: id.into(),
            title: Some(title.into()),
            start_ts,
            end_ts: start_ts + HOUR,
            ..Default::default()
        }
    }

    async fn setup() -> (NoShowContext, Arc<InMemoryCalendarProvider>, Tenant) {
        let mut ctx = NoShowContext::create_inmemory();
        let calendar = Arc::new(InMemoryCalendarProvider::new());
        ctx.calendar = calendar.clone();
        ctx.sys = Arc::new(StaticTimeSys(NOW));

        let mut tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
        tenant.calendar = Some(CalendarConnection {
            calendar_id: "primary".into(),
            access_token: "token".into(),
        });
        ctx.repos.tenants.insert(&tenant).await.unwrap();
        (ctx, calendar, tenant)
    }

    #[actix_web::main]
    #[test]
    async fn creates_updates_and_deletes_in_one_pass() {
        let (ctx, calendar, tenant) = setup().await;
        calendar.add_event("primary", event("a", "Jane Doe 555-123-4567", NOW + HOUR));
        calendar.add_event("primary", event("b", "John Roe", NOW + 2 * HOUR));
        calendar.add_event("primary", event("c", "Sam 555-987-6543", NOW + 3 * HOUR));
        // Other calendars and events outside the window are not synced
        calendar.add_event("other", event("x", "Other", NOW + HOUR));
        calendar.add_event("primary", event("far", "Far", NOW + 9 * 24 * HOUR));

        let mut usecase = SyncAppointmentsUseCase {
            tenant_id: tenant.id.clone(),
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!((res.created, res.updated, res.deleted), (3, 0, 0));
        assert_eq!(res.appointments.len(), 3);
        assert_eq!(res.appointments[0].patient_name, "Jane Doe");
        assert_eq!(
            res.appointments[0].patient_phone,
            Some("+15551234567".into())
        );

        // A reminded appointment keeps its marker across syncs
        let mut reminded = res.appointments[1].clone();
        reminded.mark_reminder_sent(NOW);
        ctx.repos.appointments.save(&reminded).await.unwrap();
        let record = SendRecord::new_pending(
            tenant.id.clone(),
            Some(res.appointments[2].id.clone()),
            Some(ID::new()),
            "+15559876543".into(),
            "Hi".into(),
            NOW,
        );
        ctx.repos.send_records.insert(&record).await.unwrap();

        calendar.remove_event("c");
        calendar.add_event("primary", event("d", "New 555-111-2222", NOW + 4 * HOUR));

        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!((res.created, res.updated, res.deleted), (1, 2, 1));
        let ids = res
            .appointments
            .iter()
            .map(|a| a.calendar_event_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b", "d"]);
        let b = &res.appointments[1];
        assert_eq!(b.id, reminded.id);
        assert!(b.reminder_sent);

        // Send records are never cascade deleted
        assert!(ctx.repos.send_records.find(&record.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn past_appointments_are_kept_and_can_be_moved() {
        let (ctx, calendar, tenant) = setup().await;
        let past = Appointment::from_event(tenant.id.clone(), &event("past", "Jane", NOW - 2 * HOUR), 0);
        let moved = Appointment::from_event(tenant.id.clone(), &event("moved", "John", NOW - HOUR), 0);
        ctx.repos
            .appointments
            .bulk_insert(&[past.clone(), moved.clone()])
            .await
            .unwrap();
        calendar.add_event("primary", event("moved", "John", NOW + HOUR));

        let mut usecase = SyncAppointmentsUseCase {
            tenant_id: tenant.id.clone(),
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!((res.created, res.updated, res.deleted), (0, 1, 0));
        assert_eq!(res.appointments.len(), 1);
        assert_eq!(res.appointments[0].id, moved.id);
        assert_eq!(res.appointments[0].start_ts, NOW + HOUR);
        assert!(ctx.repos.appointments.find(&past.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn requires_a_calendar_connection() {
        let (ctx, _, mut tenant) = setup().await;
        tenant.calendar = None;
        ctx.repos.tenants.save(&tenant).await.unwrap();

        let mut usecase = SyncAppointmentsUseCase {
            tenant_id: tenant.id.clone(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::CalendarNotConnected)
        ));
    }
}
