use crate::error::NoShowError;
use crate::shared::{
    auth::protect_admin_route,
    credit_ledger::{try_reserve, LedgerError, ReserveOutcome},
    usecase::{execute, UseCase},
};
use actix_web::{rt::time::timeout, web, HttpRequest, HttpResponse};
use futures::{stream, StreamExt};
use noshow_api_structs::dispatch_reminders::*;
use noshow_domain::{phone, Appointment, MessageTemplate, ReminderSchedule, SendRecord, Tenant, ID};
use noshow_infra::{CarrierError, NoShowContext, OutboundSms};
use std::time::Duration;
use tracing::{error, info, warn};

/// Tenants processed concurrently in one run. Work for a single tenant stays sequential.
const MAX_CONCURRENT_TENANTS: usize = 4;

pub async fn dispatch_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<NoShowContext>,
) -> Result<HttpResponse, NoShowError> {
    protect_admin_route(&http_req, &ctx)?;

    execute(DispatchRemindersUseCase {}, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                checked: summary.checked,
                sent: summary.sent,
                failed: summary.failed,
                skipped: summary.skipped,
                timestamp: summary.timestamp,
            })
        })
        .map_err(NoShowError::from)
}

/// One run over every enabled `ReminderSchedule`
#[derive(Debug)]
pub struct DispatchRemindersUseCase {}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    CarrierNotConfigured,
    StorageError,
}

impl From<UseCaseError> for NoShowError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::CarrierNotConfigured => {
                Self::Misconfigured("The SMS carrier credentials are not configured".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DispatchSummary {
    pub checked: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub timestamp: i64,
}

impl DispatchSummary {
    fn merge(&mut self, other: &DispatchSummary) {
        self.checked += other.checked;
        self.sent += other.sent;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchRemindersUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchReminders";

    async fn execute(&mut self, ctx: &NoShowContext) -> Result<Self::Response, Self::Error> {
        if !ctx.carrier.is_configured() {
            return Err(UseCaseError::CarrierNotConfigured);
        }

        let now = ctx.sys.get_timestamp_millis();
        let schedules = ctx
            .repos
            .reminder_schedules
            .find_enabled()
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let tenant_summaries = stream::iter(group_by_tenant(schedules))
            .map(|(tenant_id, schedules)| dispatch_tenant(tenant_id, schedules, now, ctx))
            .buffer_unordered(MAX_CONCURRENT_TENANTS)
            .collect::<Vec<_>>()
            .await;

        let mut summary = DispatchSummary {
            timestamp: now,
            ..Default::default()
        };
        for tenant_summary in &tenant_summaries {
            summary.merge(tenant_summary);
        }

        info!(
            checked = summary.checked,
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Reminder dispatch run finished"
        );
        Ok(summary)
    }
}

/// Keeps the order the schedules were found in, both across and within tenants
fn group_by_tenant(schedules: Vec<ReminderSchedule>) -> Vec<(ID, Vec<ReminderSchedule>)> {
    let mut groups: Vec<(ID, Vec<ReminderSchedule>)> = Vec::new();
    for schedule in schedules {
        match groups.iter_mut().find(|(id, _)| *id == schedule.tenant_id) {
            Some((_, group)) => group.push(schedule),
            None => groups.push((schedule.tenant_id.clone(), vec![schedule])),
        }
    }
    groups
}

async fn dispatch_tenant(
    tenant_id: ID,
    schedules: Vec<ReminderSchedule>,
    now: i64,
    ctx: &NoShowContext,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    // Looked up once for all the schedules of the tenant in this run
    let tenant = match ctx.repos.tenants.find(&tenant_id).await {
        Some(tenant) => tenant,
        None => {
            warn!("Tenant: {} of enabled reminder schedules was not found", tenant_id);
            return summary;
        }
    };
    if tenant.has_exhausted_trial() {
        info!("Tenant: {} has exhausted its trial, skipping its schedules", tenant.id);
        return summary;
    }

    let mut halted = false;
    for schedule in schedules {
        let template = match ctx.repos.message_templates.find(&schedule.template_id).await {
            Some(template) if template.tenant_id == tenant.id => template,
            _ => {
                warn!(
                    "Template: {} of the {} schedule of tenant: {} was not found, skipping the schedule",
                    schedule.template_id, schedule.timing, tenant.id
                );
                continue;
            }
        };

        let window = schedule
            .timing
            .target_window(now, &ctx.config.dispatch_timezone);
        let appointments = match ctx
            .repos
            .appointments
            .find_by_tenant_in_window(&tenant.id, window.start_ts, window.end_ts.saturating_add(1))
            .await
        {
            Ok(appointments) => appointments,
            Err(e) => {
                error!(
                    "Unable to load appointments of tenant: {}. Error: {:?}",
                    tenant.id, e
                );
                continue;
            }
        };

        if halted {
            // Nothing more is sent for the tenant in this run
            summary.checked += appointments.len();
            summary.skipped += appointments.len();
            continue;
        }
        halted = dispatch_schedule(&tenant, &template, appointments, &mut summary, ctx).await;
    }

    summary
}

/// Returns `true` when the tenant ran out of credits and its batch stops for this run
async fn dispatch_schedule(
    tenant: &Tenant,
    template: &MessageTemplate,
    appointments: Vec<Appointment>,
    summary: &mut DispatchSummary,
    ctx: &NoShowContext,
) -> bool {
    let total = appointments.len();
    for (index, appointment) in appointments.into_iter().enumerate() {
        summary.checked += 1;

        let recipient = match appointment.patient_phone.as_deref().and_then(phone::normalize) {
            Some(recipient) => recipient,
            None => {
                summary.skipped += 1;
                continue;
            }
        };

        match ctx
            .repos
            .send_records
            .exists_for(&appointment.id, &template.id)
            .await
        {
            Ok(false) => {}
            Ok(true) => {
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                error!(
                    "Unable to check send records of appointment: {}. Error: {:?}",
                    appointment.id, e
                );
                summary.skipped += 1;
                continue;
            }
        }

        let reservation = match try_reserve(&tenant.id, ctx).await {
            Ok(ReserveOutcome::Admitted(reservation)) => reservation,
            Ok(ReserveOutcome::Denied(denial)) => {
                info!("Tenant: {} was denied a send: {}", tenant.id, denial);
                let remaining = total - index - 1;
                summary.checked += remaining;
                summary.skipped += 1 + remaining;
                return true;
            }
            Err(LedgerError::TenantNotFound(_)) => {
                warn!("Tenant: {} disappeared during the dispatch run", tenant.id);
                let remaining = total - index - 1;
                summary.checked += remaining;
                summary.skipped += 1 + remaining;
                return true;
            }
        };

        let vars = super::reminder_vars(tenant, &appointment, &ctx.config.dispatch_timezone);
        let record = SendRecord::new_pending(
            tenant.id.clone(),
            Some(appointment.id.clone()),
            Some(template.id.clone()),
            recipient,
            template.render(&vars),
            ctx.sys.get_timestamp_millis(),
        );
        if let Err(e) = ctx.repos.send_records.insert(&record).await {
            warn!(
                "Unable to store the send record for appointment: {}, not sending. Error: {:?}",
                appointment.id, e
            );
            summary.skipped += 1;
            continue;
        }

        match send(&record, ctx).await {
            Ok(message_id) => {
                let sent_at = ctx.sys.get_timestamp_millis();
                // A status callback may have advanced the stored record already
                let mut stored = ctx
                    .repos
                    .send_records
                    .find(&record.id)
                    .await
                    .unwrap_or(record);
                stored.mark_sent(message_id, sent_at);
                if let Err(e) = ctx.repos.send_records.save(&stored).await {
                    error!("Unable to save sent record: {}. Error: {:?}", stored.id, e);
                }

                let mut appointment = appointment;
                appointment.mark_reminder_sent(sent_at);
                if let Err(e) = ctx.repos.appointments.save(&appointment).await {
                    error!(
                        "Unable to mark appointment: {} as reminded. Error: {:?}",
                        appointment.id, e
                    );
                }

                if let Err(e) = reservation.commit(ctx).await {
                    error!(
                        "Unable to spend the credit of tenant: {}. Error: {:?}",
                        tenant.id, e
                    );
                }
                summary.sent += 1;
            }
            Err(e) => {
                warn!(
                    "Reminder for appointment: {} could not be sent. Error: {}",
                    appointment.id, e
                );
                let mut record = record;
                record.mark_failed(e.code(), e.to_string());
                if let Err(e) = ctx.repos.send_records.save(&record).await {
                    error!("Unable to save failed record: {}. Error: {:?}", record.id, e);
                }
                summary.failed += 1;
            }
        }
    }

    false
}

/// Hands the rendered message to the carrier, bounded by the per item timeout
pub async fn send(record: &SendRecord, ctx: &NoShowContext) -> Result<String, CarrierError> {
    let sms = OutboundSms {
        to: record.recipient.clone(),
        body: record.body.clone(),
        status_callback: ctx.config.carrier_status_callback_url(),
    };
    let limit = Duration::from_secs(ctx.config.dispatch_item_timeout_secs);

    match timeout(limit, ctx.carrier.send(&sms)).await {
        Ok(res) => res.map(|receipt| receipt.message_id),
        Err(_) => Err(CarrierError::Transport(format!(
            "The carrier did not respond within {} seconds",
            limit.as_secs()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noshow_domain::{
        CalendarEventSnapshot, ReminderTiming, SendStatus, SubscriptionState,
    };
    use noshow_infra::{InMemorySmsCarrier, StaticTimeSys};
    use std::sync::Arc;

    // 2024-03-14T09:00:00Z, a thursday
    const NOW: i64 = 1710406800000;
    // 2024-03-14T15:00:00Z
    const LATER_TODAY: i64 = 1710428400000;
    const DAY: i64 = 1000 * 60 * 60 * 24;

    struct TestContext {
        ctx: NoShowContext,
        carrier: Arc<InMemorySmsCarrier>,
        tenant: Tenant,
        template: MessageTemplate,
    }

    async fn setup(credits: i64) -> TestContext {
        let mut ctx = NoShowContext::create_inmemory();
        let carrier = Arc::new(InMemorySmsCarrier::new());
        ctx.carrier = carrier.clone();
        ctx.sys = Arc::new(StaticTimeSys(NOW));
        ctx.config.dispatch_timezone = chrono_tz::UTC;
        ctx.config.public_base_url = None;

        let mut tenant = Tenant::new_trial("Smile Dental".into(), None, 0);
        tenant.credits = credits;
        ctx.repos.tenants.insert(&tenant).await.unwrap();

        let template = MessageTemplate::new(
            tenant.id.clone(),
            "Same day".into(),
            "Hi {{patientName}}, see you {{appointmentDate}} at {{appointmentTime}}. {{clinicName}}, {{clinicPhone}}".into(),
        );
        ctx.repos.message_templates.insert(&template).await.unwrap();
        let schedule = ReminderSchedule::new(tenant.id.clone(), ReminderTiming::SameDay, template.id.clone());
        ctx.repos.reminder_schedules.upsert(&schedule).await.unwrap();

        TestContext {
            ctx,
            carrier,
            tenant,
            template,
        }
    }

    async fn insert_appointment(ctx: &NoShowContext, tenant: &Tenant, title: &str, start_ts: i64) -> Appointment {
        let event = CalendarEventSnapshot {
            id: ID::new().as_string(),
            title: Some(title.into()),
            start_ts,
            end_ts: start_ts + 1000 * 60 * 30,
            ..Default::default()
        };
        let appointment = Appointment::from_event(tenant.id.clone(), &event, 0);
        ctx.repos.appointments.bulk_insert(&[appointment.clone()]).await.unwrap();
        appointment
    }

    async fn run(ctx: &NoShowContext) -> DispatchSummary {
        let mut usecase = DispatchRemindersUseCase {};
        usecase.execute(ctx).await.unwrap()
    }

    #[actix_web::main]
    #[test]
    async fn sends_due_reminders_once() {
        let TestContext {
            ctx,
            carrier,
            tenant,
            template,
        } = setup(20).await;
        let first = insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;
        insert_appointment(&ctx, &tenant, "John Roe (555) 987-6543", LATER_TODAY + 1000).await;
        // Tomorrow is outside the same day window
        insert_appointment(&ctx, &tenant, "Tom 555-000-1111", LATER_TODAY + DAY).await;

        let summary = run(&ctx).await;
        assert_eq!(
            summary,
            DispatchSummary {
                checked: 2,
                sent: 2,
                failed: 0,
                skipped: 0,
                timestamp: NOW,
            }
        );

        let sent = carrier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "+15551234567");
        assert_eq!(
            sent[0].body,
            "Hi Jane Doe, see you Thursday, March 14 at 3:00 PM. Smile Dental, the clinic"
        );

        let appointment = ctx.repos.appointments.find(&first.id).await.unwrap();
        assert!(appointment.reminder_sent);
        assert_eq!(appointment.reminder_sent_at, Some(NOW));
        assert!(ctx
            .repos
            .send_records
            .exists_for(&first.id, &template.id)
            .await
            .unwrap());
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 18);

        // A second run over the same window sends nothing new
        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(carrier.sent().len(), 2);
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 18);
    }

    #[actix_web::main]
    #[test]
    async fn stops_the_tenant_batch_when_credits_run_out() {
        let TestContext {
            ctx, carrier, tenant, ..
        } = setup(1).await;
        insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;
        insert_appointment(&ctx, &tenant, "John Roe 555-987-6543", LATER_TODAY + 1000).await;

        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(carrier.sent().len(), 1);

        let records = ctx
            .repos
            .send_records
            .find_recent_by_tenant(&tenant.id, 10)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, SendStatus::Sent);
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 0);
    }

    #[actix_web::main]
    #[test]
    async fn counts_every_schedule_left_after_a_denial() {
        let TestContext {
            ctx,
            carrier,
            tenant,
            template,
        } = setup(1).await;
        let schedule = ReminderSchedule::new(tenant.id.clone(), ReminderTiming::OneDay, template.id.clone());
        ctx.repos.reminder_schedules.upsert(&schedule).await.unwrap();
        insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;
        insert_appointment(&ctx, &tenant, "John Roe 555-987-6543", LATER_TODAY + 1000).await;
        insert_appointment(&ctx, &tenant, "Tom Poe 555-000-1111", LATER_TODAY + DAY).await;

        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 3);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(carrier.sent().len(), 1);
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 0);
    }

    #[actix_web::main]
    #[test]
    async fn a_missing_tenant_does_not_stop_the_others() {
        let TestContext {
            ctx,
            carrier,
            tenant,
            template,
        } = setup(20).await;
        let orphan = ReminderSchedule::new(ID::new(), ReminderTiming::SameDay, ID::new());
        ctx.repos.reminder_schedules.upsert(&orphan).await.unwrap();
        let appointment = insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;

        let mut usecase = DispatchRemindersUseCase {};
        let summary = usecase.execute(&ctx).await.expect("The run to succeed");
        assert_eq!(summary.checked, 1);
        assert_eq!(summary.sent, 1);
        assert_eq!(carrier.sent().len(), 1);

        let records = ctx
            .repos
            .send_records
            .find_recent_by_tenant(&tenant.id, 10)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, SendStatus::Sent);
        assert_eq!(records[0].appointment_id, Some(appointment.id.clone()));
        assert_eq!(records[0].template_id, Some(template.id.clone()));
    }

    #[actix_web::main]
    #[test]
    async fn skips_appointments_without_a_valid_phone() {
        let TestContext {
            ctx, carrier, tenant, ..
        } = setup(20).await;
        insert_appointment(&ctx, &tenant, "Walk in", LATER_TODAY).await;
        let mut appointment = insert_appointment(&ctx, &tenant, "Jane Doe", LATER_TODAY + 1000).await;
        appointment.patient_phone = Some("+44 20 7946 0958".into());
        ctx.repos.appointments.save(&appointment).await.unwrap();

        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.sent, 0);
        assert!(carrier.sent().is_empty());
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 20);
    }

    #[actix_web::main]
    #[test]
    async fn isolates_carrier_failures() {
        let TestContext {
            ctx,
            carrier,
            tenant,
            template,
        } = setup(20).await;
        carrier.reject_recipient("+15551234567");
        let rejected = insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;
        insert_appointment(&ctx, &tenant, "John Roe 555-987-6543", LATER_TODAY + 1000).await;

        let summary = run(&ctx).await;
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(ctx.repos.tenants.find(&tenant.id).await.unwrap().credits, 19);

        let appointment = ctx.repos.appointments.find(&rejected.id).await.unwrap();
        assert!(!appointment.reminder_sent);
        let records = ctx
            .repos
            .send_records
            .find_recent_by_tenant(&tenant.id, 10)
            .await
            .unwrap();
        let failed = records
            .iter()
            .find(|r| r.status == SendStatus::Failed)
            .expect("A failed record");
        assert_eq!(failed.error_code, Some("21211".into()));
        assert!(failed.error_message.is_some());

        // The failed reminder is not retried automatically
        let summary = run(&ctx).await;
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.sent, 0);
        assert!(ctx
            .repos
            .send_records
            .exists_for(&rejected.id, &template.id)
            .await
            .unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn skips_exhausted_trials_and_missing_templates() {
        let TestContext {
            ctx, carrier, tenant, ..
        } = setup(0).await;
        insert_appointment(&ctx, &tenant, "Jane Doe 555-123-4567", LATER_TODAY).await;
        assert_eq!(tenant.subscription, SubscriptionState::Trial);

        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 0);
        assert!(carrier.sent().is_empty());

        // Schedule pointing at a template that does not exist
        let mut other = Tenant::new_trial("Other".into(), None, 0);
        other.credits = 5;
        ctx.repos.tenants.insert(&other).await.unwrap();
        let schedule = ReminderSchedule::new(other.id.clone(), ReminderTiming::SameDay, ID::new());
        ctx.repos.reminder_schedules.upsert(&schedule).await.unwrap();
        insert_appointment(&ctx, &other, "Jane Doe 555-123-4567", LATER_TODAY).await;

        let summary = run(&ctx).await;
        assert_eq!(summary.checked, 0);
        assert!(carrier.sent().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn fails_without_carrier_credentials() {
        let TestContext { mut ctx, .. } = setup(20).await;
        ctx.carrier = Arc::new(InMemorySmsCarrier::unconfigured());

        let mut usecase = DispatchRemindersUseCase {};
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::CarrierNotConfigured
        );
    }
}
