mod dispatch_reminders;
mod send_test_reminder;

use actix_web::web;
use dispatch_reminders::dispatch_reminders_controller;
pub use dispatch_reminders::DispatchRemindersUseCase;
use noshow_domain::{date, Appointment, Placeholder, Tenant, TemplateVars, Tz};
use send_test_reminder::send_test_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reminders/dispatch",
        web::post().to(dispatch_reminders_controller),
    );
    cfg.route(
        "/tenants/{tenant_id}/test-send",
        web::post().to(send_test_reminder_controller),
    );
}

fn template_vars(
    tenant: &Tenant,
    patient_name: &str,
    appointment_ts: i64,
    tz: &Tz,
) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.insert(
        Placeholder::PatientName.name().into(),
        Some(patient_name.to_string()),
    );
    vars.insert(
        Placeholder::AppointmentDate.name().into(),
        Some(date::format_date(appointment_ts, tz)),
    );
    vars.insert(
        Placeholder::AppointmentTime.name().into(),
        Some(date::format_time(appointment_ts, tz)),
    );
    vars.insert(
        Placeholder::ClinicName.name().into(),
        Some(tenant.clinic_name.clone()),
    );
    vars.insert(
        Placeholder::ClinicPhone.name().into(),
        Some(tenant.clinic_phone_or_fallback()),
    );
    vars
}

/// Values a reminder for `appointment` is rendered with
pub fn reminder_vars(tenant: &Tenant, appointment: &Appointment, tz: &Tz) -> TemplateVars {
    template_vars(tenant, &appointment.patient_name, appointment.start_ts, tz)
}

/// Values a test send is rendered with: a sample patient with an appointment tomorrow
pub fn sample_vars(tenant: &Tenant, now: i64, tz: &Tz) -> TemplateVars {
    const SAMPLE_PATIENT_NAME: &str = "Alex";
    const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;
    template_vars(tenant, SAMPLE_PATIENT_NAME, now + DAY_MILLIS, tz)
}
