mod appointment;
mod calendar;
mod credit;
pub mod date;
pub mod phone;
mod reminder_schedule;
mod send_record;
mod shared;
mod template;
mod tenant;

pub use appointment::Appointment;
pub use calendar::{
    plan_appointment_sync, AppointmentSyncPlan, CalendarAttendee, CalendarEventSnapshot,
};
pub use credit::{Admission, Denial, DenialReason, RemediationAction};
pub use date::DayWindow;
pub use reminder_schedule::{InvalidReminderTiming, ReminderSchedule, ReminderTiming};
pub use send_record::{compose_carrier_error, InvalidSendStatus, SendRecord, SendStatus};
pub use shared::entity::{Entity, ID};
pub use template::{render, unknown_placeholders, MessageTemplate, Placeholder, TemplateVars};
pub use tenant::{
    CalendarConnection, InvalidSubscriptionState, SubscriptionState, Tenant, TRIAL_CREDITS,
};

pub use chrono_tz::Tz;
