mod appointment;
mod base;
mod dispatch;
mod schedule;
mod send_record;
mod status;
mod template;
mod tenant;
mod webhook;

use appointment::AppointmentClient;
pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use dispatch::DispatchClient;
pub use dispatch::SendTestReminderInput;
pub use noshow_api_structs::carrier_status_callback::CallbackOutcome;
pub use noshow_api_structs::dtos::*;
pub use noshow_domain::{ReminderTiming, SendStatus, SubscriptionState, ID};
use schedule::ScheduleClient;
pub use schedule::UpsertScheduleInput;
use send_record::SendRecordClient;
use status::StatusClient;
use std::sync::Arc;
use template::TemplateClient;
pub use template::CreateTemplateInput;
use tenant::TenantClient;
pub use tenant::{CreateTenantInput, RenewBillingPeriodInput, SetCalendarConnectionInput};
use webhook::WebhookClient;

// Domain
pub use noshow_api_structs::dtos::AppointmentDTO as Appointment;
pub use noshow_api_structs::dtos::MessageTemplateDTO as MessageTemplate;
pub use noshow_api_structs::dtos::ReminderScheduleDTO as ReminderSchedule;
pub use noshow_api_structs::dtos::SendRecordDTO as SendRecord;
pub use noshow_api_structs::dtos::TenantDTO as Tenant;

/// Noshow Server SDK
///
/// The SDK contains methods for interacting with the reminder server API.
#[derive(Clone)]
pub struct NoShowSDK {
    pub appointment: AppointmentClient,
    pub dispatch: DispatchClient,
    pub schedule: ScheduleClient,
    pub send_record: SendRecordClient,
    pub status: StatusClient,
    pub template: TemplateClient,
    pub tenant: TenantClient,
    pub webhook: WebhookClient,
}

impl NoShowSDK {
    /// `secret` is the bearer secret the server is configured with, if any
    pub fn new<T: Into<String>>(address: String, secret: Option<T>) -> Self {
        let mut base = BaseClient::new(address);
        if let Some(secret) = secret {
            base.set_secret(secret.into());
        }
        let base = Arc::new(base);

        Self {
            appointment: AppointmentClient::new(base.clone()),
            dispatch: DispatchClient::new(base.clone()),
            schedule: ScheduleClient::new(base.clone()),
            send_record: SendRecordClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            template: TemplateClient::new(base.clone()),
            tenant: TenantClient::new(base.clone()),
            webhook: WebhookClient::new(base),
        }
    }
}
