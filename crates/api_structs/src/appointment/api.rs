use crate::dtos::AppointmentDTO;
use noshow_domain::{Appointment, ID};
use serde::{Deserialize, Serialize};

pub mod sync_appointments {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub tenant_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub created: usize,
        pub updated: usize,
        pub deleted: usize,
        /// The appointments in the synced window after reconciliation
        pub appointments: Vec<AppointmentDTO>,
    }

    impl APIResponse {
        pub fn new(created: usize, updated: usize, deleted: usize, appointments: Vec<Appointment>) -> Self {
            Self {
                created,
                updated,
                deleted,
                appointments: appointments.into_iter().map(AppointmentDTO::new).collect(),
            }
        }
    }
}
