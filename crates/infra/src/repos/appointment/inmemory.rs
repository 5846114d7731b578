use super::IAppointmentRepo;
use crate::repos::shared::{inmemory_repo::*, repo::DeleteResult};
use noshow_domain::{Appointment, ID};

pub struct InMemoryAppointmentRepo {
    appointments: std::sync::Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepo {
    pub fn new() -> Self {
        Self {
            appointments: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAppointmentRepo for InMemoryAppointmentRepo {
    async fn bulk_insert(&self, appointments: &[Appointment]) -> anyhow::Result<()> {
        for appointment in appointments {
            insert(appointment, &self.appointments);
        }
        Ok(())
    }

    async fn save(&self, appointment: &Appointment) -> anyhow::Result<()> {
        save(appointment, &self.appointments);
        Ok(())
    }

    async fn find(&self, appointment_id: &ID) -> Option<Appointment> {
        find(appointment_id, &self.appointments)
    }

    async fn find_by_tenant_in_window(
        &self,
        tenant_id: &ID,
        start_ts: i64,
        end_ts: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        let mut appointments = find_by(&self.appointments, |a| {
            a.tenant_id == *tenant_id && a.start_ts >= start_ts && a.start_ts < end_ts
        });
        appointments.sort_by_key(|a| a.start_ts);
        Ok(appointments)
    }

    async fn delete_many(&self, appointment_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.appointments, |a| appointment_ids.contains(&a.id)))
    }
}
