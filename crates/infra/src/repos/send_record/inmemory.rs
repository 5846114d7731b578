use super::ISendRecordRepo;
use crate::repos::shared::inmemory_repo::*;
use noshow_domain::{SendRecord, ID};

pub struct InMemorySendRecordRepo {
    records: std::sync::Mutex<Vec<SendRecord>>,
}

impl InMemorySendRecordRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn same_reminder(a: &SendRecord, b: &SendRecord) -> bool {
    match (&a.appointment_id, &a.template_id) {
        (Some(appointment_id), Some(template_id)) => {
            b.appointment_id.as_ref() == Some(appointment_id)
                && b.template_id.as_ref() == Some(template_id)
        }
        _ => false,
    }
}

#[async_trait::async_trait]
impl ISendRecordRepo for InMemorySendRecordRepo {
    async fn insert(&self, record: &SendRecord) -> anyhow::Result<()> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|existing| same_reminder(record, existing)) {
            anyhow::bail!(
                "A send record already exists for appointment: {:?} and template: {:?}",
                record.appointment_id,
                record.template_id
            );
        }
        records.push(record.clone());
        Ok(())
    }

    async fn save(&self, record: &SendRecord) -> anyhow::Result<bool> {
        let updated = update_one(
            &self.records,
            |r| r.id == record.id && r.status.can_move_to(record.status),
            |r| *r = record.clone(),
        );
        Ok(updated.is_some())
    }

    async fn find(&self, record_id: &ID) -> Option<SendRecord> {
        find(record_id, &self.records)
    }

    async fn exists_for(&self, appointment_id: &ID, template_id: &ID) -> anyhow::Result<bool> {
        let existing = find_one_by(&self.records, |r| {
            r.appointment_id.as_ref() == Some(appointment_id)
                && r.template_id.as_ref() == Some(template_id)
        });
        Ok(existing.is_some())
    }

    async fn find_by_carrier_message_id(&self, carrier_message_id: &str) -> Option<SendRecord> {
        find_one_by(&self.records, |r| {
            r.carrier_message_id.as_deref() == Some(carrier_message_id)
        })
    }

    async fn find_recent_by_tenant(
        &self,
        tenant_id: &ID,
        limit: usize,
    ) -> anyhow::Result<Vec<SendRecord>> {
        let mut records = find_by(&self.records, |r| r.tenant_id == *tenant_id);
        records.sort_by(|a, b| b.created.cmp(&a.created));
        records.truncate(limit);
        Ok(records)
    }
}
