use crate::appointment::Appointment;
use crate::phone::extract_phone;
use crate::shared::entity::ID;
use std::collections::{HashMap, HashSet};

/// An event as listed by the calendar provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarEventSnapshot {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_ts: i64,
    pub end_ts: i64,
    pub attendees: Vec<CalendarAttendee>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarAttendee {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

const UNKNOWN_PATIENT: &str = "there";

impl CalendarEventSnapshot {
    /// The event title without any phone number written into it
    pub fn patient_name(&self) -> String {
        let title = match &self.title {
            Some(title) => title,
            None => return UNKNOWN_PATIENT.into(),
        };
        let name = title
            .split(|c: char| c.is_ascii_digit() || c == '+' || c == '(')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches(|c: char| c == '-' || c == ',' || c == ':' || c == '|')
            .trim();
        if name.is_empty() {
            UNKNOWN_PATIENT.into()
        } else {
            name.to_string()
        }
    }

    /// The first in-scope phone number found in the event
    pub fn patient_phone(&self) -> Option<String> {
        let attendee_names = self.attendees.iter().filter_map(|a| a.display_name.as_ref());
        self.title
            .iter()
            .chain(self.description.iter())
            .chain(self.location.iter())
            .chain(attendee_names)
            .find_map(|text| extract_phone(text))
    }
}

/// Changes needed to make the stored `Appointment`s mirror the fetched events
#[derive(Debug, Default)]
pub struct AppointmentSyncPlan {
    pub create: Vec<Appointment>,
    pub update: Vec<Appointment>,
    pub delete: Vec<ID>,
}

/// Diffs the `Appointment`s already stored for the synced window against
/// the events just fetched for that same window.
///
/// Known event ids are updated in place, new ones are created and known
/// ones that are missing from the fetch are deleted.
pub fn plan_appointment_sync(
    tenant_id: &ID,
    existing: Vec<Appointment>,
    fetched: &[CalendarEventSnapshot],
    now: i64,
) -> AppointmentSyncPlan {
    let mut known = existing
        .into_iter()
        .map(|a| (a.calendar_event_id.clone(), a))
        .collect::<HashMap<_, _>>();
    let mut seen = HashSet::new();
    let mut plan = AppointmentSyncPlan::default();

    for event in fetched {
        // Providers can list the same event twice across pages
        if !seen.insert(event.id.as_str()) {
            continue;
        }
        match known.remove(&event.id) {
            Some(mut appointment) => {
                appointment.apply_event(event, now);
                plan.update.push(appointment);
            }
            None => plan
                .create
                .push(Appointment::from_event(tenant_id.clone(), event, now)),
        }
    }

    plan.delete = known.into_iter().map(|(_, a)| a.id).collect();
    plan
}

#[cfg(test)]
mod test {
    use super::*;

    fn event(id: &str, title: &str, start_ts: i64) -> CalendarEventSnapshot {
        CalendarEventSnapshot {
            id: id.into(),
            title: Some(title.into()),
            start_ts,
            end_ts: start_ts + 30 * 60 * 1000,
            ..Default::default()
        }
    }

    #[test]
    fn it_extracts_patient_details() {
        let e = event("1", "Sam Carter - 555-123-4567", 0);
        assert_eq!(e.patient_name(), "Sam Carter");
        assert_eq!(e.patient_phone(), Some("+15551234567".into()));

        let mut e = event("2", "Jo Park", 0);
        e.description = Some("Cleaning. Mobile: (555) 987-6543".into());
        assert_eq!(e.patient_name(), "Jo Park");
        assert_eq!(e.patient_phone(), Some("+15559876543".into()));

        let mut e = event("3", "555-123-4567", 0);
        e.title = None;
        e.attendees = vec![CalendarAttendee {
            email: Some("a@b.c".into()),
            display_name: Some("Al +1 555 222 3333".into()),
        }];
        assert_eq!(e.patient_name(), UNKNOWN_PATIENT);
        assert_eq!(e.patient_phone(), Some("+15552223333".into()));
    }

    #[test]
    fn it_plans_create_update_and_delete_in_one_pass() {
        let tenant_id = ID::new();
        let kept_1 = Appointment::from_event(tenant_id.clone(), &event("a", "A", 10), 0);
        let mut kept_2 = Appointment::from_event(tenant_id.clone(), &event("b", "B", 20), 0);
        kept_2.mark_reminder_sent(5);
        let removed = Appointment::from_event(tenant_id.clone(), &event("gone", "C", 30), 0);
        let removed_id = removed.id.clone();

        let fetched = vec![
            event("a", "A renamed", 11),
            event("b", "B", 20),
            event("new", "D", 40),
        ];
        let plan = plan_appointment_sync(
            &tenant_id,
            vec![kept_1.clone(), kept_2.clone(), removed],
            &fetched,
            100,
        );

        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].calendar_event_id, "new");
        assert_eq!(plan.create[0].tenant_id, tenant_id);

        assert_eq!(plan.update.len(), 2);
        let a = plan.update.iter().find(|a| a.id == kept_1.id).unwrap();
        assert_eq!(a.patient_name, "A renamed");
        assert_eq!(a.start_ts, 11);
        assert_eq!(a.last_synced_at, 100);
        let b = plan.update.iter().find(|a| a.id == kept_2.id).unwrap();
        assert!(b.reminder_sent);
        assert_eq!(b.reminder_sent_at, Some(5));

        assert_eq!(plan.delete, vec![removed_id]);
    }

    #[test]
    fn it_ignores_duplicated_events_in_a_fetch() {
        let tenant_id = ID::new();
        let fetched = vec![event("x", "X", 1), event("x", "X", 1)];
        let plan = plan_appointment_sync(&tenant_id, Vec::new(), &fetched, 0);
        assert_eq!(plan.create.len(), 1);
    }
}
