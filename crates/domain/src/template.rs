use crate::reminder_schedule::ReminderTiming;
use crate::shared::entity::{Entity, ID};
use std::collections::HashMap;

/// Values substituted into a `MessageTemplate` body, keyed by placeholder name
pub type TemplateVars = HashMap<String, Option<String>>;

/// A reusable SMS body with `{{placeholder}}` tokens.
/// A `Tenant` has at most one default `MessageTemplate`.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTemplate {
    pub id: ID,
    pub tenant_id: ID,
    pub name: String,
    pub body: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    PatientName,
    AppointmentDate,
    AppointmentTime,
    ClinicName,
    ClinicPhone,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Self::PatientName,
        Self::AppointmentDate,
        Self::AppointmentTime,
        Self::ClinicName,
        Self::ClinicPhone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::PatientName => "patientName",
            Self::AppointmentDate => "appointmentDate",
            Self::AppointmentTime => "appointmentTime",
            Self::ClinicName => "clinicName",
            Self::ClinicPhone => "clinicPhone",
        }
    }

    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.name())
    }
}

/// Substitutes every known placeholder that has a non-empty value in `vars`.
///
/// Placeholders without a value are left in the text as is, and so are
/// tokens that are not known placeholders.
pub fn render(body: &str, vars: &TemplateVars) -> String {
    let mut rendered = body.to_string();
    for placeholder in &Placeholder::ALL {
        let value = match vars.get(placeholder.name()) {
            Some(Some(value)) if !value.is_empty() => value,
            _ => continue,
        };
        rendered = rendered.replace(&placeholder.token(), value);
    }
    rendered
}

/// Returns the `{{...}}` tokens in `body` that are not known placeholders
pub fn unknown_placeholders(body: &str) -> Vec<String> {
    let known = Placeholder::ALL
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>();

    let mut unknown = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let end = match after_open.find("}}") {
            Some(end) => end,
            None => break,
        };
        let name = after_open[..end].trim();
        if !known.contains(&name) && !unknown.iter().any(|u| u == name) {
            unknown.push(name.to_string());
        }
        rest = &after_open[end + 2..];
    }
    unknown
}

impl MessageTemplate {
    pub fn new(tenant_id: ID, name: String, body: String) -> Self {
        Self {
            id: Default::default(),
            tenant_id,
            name,
            body,
            is_default: false,
        }
    }

    pub fn render(&self, vars: &TemplateVars) -> String {
        render(&self.body, vars)
    }

    /// Templates seeded for a `Tenant` that has none, one per `ReminderTiming`.
    /// The same day template is the default one.
    pub fn defaults(tenant_id: &ID) -> Vec<Self> {
        ReminderTiming::ALL
            .iter()
            .map(|timing| {
                let (name, body) = match timing {
                    ReminderTiming::OneWeek => (
                        "One week reminder",
                        "Hi {{patientName}}, this is {{clinicName}} reminding you of your appointment on {{appointmentDate}} at {{appointmentTime}}. Need to reschedule? Call {{clinicPhone}}.",
                    ),
                    ReminderTiming::OneDay => (
                        "One day reminder",
                        "Hi {{patientName}}, see you tomorrow, {{appointmentDate}} at {{appointmentTime}} at {{clinicName}}. Questions? Call {{clinicPhone}}.",
                    ),
                    ReminderTiming::SameDay => (
                        "Same day reminder",
                        "Hi {{patientName}}, a reminder of your appointment today at {{appointmentTime}} at {{clinicName}}. Running late? Call {{clinicPhone}}.",
                    ),
                };
                let mut template = Self::new(tenant_id.clone(), name.into(), body.into());
                template.is_default = *timing == ReminderTiming::SameDay;
                template
            })
            .collect()
    }
}

impl Entity for MessageTemplate {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(entries: &[(&str, Option<&str>)]) -> TemplateVars {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(String::from)))
            .collect()
    }

    #[test]
    fn it_leaves_missing_placeholders_untouched() {
        let body = "Hi {{patientName}}, see you at {{clinicPhone}}";
        let rendered = render(body, &vars(&[("patientName", Some("Sam"))]));
        assert_eq!(rendered, "Hi Sam, see you at {{clinicPhone}}");
    }

    #[test]
    fn it_does_not_blank_empty_values() {
        let body = "Call {{clinicPhone}}";
        let rendered = render(body, &vars(&[("clinicPhone", Some("")), ("clinicName", None)]));
        assert_eq!(rendered, "Call {{clinicPhone}}");
    }

    #[test]
    fn it_replaces_every_occurrence() {
        let body = "{{clinicName}} / {{clinicName}}";
        let rendered = render(body, &vars(&[("clinicName", Some("Smile Dental"))]));
        assert_eq!(rendered, "Smile Dental / Smile Dental");
    }

    #[test]
    fn it_keeps_unknown_tokens_as_literal_text() {
        let body = "Hi {{patientName}}, bring {{insuranceCard}}";
        let rendered = render(body, &vars(&[("patientName", Some("Sam")), ("insuranceCard", Some("x"))]));
        assert_eq!(rendered, "Hi Sam, bring {{insuranceCard}}");
        assert_eq!(unknown_placeholders(body), vec!["insuranceCard".to_string()]);
    }

    #[test]
    fn render_is_idempotent() {
        let body = "Hi {{patientName}} at {{appointmentTime}} {{clinicPhone}}";
        let v = vars(&[("patientName", Some("Sam")), ("appointmentTime", Some("3:00 PM"))]);
        let once = render(body, &v);
        assert_eq!(render(&once, &v), once);
    }

    #[test]
    fn it_seeds_one_default_template() {
        let tenant_id = ID::new();
        let templates = MessageTemplate::defaults(&tenant_id);
        assert_eq!(templates.len(), 3);
        assert_eq!(templates.iter().filter(|t| t.is_default).count(), 1);
        for template in &templates {
            assert_eq!(template.tenant_id, tenant_id);
            assert!(unknown_placeholders(&template.body).is_empty());
        }
    }
}
