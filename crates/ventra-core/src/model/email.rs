use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Startup;

/// Fixed text carried by follow-up sends. The processing API treats it as
/// opaque context for the generated message.
pub const PREVIOUS_INTERACTION: &str = "Initial email sent you.";

/// A sent-message row from the `emails` table. `viewed` is flipped by the
/// tracking webhook, never by this application. The embedded `startup`
/// relation is present only when the store performed the join.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailRecord {
    pub id: Uuid,
    #[serde(default)]
    pub startup_id: Option<Uuid>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub follow_up: bool,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub startup: Option<StartupRef>,
}

/// The slice of a Startup shown next to an email row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartupRef {
    pub name: String,
    pub email: String,
}

impl StartupRef {
    /// Placeholder for rows whose relation cannot be resolved.
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            email: "unknown@example.com".to_string(),
        }
    }
}

/// An email row with its relation resolved; `startup` is never absent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedEmail {
    pub id: Uuid,
    pub subject: Option<String>,
    pub follow_up: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed: bool,
    pub startup: StartupRef,
}

/// Which kind of message a bulk send produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailKind {
    #[default]
    Outreach,
    Followup,
}

impl EmailKind {
    pub fn toggled(self) -> Self {
        match self {
            Self::Outreach => Self::Followup,
            Self::Followup => Self::Outreach,
        }
    }
}

impl std::fmt::Display for EmailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outreach => write!(f, "outreach"),
            Self::Followup => write!(f, "followup"),
        }
    }
}

/// Payload for one `POST /api/send-email` call, built from a selected
/// Startup immediately before dispatch and discarded after the response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendRequest {
    #[serde(rename = "type")]
    pub kind: EmailKind,
    pub company_name: String,
    pub recipient_name: String,
    pub recipient_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_interaction: Option<String>,
    pub startup_id: Uuid,
}

impl SendRequest {
    pub fn for_startup(kind: EmailKind, startup: &Startup) -> Self {
        let (product_description, previous_interaction) = match kind {
            EmailKind::Outreach => (Some(startup.industry.clone().unwrap_or_default()), None),
            EmailKind::Followup => (None, Some(PREVIOUS_INTERACTION.to_string())),
        };
        Self {
            kind,
            company_name: startup.name.clone(),
            recipient_name: startup.name.clone(),
            recipient_email: startup.email.clone(),
            product_description,
            previous_interaction,
            startup_id: startup.id,
        }
    }
}

/// Dashboard counters plus the recent-activity feed.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DashboardStats {
    pub startups: u64,
    pub emails: u64,
    pub viewed: u64,
    pub recent: Vec<ResolvedEmail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn startup(industry: Option<&str>) -> Startup {
        Startup {
            id: Uuid::new_v4(),
            name: "Acme".into(),
            email: "founders@acme.io".into(),
            website: Some("https://acme.io".into()),
            linkedin: None,
            industry: industry.map(Into::into),
            tech_stack: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_placeholder() {
        let unknown = StartupRef::unknown();
        assert_eq!(unknown.name, "Unknown");
        assert_eq!(unknown.email, "unknown@example.com");
    }

    #[test]
    fn test_outreach_request_carries_industry() {
        let s = startup(Some("Robotics"));
        let req = SendRequest::for_startup(EmailKind::Outreach, &s);
        assert_eq!(req.product_description.as_deref(), Some("Robotics"));
        assert!(req.previous_interaction.is_none());
        assert_eq!(req.company_name, "Acme");
        assert_eq!(req.recipient_email, "founders@acme.io");
        assert_eq!(req.startup_id, s.id);
    }

    #[test]
    fn test_outreach_request_missing_industry_defaults_empty() {
        let req = SendRequest::for_startup(EmailKind::Outreach, &startup(None));
        assert_eq!(req.product_description.as_deref(), Some(""));
    }

    #[test]
    fn test_followup_request_carries_placeholder() {
        let req = SendRequest::for_startup(EmailKind::Followup, &startup(Some("Robotics")));
        assert!(req.product_description.is_none());
        assert_eq!(req.previous_interaction.as_deref(), Some(PREVIOUS_INTERACTION));
    }

    #[test]
    fn test_send_request_wire_shape() {
        let s = startup(Some("Robotics"));
        let req = SendRequest::for_startup(EmailKind::Outreach, &s);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "outreach");
        assert_eq!(json["product_description"], "Robotics");
        // The unused type-dependent field is omitted entirely
        assert!(json.get("previous_interaction").is_none());
    }

    #[test]
    fn test_email_kind_toggle_and_default() {
        assert_eq!(EmailKind::default(), EmailKind::Outreach);
        assert_eq!(EmailKind::Outreach.toggled(), EmailKind::Followup);
        assert_eq!(EmailKind::Followup.toggled(), EmailKind::Outreach);
        assert_eq!(EmailKind::Followup.to_string(), "followup");
    }

    #[test]
    fn test_email_record_tolerates_both_shapes() {
        // Bare row, no embedded relation
        let bare: EmailRecord = serde_json::from_str(
            r#"{"id":"7f6c3a1e-6a29-4c80-b7a5-3f4dbb1c9a01","subject":"Hi","follow_up":false,"viewed":true}"#,
        )
        .unwrap();
        assert!(bare.startup.is_none());
        assert!(bare.startup_id.is_none());
        assert!(bare.viewed);

        // Row with the relation already embedded by the store
        let joined: EmailRecord = serde_json::from_str(
            r#"{"id":"7f6c3a1e-6a29-4c80-b7a5-3f4dbb1c9a01",
                "startup_id":"aa6c3a1e-6a29-4c80-b7a5-3f4dbb1c9a02",
                "subject":"Hi","follow_up":true,
                "startup":{"name":"Acme","email":"founders@acme.io"}}"#,
        )
        .unwrap();
        assert_eq!(joined.startup.as_ref().unwrap().name, "Acme");
        assert!(joined.follow_up);
    }
}
