use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VentraError};

/// Substituted for an empty website so existing rows stay shaped the way
/// the store already holds them.
pub const DEFAULT_WEBSITE: &str = "https://example.com";
pub const DEFAULT_LINKEDIN: &str = "https://linkedin.com/company/example";

/// A contact/company record targeted for outreach. Owned by the
/// relational store; `id` and `created_at` are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Startup {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub tech_stack: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Candidate record from the add-startup form, pre-insert.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct NewStartup {
    pub name: String,
    pub email: String,
    pub website: String,
    pub linkedin: String,
    pub industry: String,
    pub tech_stack: String,
}

impl NewStartup {
    /// Client-side validation; runs before any network call. The message
    /// names the specific failing field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VentraError::InvalidInput("Name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(VentraError::InvalidInput("Email is required".into()));
        }
        if !self.email.contains('@') {
            return Err(VentraError::InvalidInput("Email is invalid".into()));
        }
        if !self.website.is_empty() && !self.website.starts_with("http") {
            return Err(VentraError::InvalidInput(
                "Website must start with http:// or https://".into(),
            ));
        }
        if !self.linkedin.is_empty() && !self.linkedin.starts_with("http") {
            return Err(VentraError::InvalidInput(
                "LinkedIn URL must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }

    /// The row actually submitted to the store: empty URL fields take the
    /// fixed placeholder values.
    pub fn normalized(&self) -> NewStartup {
        NewStartup {
            website: if self.website.is_empty() {
                DEFAULT_WEBSITE.to_string()
            } else {
                self.website.clone()
            },
            linkedin: if self.linkedin.is_empty() {
                DEFAULT_LINKEDIN.to_string()
            } else {
                self.linkedin.clone()
            },
            ..self.clone()
        }
    }
}
