//! Contact-form submissions.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{ContactId, Timestamp};
use crate::validation::validate_form;

/// A stored submission as listed by `GET /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(alias = "created_at")]
    pub submitted_at: Timestamp,
}

/// Body for the public `POST /contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewContact {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub message: String,
}

impl NewContact {
    /// Build a submission; a blank phone number counts as not given.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.filter(|p| !p.trim().is_empty()),
            message: message.into(),
        }
    }

    pub fn validate_form(&self) -> Result<(), CoreError> {
        validate_form(self)
    }
}
