//! The singleton "about" section.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::validation::validate_form;

/// About section content. Doubles as the full-replace body of `PUT /about`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AboutContent {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

impl AboutContent {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn validate_form(&self) -> Result<(), CoreError> {
        validate_form(self)
    }
}
