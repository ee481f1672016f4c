//! Project entity and its submission DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::ProjectId;
use crate::validation::validate_form;

/// A portfolio project as returned by `GET /projects`.
///
/// `images` holds image references in display order; an image is addressed
/// by its position in this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Project {
    /// Check that `index` addresses an existing image.
    pub fn check_image_index(&self, index: usize) -> Result<(), CoreError> {
        if index < self.images.len() {
            Ok(())
        } else {
            Err(CoreError::IndexOutOfRange {
                index,
                len: self.images.len(),
            })
        }
    }
}

/// Body for `POST /projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewProject {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub order: i32,
}

impl NewProject {
    pub fn new(title: impl Into<String>, description: impl Into<String>, order: i32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            order,
        }
    }

    pub fn validate_form(&self) -> Result<(), CoreError> {
        validate_form(self)
    }
}

/// Body for `PUT /projects/{id}`. Absent fields are left untouched by the
/// backend; present text fields must be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl UpdateProject {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.order.is_none()
    }

    pub fn validate_form(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation("no fields to update".into()));
        }
        validate_form(self)
    }
}
