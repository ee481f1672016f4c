//! Client-side form validation.
//!
//! Every submission DTO derives [`validator::Validate`]; this module folds
//! the field-level report into a single [`CoreError::Validation`] so that a
//! rejected form never reaches the network.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Validate a form, returning [`CoreError::Validation`] naming every
/// offending field in alphabetical order.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), CoreError> {
    form.validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
            format!("{field} ({})", codes.join(", "))
        })
        .collect();
    fields.sort();
    format!("invalid field(s): {}", fields.join("; "))
}
