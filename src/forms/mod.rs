//! Submitted HTML forms and their conversion into typed payloads.
//!
//! Each form is first checked with its declarative `validator` rules, then
//! every field is parsed into its domain newtype. Text fields other than
//! passwords are trimmed before either pass so both see the stored value. Errors from both passes are
//! collected into one [`FieldErrors`] so the page can show all of them at once.

use validator::Validate;

use crate::domain::types::TypeConstraintError;
use crate::domain::validation::FieldErrors;

pub mod articles;
pub mod categories;
pub mod comments;
pub mod sessions;
pub mod users;

/// Field errors produced by the `validator` rules of `form`.
pub fn validation_errors<T: Validate>(form: &T) -> FieldErrors {
    form.validate()
        .err()
        .map(FieldErrors::from)
        .unwrap_or_default()
}

/// `value` without surrounding whitespace.
pub(crate) fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Keeps the parsed value, or records the constraint error unless `validator`
/// already reported that field.
pub(crate) fn parse_field<T>(
    errors: &mut FieldErrors,
    result: Result<T, TypeConstraintError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            if !errors.contains_field(err.field()) {
                errors.merge(err.into());
            }
            None
        }
    }
}
