//! Shared primitives for all Rust crates in the catalog service.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{BearerToken, Identity, Principal};

/// Result type used across catalog crates.
pub type AppResult<T> = Result<T, AppError>;

/// Field-level validation messages keyed by input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty message set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message for a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Returns whether no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the messages recorded for one field.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.0
    }

    /// Converts the collected messages into a result.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(self))
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.0.keys().map(String::as_str).collect::<Vec<_>>();
        write!(formatter, "invalid fields [{}]", fields.join(", "))
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input rejected with per-field messages.
    #[error("validation failed: {0}")]
    InvalidFields(FieldErrors),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Requested resource was already soft-deleted.
    #[error("already deleted: {0}")]
    AlreadyDeleted(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A required dependency could not be reached.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, FieldErrors};

    #[test]
    fn field_errors_group_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.push("name", "The name field is required.");
        errors.push("name", "The name must be at least 3 characters.");
        errors.push("price", "The price must be greater than 0.");

        assert_eq!(errors.messages_for("name").len(), 2);
        assert_eq!(errors.messages_for("quantity").len(), 0);
        assert_eq!(errors.to_string(), "invalid fields [name, price]");
    }

    #[test]
    fn empty_field_errors_convert_to_ok() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.push("description", "The description field is required.");
        assert!(matches!(
            errors.into_result(),
            Err(AppError::InvalidFields(_))
        ));
    }
}
