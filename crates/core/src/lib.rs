//! Shared primitives for all Rust crates in Logdesk.

#![forbid(unsafe_code)]

/// Client identity primitives shared across services.
pub mod client;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::ClientId;

/// Result type used across Logdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Uploaded log text could not be parsed as JSON.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Uploaded JSON parsed but carried no entry with a cabinet name.
    #[error("no valid entries: {0}")]
    NoValidEntries(String),

    /// A select, upsert, or delete call against the remote state store failed.
    #[error("remote store failure: {0}")]
    RemoteStore(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::{AppError, NonEmptyString};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(result.is_err());
    }

    #[test]
    fn non_empty_string_keeps_original_value() {
        let value = NonEmptyString::new(" Room 1 ").map(String::from);
        assert_eq!(value.ok().as_deref(), Some(" Room 1 "));
    }

    #[test]
    fn remote_store_error_formats_with_category_prefix() {
        let error = AppError::RemoteStore("log_states select returned 503".to_owned());
        assert_eq!(
            error.to_string(),
            "remote store failure: log_states select returned 503"
        );
    }
}
