use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Maximum accepted length of a client identifier.
const MAX_CLIENT_ID_LENGTH: usize = 64;

/// Identifies one operator client owning its own view-model state.
///
/// Work sessions in the remote store are shared by every client, while the
/// locally active cabinet and loaded logs belong to exactly one client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Identifier used when a caller does not name its client.
    pub const DEFAULT: &'static str = "default";

    /// Creates a validated client identifier.
    ///
    /// Accepts ASCII alphanumerics, `-` and `_`, up to 64 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "client id must not be empty".to_owned(),
            ));
        }

        if trimmed.len() > MAX_CLIENT_ID_LENGTH {
            return Err(AppError::Validation(format!(
                "client id must not exceed {MAX_CLIENT_ID_LENGTH} characters"
            )));
        }

        if !trimmed
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
        {
            return Err(AppError::Validation(format!(
                "client id '{trimmed}' may only contain letters, digits, '-' and '_'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ClientId;

    #[test]
    fn client_id_trims_surrounding_whitespace() {
        let client_id = ClientId::new("  desk-2 ").map(|value| value.to_string());
        assert_eq!(client_id.ok().as_deref(), Some("desk-2"));
    }

    #[test]
    fn client_id_rejects_path_like_values() {
        assert!(ClientId::new("../etc").is_err());
        assert!(ClientId::new("").is_err());
    }

    #[test]
    fn default_client_id_is_valid() {
        let default = ClientId::default();
        assert!(ClientId::new(default.as_str()).is_ok());
    }
}
