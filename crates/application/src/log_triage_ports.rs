use async_trait::async_trait;

use logdesk_core::AppResult;
use logdesk_domain::{CabinetWorkSession, LogState, LogStateKey, LogStatePatch};

/// Repository port for durable per-log triage state (`log_states`).
#[async_trait]
pub trait LogStateRepository: Send + Sync {
    /// Lists every log state row, most recently updated first.
    async fn list_log_states(&self) -> AppResult<Vec<LogState>>;

    /// Inserts or updates the row for a key and returns the persisted row.
    ///
    /// Only the supplied patch fields are written; an insert fills the rest
    /// with defaults.
    async fn upsert_log_state(
        &self,
        key: &LogStateKey,
        patch: &LogStatePatch,
    ) -> AppResult<LogState>;
}

/// Repository port for cabinet work sessions (`cabinet_work_sessions`).
#[async_trait]
pub trait CabinetSessionRepository: Send + Sync {
    /// Lists every session row, most recently updated first.
    async fn list_sessions(&self) -> AppResult<Vec<CabinetWorkSession>>;

    /// Creates or refreshes the session keyed by cabinet name.
    async fn upsert_session(&self, cabinet_name: &str) -> AppResult<CabinetWorkSession>;

    /// Deletes every session row for a cabinet and returns how many were removed.
    async fn delete_sessions(&self, cabinet_name: &str) -> AppResult<u64>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation completed.
    Success,
    /// Operation failed; local state was left unchanged.
    Error,
}

/// Transient message shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Short headline.
    pub title: String,
    /// Human-readable detail.
    pub description: String,
}

impl Notification {
    /// Builds a success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Builds an error notification.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Delivery port for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Delivers one notification. Delivery never fails the caller.
    fn notify(&self, notification: Notification);
}
