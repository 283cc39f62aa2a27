use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable per-log triage metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogState {
    /// Row identifier assigned by the store.
    pub id: Uuid,
    /// Identifier correlating the row to an uploaded entry.
    pub log_id: String,
    /// Cabinet the log belongs to.
    pub cabinet_name: String,
    /// Whether an operator has handled the log.
    pub processed: bool,
    /// Free-form operator note.
    #[serde(default)]
    pub comment: Option<String>,
    /// Whether an operator is currently handling the log.
    pub in_progress: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl LogState {
    /// Creates a fresh row for a key with the patch applied over defaults.
    #[must_use]
    pub fn from_patch(key: &LogStateKey, patch: &LogStatePatch, now: DateTime<Utc>) -> Self {
        let mut state = Self {
            id: Uuid::new_v4(),
            log_id: key.log_id.clone(),
            cabinet_name: key.cabinet_name.clone(),
            processed: false,
            comment: None,
            in_progress: false,
            created_at: now,
            updated_at: now,
        };
        state.apply_patch(patch, now);
        state
    }

    /// Returns the upsert key of this row.
    #[must_use]
    pub fn key(&self) -> LogStateKey {
        LogStateKey::new(self.log_id.clone(), self.cabinet_name.clone())
    }

    /// Returns whether the row belongs to the given key.
    #[must_use]
    pub fn matches_key(&self, key: &LogStateKey) -> bool {
        self.log_id == key.log_id && self.cabinet_name == key.cabinet_name
    }

    /// Applies the supplied patch fields and bumps the update time.
    pub fn apply_patch(&mut self, patch: &LogStatePatch, now: DateTime<Utc>) {
        if let Some(processed) = patch.processed {
            self.processed = processed;
        }
        if let Some(comment) = &patch.comment {
            self.comment = Some(comment.clone());
        }
        if let Some(in_progress) = patch.in_progress {
            self.in_progress = in_progress;
        }
        self.updated_at = now;
    }
}

/// Upsert key of a log state row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogStateKey {
    /// Log identifier.
    pub log_id: String,
    /// Cabinet name.
    pub cabinet_name: String,
}

impl LogStateKey {
    /// Creates a key.
    #[must_use]
    pub fn new(log_id: impl Into<String>, cabinet_name: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
            cabinet_name: cabinet_name.into(),
        }
    }
}

/// Partial update of a log state row. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStatePatch {
    /// New processed flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed: Option<bool>,
    /// New comment text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// New in-progress flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<bool>,
}

impl LogStatePatch {
    /// Patch toggling the processed flag.
    #[must_use]
    pub fn processed(processed: bool) -> Self {
        Self {
            processed: Some(processed),
            ..Self::default()
        }
    }

    /// Patch replacing the comment.
    #[must_use]
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
            ..Self::default()
        }
    }

    /// Returns true when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_none() && self.comment.is_none() && self.in_progress.is_none()
    }
}

/// Durable claim that an operator is working on a cabinet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinetWorkSession {
    /// Row identifier assigned by the store.
    pub id: Uuid,
    /// Claimed cabinet.
    pub cabinet_name: String,
    /// When work started.
    pub started_at: DateTime<Utc>,
    /// Last refresh of the claim.
    pub updated_at: DateTime<Utc>,
}

impl CabinetWorkSession {
    /// Creates a new claim for a cabinet.
    #[must_use]
    pub fn start(cabinet_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cabinet_name: cabinet_name.into(),
            started_at: now,
            updated_at: now,
        }
    }
}
