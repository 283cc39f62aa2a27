//! Log identity assignment.
//!
//! A log identifier correlates an uploaded entry with durable log state. An
//! id supplied by the uploader always wins. Otherwise the configured strategy
//! decides: a content hash is stable across uploads of the same content, while
//! the batch-position scheme embeds the upload time and therefore never
//! reconciles with state written during an earlier upload.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use logdesk_core::{AppError, AppResult};
use sha2::{Digest, Sha256};

use crate::LogEntry;

/// How identifiers are derived for entries without an uploader-supplied id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// SHA-256 of the cabinet name and canonical entry JSON.
    #[default]
    ContentHash,
    /// `{cabinet}_{ordinal}_{epoch_millis}`, regenerated per upload.
    BatchPosition,
}

impl IdentityStrategy {
    /// Returns the configuration label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContentHash => "content_hash",
            Self::BatchPosition => "batch_position",
        }
    }
}

impl FromStr for IdentityStrategy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "content_hash" => Ok(Self::ContentHash),
            "batch_position" => Ok(Self::BatchPosition),
            other => Err(AppError::Validation(format!(
                "unknown identity strategy '{other}', expected 'content_hash' or 'batch_position'"
            ))),
        }
    }
}

/// Builds the batch-position identifier for one entry.
#[must_use]
pub fn batch_position_log_id(
    cabinet_name: &str,
    ordinal: usize,
    generated_at: DateTime<Utc>,
) -> String {
    format!(
        "{cabinet_name}_{ordinal}_{}",
        generated_at.timestamp_millis()
    )
}

/// Assigns log identifiers across one upload batch.
#[derive(Debug)]
pub struct LogIdentityAssigner {
    strategy: IdentityStrategy,
    generated_at: DateTime<Utc>,
    seen_hashes: HashMap<String, usize>,
}

impl LogIdentityAssigner {
    /// Creates an assigner for a batch generated at the given instant.
    #[must_use]
    pub fn new(strategy: IdentityStrategy, generated_at: DateTime<Utc>) -> Self {
        Self {
            strategy,
            generated_at,
            seen_hashes: HashMap::new(),
        }
    }

    /// Returns the identifier for the entry at `ordinal` in the batch.
    pub fn assign(&mut self, entry: &LogEntry, ordinal: usize) -> AppResult<String> {
        if let Some(source_id) = entry.source_id() {
            return Ok(source_id.to_string());
        }

        match self.strategy {
            IdentityStrategy::BatchPosition => Ok(batch_position_log_id(
                entry.cabinet_name(),
                ordinal,
                self.generated_at,
            )),
            IdentityStrategy::ContentHash => {
                let digest = content_digest(entry)?;
                let occurrence = self.seen_hashes.entry(digest.clone()).or_insert(0);
                let log_id = if *occurrence == 0 {
                    digest
                } else {
                    format!("{digest}#{occurrence}")
                };
                *occurrence += 1;
                Ok(log_id)
            }
        }
    }
}

fn content_digest(entry: &LogEntry) -> AppResult<String> {
    let canonical = serde_json::to_string(entry).map_err(|error| {
        AppError::Internal(format!("failed to serialize log entry for hashing: {error}"))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(entry.cabinet_name().as_bytes());
    hasher.update([0_u8]);
    hasher.update(canonical.as_bytes());

    let mut encoded = String::with_capacity(64);
    for byte in hasher.finalize() {
        let _ = write!(encoded, "{byte:02x}");
    }

    Ok(encoded)
}
