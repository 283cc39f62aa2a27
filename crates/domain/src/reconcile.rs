//! Merging uploaded entries with persisted log state.

use logdesk_core::AppResult;
use serde::Serialize;

use crate::{LogEntry, LogIdentityAssigner, LogState, LogStateKey, LogStatePatch};

/// Uploaded entry enriched with its triage state. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedLogEntry {
    /// The normalized uploaded entry, serialized under its own `entry` key.
    pub entry: LogEntry,
    /// Identifier under which state for this entry is stored.
    pub log_id: String,
    /// Whether the entry has been handled.
    pub processed: bool,
    /// Operator note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the entry is being handled right now.
    pub in_progress: bool,
}

impl ProcessedLogEntry {
    /// Wraps an entry with default triage state.
    #[must_use]
    pub fn unprocessed(entry: LogEntry, log_id: String) -> Self {
        Self {
            entry,
            log_id,
            processed: false,
            comment: None,
            in_progress: false,
        }
    }

    /// Returns the cabinet name of the wrapped entry.
    #[must_use]
    pub fn cabinet_name(&self) -> &str {
        self.entry.cabinet_name()
    }

    /// Returns the state key of this entry.
    #[must_use]
    pub fn state_key(&self) -> LogStateKey {
        LogStateKey::new(self.log_id.clone(), self.entry.cabinet_name())
    }

    /// Returns whether the entry is stored under the given key.
    #[must_use]
    pub fn matches_key(&self, key: &LogStateKey) -> bool {
        self.log_id == key.log_id && self.entry.cabinet_name() == key.cabinet_name
    }

    /// Copies the triage fields of a persisted row.
    pub fn inherit_state(&mut self, state: &LogState) {
        self.processed = state.processed;
        self.comment = state.comment.clone();
        self.in_progress = state.in_progress;
    }

    /// Applies the supplied patch fields.
    pub fn apply_patch(&mut self, patch: &LogStatePatch) {
        if let Some(processed) = patch.processed {
            self.processed = processed;
        }
        if let Some(comment) = &patch.comment {
            self.comment = Some(comment.clone());
        }
        if let Some(in_progress) = patch.in_progress {
            self.in_progress = in_progress;
        }
    }
}

/// Attaches persisted state to freshly uploaded entries.
///
/// `states` must be ordered most recently updated first: the first row whose
/// cabinet matches and whose log id equals either the assigned identifier or
/// the uploader-supplied id wins. Output order and length equal the input.
pub fn reconcile_entries(
    entries: Vec<LogEntry>,
    states: &[LogState],
    assigner: &mut LogIdentityAssigner,
) -> AppResult<Vec<ProcessedLogEntry>> {
    entries
        .into_iter()
        .enumerate()
        .map(|(ordinal, entry)| {
            let log_id = assigner.assign(&entry, ordinal)?;
            let source_id = entry.source_id().map(ToString::to_string);

            let existing = states.iter().find(|state| {
                state.cabinet_name == entry.cabinet_name()
                    && (state.log_id == log_id || Some(&state.log_id) == source_id.as_ref())
            });

            let mut processed = ProcessedLogEntry::unprocessed(entry, log_id);
            if let Some(state) = existing {
                processed.inherit_state(state);
            }

            Ok(processed)
        })
        .collect()
}
