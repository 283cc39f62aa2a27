//! Read-only projections over reconciled logs.
//!
//! Everything here is a pure function of the log list, the work sessions and
//! the per-client view context; nothing is cached.

use std::collections::HashMap;

use serde::Serialize;

use crate::{CabinetWorkSession, LogStatus, ProcessedLogEntry};

/// Per-client view settings consulted by the projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageViewContext {
    /// Cabinet this client is working on, if any.
    pub active_cabinet: Option<String>,
    /// Whether processed entries stay visible.
    pub show_processed: bool,
}

impl Default for TriageViewContext {
    fn default() -> Self {
        Self {
            active_cabinet: None,
            show_processed: true,
        }
    }
}

impl TriageViewContext {
    /// Returns whether an entry passes both filters.
    #[must_use]
    pub fn admits(&self, log: &ProcessedLogEntry) -> bool {
        let cabinet_matches = self
            .active_cabinet
            .as_deref()
            .is_none_or(|active| log.cabinet_name() == active);

        cabinet_matches && (self.show_processed || !log.processed)
    }
}

/// Entries of one cabinet in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CabinetGroup<'a> {
    /// Cabinet name shared by all entries.
    pub cabinet_name: &'a str,
    /// Entries in their original relative order.
    pub entries: Vec<&'a ProcessedLogEntry>,
}

/// Counters shown next to a list of logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogStats {
    /// Number of entries.
    pub total: usize,
    /// Entries marked processed.
    pub processed: usize,
    /// Entries with `Error` status.
    pub errors: usize,
    /// Entries with `Warn` status.
    pub warnings: usize,
}

impl LogStats {
    /// Counts the given entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ProcessedLogEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut stats, log| {
            stats.total += 1;
            if log.processed {
                stats.processed += 1;
            }
            match log.entry.status() {
                Some(LogStatus::Error) => stats.errors += 1,
                Some(LogStatus::Warn) => stats.warnings += 1,
                _ => {}
            }
            stats
        })
    }
}

/// One row of the cabinet selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CabinetOverview {
    /// Cabinet name.
    pub cabinet_name: String,
    /// Counters over every loaded entry of the cabinet.
    pub stats: LogStats,
    /// Some client holds a work session on the cabinet.
    pub in_session: bool,
    /// This client selected the cabinet.
    pub is_active: bool,
}

/// Applies the active-cabinet and show-processed filters.
#[must_use]
pub fn filter_logs<'a>(
    logs: &'a [ProcessedLogEntry],
    context: &TriageViewContext,
) -> Vec<&'a ProcessedLogEntry> {
    logs.iter().filter(|log| context.admits(log)).collect()
}

/// Partitions entries by cabinet in first-seen order.
#[must_use]
pub fn group_by_cabinet<'a>(
    logs: impl IntoIterator<Item = &'a ProcessedLogEntry>,
) -> Vec<CabinetGroup<'a>> {
    let mut groups: Vec<CabinetGroup<'a>> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for log in logs {
        let cabinet_name = log.cabinet_name();
        match positions.get(cabinet_name) {
            Some(&position) => groups[position].entries.push(log),
            None => {
                positions.insert(cabinet_name, groups.len());
                groups.push(CabinetGroup {
                    cabinet_name,
                    entries: vec![log],
                });
            }
        }
    }

    groups
}

/// Distinct cabinet names in first-seen order.
#[must_use]
pub fn cabinet_names(logs: &[ProcessedLogEntry]) -> Vec<&str> {
    group_by_cabinet(logs)
        .into_iter()
        .map(|group| group.cabinet_name)
        .collect()
}

/// Returns whether any client holds a session on the cabinet.
#[must_use]
pub fn is_cabinet_in_session(sessions: &[CabinetWorkSession], cabinet_name: &str) -> bool {
    sessions
        .iter()
        .any(|session| session.cabinet_name == cabinet_name)
}

/// Builds the cabinet selector rows over the unfiltered log list.
#[must_use]
pub fn cabinet_overview(
    logs: &[ProcessedLogEntry],
    sessions: &[CabinetWorkSession],
    active_cabinet: Option<&str>,
) -> Vec<CabinetOverview> {
    group_by_cabinet(logs)
        .into_iter()
        .map(|group| CabinetOverview {
            cabinet_name: group.cabinet_name.to_owned(),
            stats: LogStats::from_entries(group.entries),
            in_session: is_cabinet_in_session(sessions, group.cabinet_name),
            is_active: active_cabinet == Some(group.cabinet_name),
        })
        .collect()
}
