//! Request and response payloads of the HTTP surface.

use logdesk_domain::{CabinetGroup, CabinetOverview, LogStatePatch, LogStats, ProcessedLogEntry};
use serde::{Deserialize, Serialize};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub open_clients: usize,
}

/// One log as shown in the triage view.
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    #[serde(flatten)]
    pub log: ProcessedLogEntry,
    pub display_text: Option<String>,
}

impl From<&ProcessedLogEntry> for LogEntryResponse {
    fn from(value: &ProcessedLogEntry) -> Self {
        Self {
            display_text: value.entry.display_text().map(ToOwned::to_owned),
            log: value.clone(),
        }
    }
}

/// Current view context of the calling client.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub active_cabinet: Option<String>,
    pub show_processed: bool,
}

/// Result of a log upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uploaded: usize,
    pub stats: LogStats,
}

/// Filtered log list.
#[derive(Debug, Serialize)]
pub struct LogListResponse {
    pub view: ViewResponse,
    pub logs: Vec<LogEntryResponse>,
}

/// One cabinet group of the filtered logs.
#[derive(Debug, Serialize)]
pub struct CabinetGroupResponse {
    pub cabinet_name: String,
    pub in_session: bool,
    pub stats: LogStats,
    pub logs: Vec<LogEntryResponse>,
}

impl CabinetGroupResponse {
    pub fn from_group(group: &CabinetGroup<'_>, in_session: bool) -> Self {
        Self {
            cabinet_name: group.cabinet_name.to_owned(),
            in_session,
            stats: LogStats::from_entries(group.entries.iter().copied()),
            logs: group
                .entries
                .iter()
                .map(|entry| LogEntryResponse::from(*entry))
                .collect(),
        }
    }
}

/// Filtered logs grouped by cabinet.
#[derive(Debug, Serialize)]
pub struct GroupedLogsResponse {
    pub view: ViewResponse,
    pub groups: Vec<CabinetGroupResponse>,
}

/// Cabinet selector rows.
#[derive(Debug, Serialize)]
pub struct CabinetListResponse {
    pub active_cabinet: Option<String>,
    pub cabinets: Vec<CabinetOverview>,
}

/// Result of ending work on a cabinet.
#[derive(Debug, Serialize)]
pub struct EndWorkResponse {
    pub cabinet_name: String,
    pub removed_sessions: u64,
}

/// Counts reloaded from the store.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub log_states: usize,
    pub cabinet_sessions: usize,
}

/// Partial update of one log's triage state.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLogStateRequest {
    #[serde(default)]
    pub processed: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub in_progress: Option<bool>,
}

impl From<UpdateLogStateRequest> for LogStatePatch {
    fn from(value: UpdateLogStateRequest) -> Self {
        Self {
            processed: value.processed,
            comment: value.comment,
            in_progress: value.in_progress,
        }
    }
}

/// Show-processed toggle.
#[derive(Debug, Deserialize)]
pub struct ShowProcessedRequest {
    pub show_processed: bool,
}

#[cfg(test)]
mod tests {
    use logdesk_domain::{ProcessedLogEntry, parse_log_upload};
    use serde_json::{Value, json};

    use super::LogEntryResponse;

    #[test]
    fn uploaded_fields_named_like_state_do_not_shadow_it() {
        let Ok(mut entries) = parse_log_upload(
            r#"{"cabinetName": "Room1", "summary": "door open", "comment": "device note", "display_text": "raw"}"#,
        ) else {
            panic!("upload should parse");
        };
        let Some(entry) = entries.pop() else {
            panic!("one entry expected");
        };
        let log = ProcessedLogEntry::unprocessed(entry, "log-1".to_owned());

        let serialized = serde_json::to_value(LogEntryResponse::from(&log)).unwrap_or(Value::Null);
        assert_eq!(serialized["display_text"], json!("door open"));
        assert_eq!(serialized["entry"]["display_text"], json!("raw"));
        assert_eq!(serialized["entry"]["comment"], json!("device note"));
        assert_eq!(serialized.get("comment"), None);
    }
}
