use logdesk_core::{AppError, AppResult};
use serde_json::Value;

use crate::LogEntry;

/// Field name every accepted entry carries after normalization.
pub const CANONICAL_CABINET_FIELD: &str = "cabinetName";

/// Alternate cabinet field spelling accepted on upload.
pub const ALTERNATE_CABINET_FIELD: &str = "cabinet_name";

/// Parses an uploaded JSON document into normalized log entries.
///
/// The document may be a single object or an array of objects. Entries
/// without a cabinet name under either accepted spelling are skipped; input
/// order is preserved for the rest.
pub fn parse_log_upload(text: &str) -> AppResult<Vec<LogEntry>> {
    if text.trim().is_empty() {
        return Err(AppError::MalformedInput("upload is empty".to_owned()));
    }

    let document: Value = serde_json::from_str(text)
        .map_err(|error| AppError::MalformedInput(format!("upload is not valid JSON: {error}")))?;

    let items = match document {
        Value::Array(items) => items,
        other => vec![other],
    };

    let entries: Vec<LogEntry> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(object) => LogEntry::from_json_object(object),
            _ => None,
        })
        .collect();

    if entries.is_empty() {
        return Err(AppError::NoValidEntries(format!(
            "upload contains no log entries with a '{CANONICAL_CABINET_FIELD}' or '{ALTERNATE_CABINET_FIELD}' field"
        )));
    }

    Ok(entries)
}
