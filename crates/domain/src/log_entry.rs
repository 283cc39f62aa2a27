//! Uploaded log entry model.
//!
//! Entries arrive as open JSON objects. The fields the triage flow relies on
//! are lifted into typed slots; every other key is kept verbatim in a side map
//! so the full original object can be shown back to the operator.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::upload::{ALTERNATE_CABINET_FIELD, CANONICAL_CABINET_FIELD};

/// Severity labels recognised on uploaded entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogStatus {
    /// Failure reported by the cabinet.
    Error,
    /// Degraded condition worth a look.
    Warn,
    /// Informational event.
    Info,
    /// Completed operation.
    Success,
}

impl LogStatus {
    /// Parses the exact wire label of a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Error" => Some(Self::Error),
            "Warn" => Some(Self::Warn),
            "Info" => Some(Self::Info),
            "Success" => Some(Self::Success),
            _ => None,
        }
    }

    /// Returns the wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Success => "Success",
        }
    }
}

/// Identifier carried by the uploaded entry itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceLogId {
    /// String id, kept as written.
    Text(String),
    /// Numeric id, kept as written.
    Number(Number),
}

impl Display for SourceLogId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => formatter.write_str(value),
            Self::Number(value) => write!(formatter, "{value}"),
        }
    }
}

/// One normalized log entry from an upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<SourceLogId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service: Option<String>,
    #[serde(rename = "cabinetName")]
    cabinet_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<LogStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(flatten)]
    extra_fields: BTreeMap<String, Value>,
}

impl LogEntry {
    /// Builds an entry from one uploaded JSON object.
    ///
    /// Returns `None` when neither cabinet field spelling carries a usable
    /// name. `cabinetName` wins over `cabinet_name` when both are usable.
    /// Known fields holding a value of an unexpected type are kept verbatim
    /// in the extra fields instead of being dropped.
    #[must_use]
    pub fn from_json_object(mut object: Map<String, Value>) -> Option<Self> {
        let cabinet_name = object
            .get(CANONICAL_CABINET_FIELD)
            .and_then(cabinet_name_from_value)
            .or_else(|| {
                object
                    .get(ALTERNATE_CABINET_FIELD)
                    .and_then(cabinet_name_from_value)
            })?;

        object.remove(CANONICAL_CABINET_FIELD);
        object.remove(ALTERNATE_CABINET_FIELD);

        let id = take_typed(&mut object, "id", |value| match value {
            Value::String(text) => Some(SourceLogId::Text(text.clone())),
            Value::Number(number) => Some(SourceLogId::Number(number.clone())),
            _ => None,
        });
        let summary = take_string(&mut object, "summary");
        let message = take_string(&mut object, "message");
        let service = take_string(&mut object, "service");
        let status = take_typed(&mut object, "status", |value| {
            value.as_str().and_then(LogStatus::parse)
        });
        let timestamp = take_string(&mut object, "timestamp");

        Some(Self {
            id,
            summary,
            message,
            service,
            cabinet_name,
            status,
            timestamp,
            extra_fields: object.into_iter().collect(),
        })
    }

    /// Returns the id supplied by the uploader, if any.
    #[must_use]
    pub fn source_id(&self) -> Option<&SourceLogId> {
        self.id.as_ref()
    }

    /// Returns the short summary line.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Returns the full message text.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the emitting service name.
    #[must_use]
    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    /// Returns the canonical cabinet name.
    #[must_use]
    pub fn cabinet_name(&self) -> &str {
        self.cabinet_name.as_str()
    }

    /// Returns the recognised status.
    #[must_use]
    pub fn status(&self) -> Option<LogStatus> {
        self.status
    }

    /// Returns the raw timestamp as uploaded.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Returns the fields the schema does not know about.
    #[must_use]
    pub fn extra_fields(&self) -> &BTreeMap<String, Value> {
        &self.extra_fields
    }

    /// Text shown as the entry headline: summary, then message.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.summary().or_else(|| self.message())
    }
}

fn cabinet_name_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    take_typed(object, key, |value| value.as_str().map(str::to_owned))
}

fn take_typed<T>(
    object: &mut Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let converted = object.get(key).and_then(convert)?;
    object.remove(key);
    Some(converted)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{LogEntry, LogStatus, SourceLogId};

    fn entry_from(value: Value) -> Option<LogEntry> {
        match value {
            Value::Object(object) => LogEntry::from_json_object(object),
            _ => None,
        }
    }

    #[test]
    fn canonical_spelling_wins_over_alternate() {
        let entry = entry_from(json!({"cabinetName": "Room1", "cabinet_name": "Room2"}));
        assert_eq!(entry.map(|entry| entry.cabinet_name().to_owned()).as_deref(), Some("Room1"));
    }

    #[test]
    fn empty_canonical_spelling_falls_back_to_alternate() {
        let entry = entry_from(json!({"cabinetName": "", "cabinet_name": "Room2"}));
        assert_eq!(entry.map(|entry| entry.cabinet_name().to_owned()).as_deref(), Some("Room2"));
    }

    #[test]
    fn numeric_cabinet_name_is_stringified() {
        let entry = entry_from(json!({"cabinet_name": 204}));
        assert_eq!(entry.map(|entry| entry.cabinet_name().to_owned()).as_deref(), Some("204"));
    }

    #[test]
    fn missing_cabinet_rejects_entry() {
        assert!(entry_from(json!({"summary": "disk full"})).is_none());
        assert!(entry_from(json!({"cabinetName": null})).is_none());
    }

    #[test]
    fn unknown_fields_survive_serialization() {
        let entry = entry_from(json!({
            "cabinet_name": "Room1",
            "status": "Error",
            "host": {"ip": "10.0.0.4"},
            "attempts": 3
        }));
        let Some(entry) = entry else {
            panic!("entry should be accepted");
        };

        let serialized = serde_json::to_value(&entry).unwrap_or(Value::Null);
        assert_eq!(
            serialized,
            json!({
                "cabinetName": "Room1",
                "status": "Error",
                "host": {"ip": "10.0.0.4"},
                "attempts": 3
            })
        );
    }

    #[test]
    fn non_canonical_status_stays_verbatim_in_extra_fields() {
        let entry = entry_from(json!({"cabinetName": "Room1", "status": "warning"}));
        let Some(entry) = entry else {
            panic!("entry should be accepted");
        };

        assert_eq!(entry.status(), None);
        assert_eq!(entry.extra_fields().get("status"), Some(&json!("warning")));
    }

    #[test]
    fn typed_fields_are_lifted() {
        let entry = entry_from(json!({
            "id": 17,
            "cabinetName": "Room1",
            "summary": "Printer offline",
            "message": "spooler timeout",
            "service": "print",
            "status": "Warn",
            "timestamp": "2025-03-01T10:00:00Z"
        }));
        let Some(entry) = entry else {
            panic!("entry should be accepted");
        };

        assert_eq!(entry.source_id().map(ToString::to_string).as_deref(), Some("17"));
        assert!(matches!(entry.source_id(), Some(SourceLogId::Number(_))));
        assert_eq!(entry.display_text(), Some("Printer offline"));
        assert_eq!(entry.service(), Some("print"));
        assert_eq!(entry.status(), Some(LogStatus::Warn));
        assert_eq!(entry.timestamp(), Some("2025-03-01T10:00:00Z"));
        assert!(entry.extra_fields().is_empty());
    }

    #[test]
    fn display_text_falls_back_to_message() {
        let entry = entry_from(json!({"cabinetName": "Room1", "message": "fan noise"}));
        assert_eq!(
            entry.as_ref().and_then(LogEntry::display_text),
            Some("fan noise")
        );
    }
}
