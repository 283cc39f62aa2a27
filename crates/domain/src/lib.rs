//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod identity;
mod log_entry;
mod log_state;
mod reconcile;
mod triage_view;
mod upload;

pub use identity::{IdentityStrategy, LogIdentityAssigner, batch_position_log_id};
pub use log_entry::{LogEntry, LogStatus, SourceLogId};
pub use log_state::{CabinetWorkSession, LogState, LogStateKey, LogStatePatch};
pub use reconcile::{ProcessedLogEntry, reconcile_entries};
pub use triage_view::{
    CabinetGroup, CabinetOverview, LogStats, TriageViewContext, cabinet_names, cabinet_overview,
    filter_logs, group_by_cabinet, is_cabinet_in_session,
};
pub use upload::{ALTERNATE_CABINET_FIELD, CANONICAL_CABINET_FIELD, parse_log_upload};
