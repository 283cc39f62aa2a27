use super::*;

use logdesk_domain::{
    CabinetGroup, CabinetOverview, LogStats, cabinet_overview, filter_logs, group_by_cabinet,
    is_cabinet_in_session,
};

impl LogTriageSession {
    /// Logs passing the active-cabinet and show-processed filters.
    #[must_use]
    pub fn filtered_logs(&self) -> Vec<&ProcessedLogEntry> {
        filter_logs(&self.logs, &self.view)
    }

    /// Filtered logs grouped by cabinet.
    #[must_use]
    pub fn grouped_logs(&self) -> Vec<CabinetGroup<'_>> {
        group_by_cabinet(self.filtered_logs())
    }

    /// Counters over the filtered logs.
    #[must_use]
    pub fn stats(&self) -> LogStats {
        LogStats::from_entries(self.filtered_logs())
    }

    /// Cabinet selector rows over every loaded log.
    #[must_use]
    pub fn cabinet_overview(&self) -> Vec<CabinetOverview> {
        cabinet_overview(&self.logs, &self.cabinet_sessions, self.active_cabinet())
    }

    /// Whether any client holds a work session on the cabinet.
    #[must_use]
    pub fn is_in_session(&self, cabinet_name: &str) -> bool {
        is_cabinet_in_session(&self.cabinet_sessions, cabinet_name)
    }
}
