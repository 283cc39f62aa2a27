use super::*;

use chrono::Utc;
use logdesk_domain::{LogIdentityAssigner, parse_log_upload, reconcile_entries};
use tracing::info;

impl LogTriageSession {
    /// Parses an upload and replaces the loaded logs with it.
    ///
    /// Entries are reconciled against the log states currently held by the
    /// session, so call [`LogTriageSession::refresh`] first to pick up writes
    /// made elsewhere. On failure the previous logs stay in place.
    pub fn upload_logs(&mut self, text: &str) -> AppResult<usize> {
        let entries = match parse_log_upload(text) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(error = %error, "rejected log upload");
                let description = match &error {
                    AppError::NoValidEntries(_) => {
                        "The JSON contains no logs with a cabinetName field"
                    }
                    _ => "The upload is not valid JSON",
                };
                return Err(self.fail("Upload failed", description, error));
            }
        };

        let mut assigner = LogIdentityAssigner::new(self.service.identity_strategy, Utc::now());
        let reconciled = match reconcile_entries(entries, &self.log_states, &mut assigner) {
            Ok(reconciled) => reconciled,
            Err(error) => {
                warn!(error = %error, "failed to reconcile uploaded logs");
                return Err(self.fail("Upload failed", "Logs could not be prepared", error));
            }
        };

        let loaded = reconciled.len();
        let restored = reconciled
            .iter()
            .filter(|log| log.processed || log.comment.is_some() || log.in_progress)
            .count();
        self.logs = reconciled;

        info!(
            loaded,
            restored,
            identity_strategy = self.service.identity_strategy.as_str(),
            "log upload reconciled"
        );
        self.notify(Notification::success(
            "Logs loaded",
            format!("Loaded {loaded} logs"),
        ));

        Ok(loaded)
    }
}
