use super::*;

use logdesk_domain::{LogStateKey, LogStatePatch};
use tracing::info;

impl LogTriageSession {
    /// Reloads every log state row from the store.
    pub async fn load_log_states(&mut self) -> AppResult<()> {
        match self.service.log_state_repository.list_log_states().await {
            Ok(log_states) => {
                self.log_states = log_states;
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "failed to load log states");
                Err(self.fail("Error", "Could not load log states", error))
            }
        }
    }

    /// Persists a partial state change for one log and patches local state.
    ///
    /// The returned row replaces the cached row for the same key, or is
    /// appended when none is cached. Every loaded entry stored under the key
    /// receives the patch without a full reconciliation pass.
    pub async fn update_log_state(
        &mut self,
        key: LogStateKey,
        patch: LogStatePatch,
    ) -> AppResult<LogState> {
        if patch.is_empty() {
            return Err(self.fail(
                "Error",
                "Nothing to update",
                AppError::Validation(format!(
                    "log state patch for '{}' in cabinet '{}' has no fields",
                    key.log_id, key.cabinet_name
                )),
            ));
        }

        let persisted = match self
            .service
            .log_state_repository
            .upsert_log_state(&key, &patch)
            .await
        {
            Ok(persisted) => persisted,
            Err(error) => {
                warn!(
                    log_id = %key.log_id,
                    cabinet = %key.cabinet_name,
                    error = %error,
                    "failed to update log state"
                );
                return Err(self.fail("Error", "Could not update the log state", error));
            }
        };

        match self
            .log_states
            .iter_mut()
            .find(|state| state.matches_key(&key))
        {
            Some(cached) => *cached = persisted.clone(),
            None => self.log_states.push(persisted.clone()),
        }

        let mut patched = 0_usize;
        for log in self.logs.iter_mut().filter(|log| log.matches_key(&key)) {
            log.apply_patch(&patch);
            patched += 1;
        }

        info!(
            log_id = %key.log_id,
            cabinet = %key.cabinet_name,
            processed = persisted.processed,
            patched,
            "log state updated"
        );

        Ok(persisted)
    }

    /// Marks one log processed or unprocessed.
    pub async fn set_processed(&mut self, key: LogStateKey, processed: bool) -> AppResult<LogState> {
        self.update_log_state(key, LogStatePatch::processed(processed))
            .await
    }

    /// Replaces the comment of one log.
    pub async fn set_comment(
        &mut self,
        key: LogStateKey,
        comment: impl Into<String>,
    ) -> AppResult<LogState> {
        self.update_log_state(key, LogStatePatch::comment(comment))
            .await
    }
}
