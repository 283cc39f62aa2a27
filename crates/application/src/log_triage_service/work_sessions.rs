use super::*;

use logdesk_core::NonEmptyString;
use tracing::{debug, info};

impl LogTriageSession {
    /// Reloads the work sessions of all clients from the store.
    pub async fn load_cabinet_sessions(&mut self) -> AppResult<()> {
        match self.service.session_repository.list_sessions().await {
            Ok(sessions) => {
                self.cabinet_sessions = sessions;
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "failed to load cabinet work sessions");
                Err(self.fail("Error", "Could not load cabinet work sessions", error))
            }
        }
    }

    /// Claims a cabinet and makes it this client's active cabinet.
    ///
    /// A claim held on a previously active cabinet is left in the store; only
    /// the local pointer moves. A failed reload after a successful claim is
    /// reported but does not fail the claim.
    pub async fn start_work(&mut self, cabinet_name: &str) -> AppResult<CabinetWorkSession> {
        let cabinet = self.validated_cabinet_name(cabinet_name)?;

        let session = match self
            .service
            .session_repository
            .upsert_session(cabinet.as_str())
            .await
        {
            Ok(session) => session,
            Err(error) => {
                warn!(cabinet = %cabinet, error = %error, "failed to start cabinet work");
                return Err(self.fail("Error", "Could not take the cabinet into work", error));
            }
        };

        let previous = self.view.active_cabinet.replace(String::from(cabinet.clone()));
        self.reload_sessions_after("start_work").await;

        info!(
            cabinet = %cabinet,
            previous_cabinet = previous.as_deref().unwrap_or("-"),
            session_id = %session.id,
            "cabinet work started"
        );
        self.notify(Notification::success(
            "Cabinet taken into work",
            format!("Started work on cabinet \"{cabinet}\""),
        ));

        Ok(session)
    }

    /// Releases every claim on a cabinet and clears the active cabinet.
    ///
    /// Any cabinet may be released, not only the one this client has active;
    /// the active pointer is cleared either way.
    pub async fn end_work(&mut self, cabinet_name: &str) -> AppResult<u64> {
        let cabinet = self.validated_cabinet_name(cabinet_name)?;

        let removed = match self
            .service
            .session_repository
            .delete_sessions(cabinet.as_str())
            .await
        {
            Ok(removed) => removed,
            Err(error) => {
                warn!(cabinet = %cabinet, error = %error, "failed to end cabinet work");
                return Err(self.fail("Error", "Could not finish work on the cabinet", error));
            }
        };

        let previous = self.view.active_cabinet.take();
        self.reload_sessions_after("end_work").await;

        info!(
            cabinet = %cabinet,
            previous_cabinet = previous.as_deref().unwrap_or("-"),
            removed,
            "cabinet work ended"
        );
        self.notify(Notification::success(
            "Work finished",
            format!("Finished work on cabinet \"{cabinet}\""),
        ));

        Ok(removed)
    }

    /// Refreshes the session list after a write that already succeeded.
    ///
    /// A failed reload is logged and notified by `load_cabinet_sessions`;
    /// the write's result stands and the previous list is kept.
    async fn reload_sessions_after(&mut self, operation: &str) {
        if let Err(error) = self.load_cabinet_sessions().await {
            debug!(operation, error = %error, "keeping stale work sessions after reload failure");
        }
    }

    fn validated_cabinet_name(&self, cabinet_name: &str) -> AppResult<NonEmptyString> {
        NonEmptyString::new(cabinet_name).map_err(|error| {
            self.fail(
                "Error",
                "Cabinet name must not be empty",
                AppError::Validation(format!("invalid cabinet name: {error}")),
            )
        })
    }
}
