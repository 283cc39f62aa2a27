//! Log triage view-model.
//!
//! `LogTriageService` holds the shared store adapters and hands out one
//! `LogTriageSession` per operator client. A session owns the uploaded logs,
//! the last-known log states and work sessions, and the client's view
//! context. Every store failure leaves that in-memory state untouched.

mod log_states;
mod projections;
mod uploads;
mod work_sessions;

use std::sync::Arc;

use logdesk_core::{AppError, AppResult};
use logdesk_domain::{
    CabinetWorkSession, IdentityStrategy, LogState, ProcessedLogEntry, TriageViewContext,
};
use tracing::warn;

use crate::{CabinetSessionRepository, LogStateRepository, Notification, Notifier};

/// Application service creating log triage sessions.
#[derive(Clone)]
pub struct LogTriageService {
    log_state_repository: Arc<dyn LogStateRepository>,
    session_repository: Arc<dyn CabinetSessionRepository>,
    notifier: Arc<dyn Notifier>,
    identity_strategy: IdentityStrategy,
}

impl LogTriageService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        log_state_repository: Arc<dyn LogStateRepository>,
        session_repository: Arc<dyn CabinetSessionRepository>,
        notifier: Arc<dyn Notifier>,
        identity_strategy: IdentityStrategy,
    ) -> Self {
        Self {
            log_state_repository,
            session_repository,
            notifier,
            identity_strategy,
        }
    }

    /// Returns the configured identity strategy.
    #[must_use]
    pub fn identity_strategy(&self) -> IdentityStrategy {
        self.identity_strategy
    }

    /// Creates an empty session without touching the store.
    #[must_use]
    pub fn new_session(&self) -> LogTriageSession {
        LogTriageSession {
            service: self.clone(),
            logs: Vec::new(),
            log_states: Vec::new(),
            cabinet_sessions: Vec::new(),
            view: TriageViewContext::default(),
        }
    }

    /// Creates a session and loads log states and work sessions.
    ///
    /// Load failures are reported through the notifier; the session is still
    /// returned with whatever could be loaded.
    pub async fn open_session(&self) -> LogTriageSession {
        let mut session = self.new_session();
        if let Err(error) = session.refresh().await {
            warn!(error = %error, "log triage session opened with incomplete state");
        }
        session
    }
}

/// Per-client log triage state.
pub struct LogTriageSession {
    service: LogTriageService,
    logs: Vec<ProcessedLogEntry>,
    log_states: Vec<LogState>,
    cabinet_sessions: Vec<CabinetWorkSession>,
    view: TriageViewContext,
}

impl LogTriageSession {
    /// Reloads log states and work sessions from the store.
    ///
    /// Both loads are attempted; the first failure is returned.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let log_states = self.load_log_states().await;
        let sessions = self.load_cabinet_sessions().await;
        log_states.and(sessions)
    }

    /// Every uploaded log with its triage state, in upload order.
    #[must_use]
    pub fn logs(&self) -> &[ProcessedLogEntry] {
        &self.logs
    }

    /// Last-known log state rows, most recently updated first.
    #[must_use]
    pub fn log_states(&self) -> &[LogState] {
        &self.log_states
    }

    /// Last-known work sessions of all clients.
    #[must_use]
    pub fn cabinet_sessions(&self) -> &[CabinetWorkSession] {
        &self.cabinet_sessions
    }

    /// Cabinet this client is working on.
    #[must_use]
    pub fn active_cabinet(&self) -> Option<&str> {
        self.view.active_cabinet.as_deref()
    }

    /// Whether processed logs are shown.
    #[must_use]
    pub fn show_processed(&self) -> bool {
        self.view.show_processed
    }

    /// Current view context.
    #[must_use]
    pub fn view_context(&self) -> &TriageViewContext {
        &self.view
    }

    /// Shows or hides processed logs.
    pub fn set_show_processed(&mut self, show_processed: bool) {
        self.view.show_processed = show_processed;
    }

    fn notify(&self, notification: Notification) {
        self.service.notifier.notify(notification);
    }

    fn fail(&self, title: &str, description: &str, error: AppError) -> AppError {
        self.notify(Notification::error(title, description));
        error
    }
}
