use std::sync::Arc;

use logdesk_application::LogTriageService;

use crate::workspaces::{ClientWorkspaces, WorkspaceLimits};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub workspaces: Arc<ClientWorkspaces>,
}

impl AppState {
    pub fn new(triage_service: LogTriageService, limits: WorkspaceLimits) -> Self {
        Self {
            workspaces: Arc::new(ClientWorkspaces::new(triage_service, limits)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use logdesk_application::LogTriageService;
    use logdesk_domain::IdentityStrategy;
    use logdesk_infrastructure::{
        InMemoryCabinetSessionRepository, InMemoryLogStateRepository, TracingNotifier,
    };

    use super::AppState;
    use crate::workspaces::WorkspaceLimits;

    pub(crate) fn memory_triage_service() -> LogTriageService {
        LogTriageService::new(
            Arc::new(InMemoryLogStateRepository::new()),
            Arc::new(InMemoryCabinetSessionRepository::new()),
            Arc::new(TracingNotifier::new()),
            IdentityStrategy::ContentHash,
        )
    }

    pub(crate) fn memory_state() -> AppState {
        AppState::new(
            memory_triage_service(),
            WorkspaceLimits {
                idle_timeout: Duration::from_secs(600),
                max_clients: 16,
            },
        )
    }
}
