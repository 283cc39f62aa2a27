use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use logdesk_application::LogStateRepository;
use logdesk_core::AppResult;
use logdesk_domain::{LogState, LogStateKey, LogStatePatch};
use tokio::sync::RwLock;

/// In-memory log state repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryLogStateRepository {
    states: RwLock<HashMap<LogStateKey, LogState>>,
}

impl InMemoryLogStateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStateRepository for InMemoryLogStateRepository {
    async fn list_log_states(&self) -> AppResult<Vec<LogState>> {
        let mut listed: Vec<LogState> = self.states.read().await.values().cloned().collect();
        listed.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(listed)
    }

    async fn upsert_log_state(
        &self,
        key: &LogStateKey,
        patch: &LogStatePatch,
    ) -> AppResult<LogState> {
        let now = Utc::now();
        let mut states = self.states.write().await;

        let state = states
            .entry(key.clone())
            .and_modify(|existing| existing.apply_patch(patch, now))
            .or_insert_with(|| LogState::from_patch(key, patch, now));

        Ok(state.clone())
    }
}
