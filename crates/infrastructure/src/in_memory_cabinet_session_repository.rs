use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use logdesk_application::CabinetSessionRepository;
use logdesk_core::AppResult;
use logdesk_domain::CabinetWorkSession;
use tokio::sync::RwLock;

/// In-memory cabinet work session repository keyed by cabinet name.
#[derive(Debug, Default)]
pub struct InMemoryCabinetSessionRepository {
    sessions: RwLock<HashMap<String, CabinetWorkSession>>,
}

impl InMemoryCabinetSessionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CabinetSessionRepository for InMemoryCabinetSessionRepository {
    async fn list_sessions(&self) -> AppResult<Vec<CabinetWorkSession>> {
        let mut listed: Vec<CabinetWorkSession> =
            self.sessions.read().await.values().cloned().collect();
        listed.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(listed)
    }

    async fn upsert_session(&self, cabinet_name: &str) -> AppResult<CabinetWorkSession> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;

        let session = sessions
            .entry(cabinet_name.to_owned())
            .and_modify(|existing| existing.updated_at = now)
            .or_insert_with(|| CabinetWorkSession::start(cabinet_name, now));

        Ok(session.clone())
    }

    async fn delete_sessions(&self, cabinet_name: &str) -> AppResult<u64> {
        let removed = self.sessions.write().await.remove(cabinet_name);
        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use logdesk_application::CabinetSessionRepository;

    use super::InMemoryCabinetSessionRepository;

    #[tokio::test]
    async fn repeated_start_refreshes_the_same_claim() {
        let repository = InMemoryCabinetSessionRepository::new();

        let first = repository.upsert_session("Room1").await;
        let second = repository.upsert_session("Room1").await;

        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("in-memory upserts should succeed");
        };
        assert_eq!(first.id, second.id);
        assert_eq!(first.started_at, second.started_at);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(repository.list_sessions().await.map(|sessions| sessions.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn delete_reports_removed_rows() {
        let repository = InMemoryCabinetSessionRepository::new();
        assert!(repository.upsert_session("Room1").await.is_ok());

        assert_eq!(repository.delete_sessions("Room1").await.ok(), Some(1));
        assert_eq!(repository.delete_sessions("Room1").await.ok(), Some(0));
        assert_eq!(repository.list_sessions().await.map(|sessions| sessions.is_empty()).ok(), Some(true));
    }
}
