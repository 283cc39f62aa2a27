use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logdesk_application::CabinetSessionRepository;
use logdesk_core::AppResult;
use logdesk_domain::CabinetWorkSession;
use serde::Serialize;

use crate::PostgrestClient;

const TABLE: &str = "cabinet_work_sessions";

/// PostgREST implementation of the cabinet work session repository port.
#[derive(Clone)]
pub struct PostgrestCabinetSessionRepository {
    client: PostgrestClient,
}

impl PostgrestCabinetSessionRepository {
    /// Creates a repository over a configured client.
    #[must_use]
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
struct SessionUpsertRow<'a> {
    cabinet_name: &'a str,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl CabinetSessionRepository for PostgrestCabinetSessionRepository {
    async fn list_sessions(&self) -> AppResult<Vec<CabinetWorkSession>> {
        self.client.select(TABLE, "updated_at").await
    }

    async fn upsert_session(&self, cabinet_name: &str) -> AppResult<CabinetWorkSession> {
        let row = SessionUpsertRow {
            cabinet_name,
            updated_at: Utc::now(),
        };

        self.client.upsert(TABLE, &["cabinet_name"], &row).await
    }

    async fn delete_sessions(&self, cabinet_name: &str) -> AppResult<u64> {
        self.client
            .delete_eq(TABLE, "cabinet_name", cabinet_name)
            .await
    }
}
