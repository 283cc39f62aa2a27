use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logdesk_application::LogStateRepository;
use logdesk_core::AppResult;
use logdesk_domain::{LogState, LogStateKey, LogStatePatch};
use serde::Serialize;

use crate::PostgrestClient;

const TABLE: &str = "log_states";
const CONFLICT_COLUMNS: [&str; 2] = ["log_id", "cabinet_name"];

/// PostgREST implementation of the log state repository port.
#[derive(Clone)]
pub struct PostgrestLogStateRepository {
    client: PostgrestClient,
}

impl PostgrestLogStateRepository {
    /// Creates a repository over a configured client.
    #[must_use]
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
struct LogStateUpsertRow<'a> {
    log_id: &'a str,
    cabinet_name: &'a str,
    #[serde(flatten)]
    patch: &'a LogStatePatch,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl LogStateRepository for PostgrestLogStateRepository {
    async fn list_log_states(&self) -> AppResult<Vec<LogState>> {
        self.client.select(TABLE, "updated_at").await
    }

    async fn upsert_log_state(
        &self,
        key: &LogStateKey,
        patch: &LogStatePatch,
    ) -> AppResult<LogState> {
        let row = LogStateUpsertRow {
            log_id: key.log_id.as_str(),
            cabinet_name: key.cabinet_name.as_str(),
            patch,
            updated_at: Utc::now(),
        };

        self.client.upsert(TABLE, &CONFLICT_COLUMNS, &row).await
    }
}
