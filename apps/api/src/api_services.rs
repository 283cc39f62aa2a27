use std::sync::Arc;

use logdesk_application::{CabinetSessionRepository, LogStateRepository, LogTriageService};
use logdesk_core::AppError;
use logdesk_infrastructure::{
    InMemoryCabinetSessionRepository, InMemoryLogStateRepository,
    PostgrestCabinetSessionRepository, PostgrestClient, PostgrestLogStateRepository,
    TracingNotifier,
};
use tracing::info;

use crate::api_config::{ApiConfig, LogStoreConfig};

pub fn build_triage_service(config: &ApiConfig) -> Result<LogTriageService, AppError> {
    let (log_state_repository, session_repository): (
        Arc<dyn LogStateRepository>,
        Arc<dyn CabinetSessionRepository>,
    ) = match &config.log_store {
        LogStoreConfig::Memory => (
            Arc::new(InMemoryLogStateRepository::new()),
            Arc::new(InMemoryCabinetSessionRepository::new()),
        ),
        LogStoreConfig::Postgrest(store) => {
            let http_client = reqwest::Client::builder()
                .timeout(store.timeout)
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build remote store client: {error}"))
                })?;
            let client = PostgrestClient::new(
                http_client,
                store.base_url.as_str(),
                store.api_key.as_str(),
            )?;

            (
                Arc::new(PostgrestLogStateRepository::new(client.clone())),
                Arc::new(PostgrestCabinetSessionRepository::new(client)),
            )
        }
    };

    info!(
        provider = config.log_store.provider_name(),
        identity_strategy = config.identity_strategy.as_str(),
        "log store configured"
    );

    Ok(LogTriageService::new(
        log_state_repository,
        session_repository,
        Arc::new(TracingNotifier::new()),
        config.identity_strategy,
    ))
}
