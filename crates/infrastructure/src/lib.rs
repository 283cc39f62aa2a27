//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_cabinet_session_repository;
mod in_memory_log_state_repository;
mod postgrest_cabinet_session_repository;
mod postgrest_client;
mod postgrest_log_state_repository;
mod tracing_notifier;

pub use in_memory_cabinet_session_repository::InMemoryCabinetSessionRepository;
pub use in_memory_log_state_repository::InMemoryLogStateRepository;
pub use postgrest_cabinet_session_repository::PostgrestCabinetSessionRepository;
pub use postgrest_client::PostgrestClient;
pub use postgrest_log_state_repository::PostgrestLogStateRepository;
pub use tracing_notifier::TracingNotifier;
