use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use logdesk_core::AppError;
use logdesk_domain::IdentityStrategy;
use tracing_subscriber::EnvFilter;

use crate::workspaces::WorkspaceLimits;

const DEFAULT_API_PORT: u16 = 3001;
const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 15;
const DEFAULT_CLIENT_IDLE_TIMEOUT_SECONDS: u64 = 1800;
const DEFAULT_MAX_CLIENTS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgrestStoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStoreConfig {
    Memory,
    Postgrest(PostgrestStoreConfig),
}

impl LogStoreConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgrest(_) => "postgrest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub log_store: LogStoreConfig,
    pub identity_strategy: IdentityStrategy,
    pub workspace_limits: WorkspaceLimits,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_number(&lookup, "API_PORT", DEFAULT_API_PORT)?;

        let log_store = match lookup("LOG_STORE_PROVIDER")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => LogStoreConfig::Memory,
            "postgrest" => {
                let timeout_seconds = parse_number(
                    &lookup,
                    "LOG_STORE_TIMEOUT_SECONDS",
                    DEFAULT_STORE_TIMEOUT_SECONDS,
                )?;

                LogStoreConfig::Postgrest(PostgrestStoreConfig {
                    base_url: required_non_empty(&lookup, "LOG_STORE_URL")?,
                    api_key: required_non_empty(&lookup, "LOG_STORE_API_KEY")?,
                    timeout: Duration::from_secs(timeout_seconds),
                })
            }
            other => {
                return Err(AppError::Validation(format!(
                    "LOG_STORE_PROVIDER must be either 'memory' or 'postgrest', got '{other}'"
                )));
            }
        };

        let identity_strategy = match lookup("LOG_IDENTITY_STRATEGY") {
            Some(value) => IdentityStrategy::from_str(value.trim())?,
            None => IdentityStrategy::default(),
        };

        let max_clients = parse_number(&lookup, "LOG_MAX_CLIENTS", DEFAULT_MAX_CLIENTS)?;
        if max_clients == 0 {
            return Err(AppError::Validation(
                "LOG_MAX_CLIENTS must be at least 1".to_owned(),
            ));
        }
        let workspace_limits = WorkspaceLimits {
            idle_timeout: Duration::from_secs(parse_number(
                &lookup,
                "LOG_CLIENT_IDLE_TIMEOUT_SECONDS",
                DEFAULT_CLIENT_IDLE_TIMEOUT_SECONDS,
            )?),
            max_clients,
        };

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            log_store,
            identity_strategy,
            workspace_limits,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_number<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use logdesk_core::AppError;
    use logdesk_domain::IdentityStrategy;

    use super::{ApiConfig, LogStoreConfig};

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_use_memory_store_and_content_hash_identity() {
        let Ok(config) = load(&[]) else {
            panic!("defaults should load");
        };

        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.log_store, LogStoreConfig::Memory);
        assert_eq!(config.identity_strategy, IdentityStrategy::ContentHash);
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok().as_deref(),
            Some("127.0.0.1:3001")
        );
    }

    #[test]
    fn postgrest_store_requires_url_and_key() {
        let missing_key = load(&[
            ("LOG_STORE_PROVIDER", "postgrest"),
            ("LOG_STORE_URL", "https://project.supabase.co"),
        ]);
        assert!(matches!(missing_key, Err(AppError::Validation(_))));

        let blank_url = load(&[
            ("LOG_STORE_PROVIDER", "postgrest"),
            ("LOG_STORE_URL", "  "),
            ("LOG_STORE_API_KEY", "anon"),
        ]);
        assert!(matches!(blank_url, Err(AppError::Validation(_))));
    }

    #[test]
    fn postgrest_store_reads_timeout() {
        let Ok(config) = load(&[
            ("LOG_STORE_PROVIDER", "postgrest"),
            ("LOG_STORE_URL", "https://project.supabase.co"),
            ("LOG_STORE_API_KEY", "anon"),
            ("LOG_STORE_TIMEOUT_SECONDS", "4"),
        ]) else {
            panic!("postgrest config should load");
        };

        let LogStoreConfig::Postgrest(store) = config.log_store else {
            panic!("expected postgrest store");
        };
        assert_eq!(store.timeout, Duration::from_secs(4));
        assert_eq!(store.api_key, "anon");
    }

    #[test]
    fn invalid_numbers_fail_instead_of_falling_back() {
        assert!(matches!(
            load(&[("API_PORT", "http")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("API_PORT", "70000")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("LOG_MAX_CLIENTS", "0")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("LOG_CLIENT_IDLE_TIMEOUT_SECONDS", "-5")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn client_limits_are_read_from_env() {
        let Ok(config) = load(&[
            ("API_PORT", "8080"),
            ("LOG_MAX_CLIENTS", "4"),
            ("LOG_CLIENT_IDLE_TIMEOUT_SECONDS", "60"),
        ]) else {
            panic!("config should load");
        };

        assert_eq!(config.api_port, 8080);
        assert_eq!(config.workspace_limits.max_clients, 4);
        assert_eq!(config.workspace_limits.idle_timeout, Duration::from_secs(60));
    }

    #[test]
    fn unknown_provider_and_strategy_are_rejected() {
        assert!(matches!(
            load(&[("LOG_STORE_PROVIDER", "sqlite")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            load(&[("LOG_IDENTITY_STRATEGY", "random")]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn batch_position_strategy_can_be_selected() {
        let config = load(&[("LOG_IDENTITY_STRATEGY", "batch_position")]);
        assert_eq!(
            config.map(|config| config.identity_strategy).ok(),
            Some(IdentityStrategy::BatchPosition)
        );
    }
}
