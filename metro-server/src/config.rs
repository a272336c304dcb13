//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DATA_PATH_VAR: &str = "METRO_DATA_PATH";
const BIND_ADDR_VAR: &str = "METRO_BIND_ADDR";
const SEARCH_TIMEOUT_VAR: &str = "METRO_SEARCH_TIMEOUT_MS";
const ALLOWED_ORIGINS_VAR: &str = "METRO_ALLOWED_ORIGINS";

const DEFAULT_DATA_PATH: &str = "data/stations.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value:?}")]
    InvalidBindAddr { var: &'static str, value: String },

    #[error("{var} is not a whole number of milliseconds: {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path to the station dataset (JSON).
    pub data_path: PathBuf,

    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Per-search time budget; unlimited when absent.
    pub search_timeout: Option<Duration>,

    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Blank values count as unset.
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let data_path = get(DATA_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let bind_value = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr =
            bind_value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr {
                    var: BIND_ADDR_VAR,
                    value: bind_value.clone(),
                })?;

        let search_timeout = get(SEARCH_TIMEOUT_VAR)
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidTimeout {
                        var: SEARCH_TIMEOUT_VAR,
                        value,
                    })
            })
            .transpose()?;

        let allowed_origins = get(ALLOWED_ORIGINS_VAR)
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            data_path,
            bind_addr,
            search_timeout,
            allowed_origins,
        })
    }
}
