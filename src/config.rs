use alloy_primitives::Address;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::auth::DEFAULT_MIGRATION_MESSAGE;
use crate::chain::{subgraph::DEFAULT_SUBGRAPH_URL, BatchConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub rpc_url: String,
    pub subgraph_url: String,
    pub library_address: Address,
    pub migration_message: String,
    pub batch: BatchConfig,
    pub subgraph_page_size: usize,
    pub http_timeout: Duration,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let rpc_url = get("RPC_URL").ok_or(ConfigError::Missing("RPC_URL"))?;

        let library_raw =
            get("RARITY_LIBRARY_ADDRESS").ok_or(ConfigError::Missing("RARITY_LIBRARY_ADDRESS"))?;
        let library_address =
            Address::from_str(&library_raw).map_err(|_| ConfigError::Invalid {
                name: "RARITY_LIBRARY_ADDRESS",
                value: library_raw.clone(),
            })?;

        let per_chunk = parse_or(get("SUMMONERS_PER_CHUNK"), "SUMMONERS_PER_CHUNK", 70)?;
        let max_concurrent_chunks =
            parse_or(get("MAX_CONCURRENT_CHUNKS"), "MAX_CONCURRENT_CHUNKS", 5)?;
        let batch = BatchConfig::new(per_chunk, max_concurrent_chunks).map_err(|_| {
            ConfigError::Invalid {
                name: "SUMMONERS_PER_CHUNK/MAX_CONCURRENT_CHUNKS",
                value: format!("{per_chunk}/{max_concurrent_chunks}"),
            }
        })?;

        let timeout_secs: u64 = parse_or(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 15)?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            rpc_url,
            subgraph_url: get("SUBGRAPH_URL").unwrap_or_else(|| DEFAULT_SUBGRAPH_URL.to_owned()),
            library_address,
            migration_message: lookup("MIGRATION_MESSAGE")
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_MIGRATION_MESSAGE.to_owned()),
            batch,
            subgraph_page_size: parse_or(get("SUBGRAPH_PAGE_SIZE"), "SUBGRAPH_PAGE_SIZE", 1000)?
                .max(1),
            http_timeout: Duration::from_secs(timeout_secs),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_owned()),
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
