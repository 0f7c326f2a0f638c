use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::adapters::store::validate_identifier;
use crate::domain::models::config::{Config, StoreBackend};

/// Directory holding project configuration, relative to the working directory.
pub const CONFIG_DIR: &str = ".strand";

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "STRAND_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid max_batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid SQL identifier for {field}: {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .strand/config.yaml (project config, created by `strand init`)
    /// 3. .strand/local.yaml (local overrides, optional)
    /// 4. Environment variables (STRAND_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`ConfigLoader::load`], resolving `.strand/` under `root`.
    pub fn load_from_dir(root: &Path) -> Result<Config> {
        let dir = root.join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Store
        if config.store.backend != StoreBackend::Memory && config.store.url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("store.url"));
        }

        if config.store.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.store.max_connections));
        }

        for (field, secs) in [
            ("store.acquire_timeout_secs", config.store.acquire_timeout_secs),
            ("store.query_timeout_secs", config.store.query_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationFailed(format!("{field} must be at least 1")));
            }
        }

        for (field, value) in [
            ("store.table", &config.store.table),
            ("store.content_column", &config.store.content_column),
            ("store.embedding_column", &config.store.embedding_column),
            ("store.id_column", &config.store.id_column),
        ] {
            if validate_identifier(value).is_err() {
                return Err(ConfigError::InvalidIdentifier {
                    field,
                    value: value.clone(),
                });
            }
        }

        // Embedding
        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }

        if config.embedding.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.embedding.max_batch_size));
        }

        if config.embedding.model.trim().is_empty() {
            return Err(ConfigError::EmptyValue("embedding.model"));
        }

        if config.embedding.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "embedding.timeout_secs must be at least 1".to_string(),
            ));
        }

        // Completion
        if config.completion.url.trim().is_empty() {
            return Err(ConfigError::EmptyValue("completion.url"));
        }

        if config.completion.model.trim().is_empty() {
            return Err(ConfigError::EmptyValue("completion.model"));
        }

        if config.completion.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "completion.timeout_secs must be at least 1".to_string(),
            ));
        }

        // Retrieval
        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        // Retry
        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
