//! Setup and wiring
//!
//! - Project initialization (`.strand/` directory and default config file)
//! - Construction of embedder, store, and completion provider from `Config`
//! - Assembly of the retriever, agent, and ingestor

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::adapters::completion::{OllamaCompletionConfig, OllamaCompletionProvider};
use crate::adapters::embeddings::{
    HashingEmbeddingProvider, OllamaEmbeddingConfig, OllamaEmbeddingProvider, OpenAiEmbeddingConfig,
    OpenAiEmbeddingProvider,
};
use crate::adapters::store::{InMemoryVectorStore, PgVectorStore, SqliteVectorStore};
use crate::domain::errors::DomainResult;
use crate::domain::models::{Config, EmbeddingProviderKind, RetryConfig, StoreBackend};
use crate::domain::ports::{CompletionProvider, EmbeddingProvider, VectorStore};
use crate::infrastructure::config::CONFIG_DIR;
use crate::infrastructure::http::RetryPolicy;
use crate::services::{Agent, Ingestor, Retriever, SAMPLE_DOCUMENTS};

/// Default configuration template content
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Strand configuration
# Override settings by editing this file, adding .strand/local.yaml, or setting
# environment variables with the STRAND_ prefix (use __ for nesting).
#
# Example environment variables:
#   export STRAND_STORE__URL=postgres://postgres@localhost:5432/ai_agent
#   export STRAND_STORE__PASSWORD=secret
#   export STRAND_RETRIEVAL__TOP_K=5
#   export STRAND_LOGGING__LEVEL=debug

store:
  # postgres, sqlite, or memory
  backend: postgres
  url: "postgres://postgres@localhost:5432/ai_agent"
  table: documents
  content_column: content
  embedding_column: embedding
  id_column: id
  max_connections: 5
  acquire_timeout_secs: 10
  query_timeout_secs: 30

embedding:
  # ollama, openai, or hashing
  provider: ollama
  base_url: "http://localhost:11434"
  model: all-minilm
  dimension: 384
  timeout_secs: 30
  max_batch_size: 64

completion:
  url: "http://localhost:11434/api/generate"
  model: "deepseek-r1:7b"
  timeout_secs: 300

retrieval:
  top_k: 3
  # grounded or cited
  template: grounded

retry:
  max_retries: 2
  initial_backoff_ms: 500
  max_backoff_ms: 10000

logging:
  # trace, debug, info, warn, error
  level: warn
  # json or pretty
  format: pretty
"#;

/// Setup paths for a project root
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl SetupPaths {
    pub fn new(root: &Path) -> Self {
        let config_dir = root.join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            config_dir,
        }
    }

    /// Setup paths for the current directory
    pub fn current() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(&current_dir))
    }

    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Write the default config file, creating `.strand/` as needed.
///
/// Returns `false` when a config file already exists and `force` is unset.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Worst-case wall time of one HTTP call including retries and backoff.
pub fn request_budget(timeout_secs: u64, retry: &RetryConfig) -> Duration {
    let attempts = u64::from(retry.max_retries) + 1;
    Duration::from_secs(timeout_secs.saturating_mul(attempts))
        + Duration::from_millis(retry.max_backoff_ms.saturating_mul(u64::from(retry.max_retries)))
}

pub fn build_embedder(config: &Config) -> DomainResult<Arc<dyn EmbeddingProvider>> {
    let retry = RetryPolicy::from(&config.retry);
    let embedder: Arc<dyn EmbeddingProvider> = match config.embedding.provider {
        EmbeddingProviderKind::Ollama => Arc::new(OllamaEmbeddingProvider::new(
            OllamaEmbeddingConfig::from(&config.embedding),
            retry,
        )?),
        EmbeddingProviderKind::OpenAi => Arc::new(OpenAiEmbeddingProvider::new(
            OpenAiEmbeddingConfig::from(&config.embedding),
            retry,
        )?),
        EmbeddingProviderKind::Hashing => {
            Arc::new(HashingEmbeddingProvider::new(config.embedding.dimension)?)
        }
    };
    debug!(provider = embedder.name(), dimension = embedder.dimension(), "embedder ready");
    Ok(embedder)
}

/// Open the configured store. Postgres connects lazily; SQLite opens its file.
pub async fn build_store(config: &Config) -> DomainResult<Arc<dyn VectorStore>> {
    let dimension = config.embedding.dimension;
    let store: Arc<dyn VectorStore> = match config.store.backend {
        StoreBackend::Postgres => Arc::new(PgVectorStore::connect_lazy(&config.store, dimension)?),
        StoreBackend::Sqlite => Arc::new(SqliteVectorStore::connect(&config.store, dimension).await?),
        StoreBackend::Memory => Arc::new(InMemoryVectorStore::new(dimension)),
    };
    debug!(backend = store.name(), "vector store ready");
    Ok(store)
}

pub fn build_completion(config: &Config) -> DomainResult<Arc<dyn CompletionProvider>> {
    Ok(Arc::new(OllamaCompletionProvider::new(
        OllamaCompletionConfig::from(&config.completion),
        RetryPolicy::from(&config.retry),
    )?))
}

/// The collaborators shared by every command.
#[derive(Clone)]
pub struct Components {
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<dyn VectorStore>,
}

impl Components {
    /// Build the collaborators. A memory store lives only as long as this
    /// process, so it starts out holding the sample documents.
    pub async fn from_config(config: &Config) -> DomainResult<Self> {
        let components = Self {
            embedder: build_embedder(config)?,
            store: build_store(config).await?,
        };
        if config.store.backend == StoreBackend::Memory {
            components.preload_samples().await?;
        }
        Ok(components)
    }

    async fn preload_samples(&self) -> DomainResult<()> {
        let texts = SAMPLE_DOCUMENTS.iter().map(ToString::to_string).collect();
        let report = self.ingestor()?.ingest(texts).await;
        if report.inserted() == 0 {
            warn!(
                error = report.first_error.as_deref().unwrap_or("nothing was inserted"),
                "memory store starts empty"
            );
        } else {
            debug!(inserted = report.inserted(), failed = report.failed, "memory store preloaded");
        }
        Ok(())
    }

    pub fn retriever(&self, config: &Config) -> DomainResult<Retriever> {
        Ok(Retriever::new(self.embedder.clone(), self.store.clone())?
            .with_embed_timeout(request_budget(config.embedding.timeout_secs, &config.retry)))
    }

    pub fn ingestor(&self) -> DomainResult<Ingestor> {
        Ingestor::new(self.embedder.clone(), self.store.clone())
    }

    pub fn agent(&self, config: &Config, completion: Arc<dyn CompletionProvider>) -> DomainResult<Agent> {
        Ok(Agent::new(self.retriever(config)?, completion)
            .with_template(config.retrieval.template)
            .with_top_k(config.retrieval.top_k)
            .with_completion_timeout(request_budget(config.completion.timeout_secs, &config.retry)))
    }
}

/// Wire a ready-to-run agent from configuration.
pub async fn build_agent(config: &Config) -> DomainResult<Agent> {
    let components = Components::from_config(config).await?;
    components.agent(config, build_completion(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let parsed: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.store.url, defaults.store.url);
        assert_eq!(parsed.embedding.dimension, defaults.embedding.dimension);
        assert_eq!(parsed.completion.model, defaults.completion.model);
        assert_eq!(parsed.retrieval.top_k, defaults.retrieval.top_k);
        assert_eq!(parsed.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_create_config_file_respects_force() {
        let dir = tempfile::tempdir().unwrap();
        let paths = SetupPaths::new(dir.path());
        assert!(!paths.is_initialized());

        assert!(create_config_file(&paths, false).unwrap());
        assert!(paths.is_initialized());

        fs::write(&paths.config_file, "retrieval:\n  top_k: 9\n").unwrap();
        assert!(!create_config_file(&paths, false).unwrap());
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("top_k: 9"));

        assert!(create_config_file(&paths, true).unwrap());
        assert!(fs::read_to_string(&paths.config_file).unwrap().contains("top_k: 3"));
    }

    #[test]
    fn test_request_budget() {
        let retry = RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 100,
            max_backoff_ms: 1000,
        };
        assert_eq!(request_budget(10, &retry), Duration::from_secs(32));
        assert_eq!(
            request_budget(10, &RetryConfig { max_retries: 0, ..retry }),
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn test_build_agent_with_memory_store() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        config.embedding.provider = EmbeddingProviderKind::Hashing;

        let agent = build_agent(&config).await.unwrap();
        assert_eq!(agent.top_k(), 3);
        assert_eq!(agent.retriever().store().name(), "memory");
        assert_eq!(agent.retriever().embedder().name(), "hashing");

        assert_eq!(agent.retriever().store().count().await.unwrap(), SAMPLE_DOCUMENTS.len());
        let found = agent.retriever().retrieve("DeepSeek is a local LLM server.", 1).await;
        assert_eq!(found, vec!["DeepSeek is a local LLM server."]);
    }

    #[tokio::test]
    async fn test_persistent_backends_start_as_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.store.backend = StoreBackend::Sqlite;
        config.store.url = format!("sqlite://{}", dir.path().join("strand.db").display());
        config.embedding.provider = EmbeddingProviderKind::Hashing;

        let components = Components::from_config(&config).await.unwrap();
        components.store.ensure_schema().await.unwrap();
        assert_eq!(components.store.count().await.unwrap(), 0);
    }
}
