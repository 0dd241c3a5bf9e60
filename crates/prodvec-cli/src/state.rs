//! Application state: resolved configuration plus builders for the concrete
//! source, embedder and store.
//!
//! Commands build only what they need, so `index` and `delete` never ask for
//! an API key and `ingest --dry-run` never opens a database connection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use prodvec_core::store::VectorStore;
use prodvec_infra::config::{api_key_from_env, load_layered, resolve_config_path};
use prodvec_infra::embedding::OpenAiEmbedder;
use prodvec_infra::pg::{self, PgVectorStore};
use prodvec_infra::source::CsvSource;
use prodvec_types::config::AppConfig;
use prodvec_types::error::{EmbeddingError, RepositoryError};
use prodvec_types::record::{DeleteScope, SearchHit, SearchQuery, VectorRecord};

pub struct AppState {
    pub config: AppConfig,
    pub config_path: PathBuf,
}

impl AppState {
    /// Resolve configuration: defaults, then config.toml, then environment.
    pub async fn init(config_path: Option<&Path>) -> Self {
        let config = load_layered(config_path).await;
        Self {
            config,
            config_path: resolve_config_path(config_path),
        }
    }

    /// CSV source at `input`, or the configured path.
    pub fn source(&self, input: Option<PathBuf>) -> Result<CsvSource> {
        let path = input.unwrap_or_else(|| self.config.source.path.clone());
        CsvSource::new(&path, self.config.source.delimiter)
            .with_context(|| format!("Invalid source settings for {}", path.display()))
    }

    /// Embeddings client. Requires `OPENAI_API_KEY`.
    pub fn embedder(&self) -> Result<OpenAiEmbedder> {
        let api_key = api_key_from_env().ok_or(EmbeddingError::MissingApiKey)?;
        let embedder = OpenAiEmbedder::new(
            &self.config.openai,
            api_key,
            self.config.vector_store.embedding_dimensions,
        )?;
        Ok(embedder)
    }

    /// Connected pgvector store.
    pub async fn store(&self) -> Result<PgVectorStore> {
        let pool = pg::connect(&self.config.database)
            .await
            .context("Failed to connect to the vector database")?;
        Ok(PgVectorStore::new(pool, &self.config.vector_store)?)
    }
}

/// Store used by `ingest`: connected for real runs, detached for dry runs.
pub enum IngestStore {
    Connected(PgVectorStore),
    Detached,
}

impl IngestStore {
    fn connected(&self) -> Result<&PgVectorStore, RepositoryError> {
        match self {
            Self::Connected(store) => Ok(store),
            Self::Detached => Err(RepositoryError::Connection(
                "vector store is not connected (dry run)".to_string(),
            )),
        }
    }
}

impl VectorStore for IngestStore {
    async fn create_tables(&self) -> Result<(), RepositoryError> {
        self.connected()?.create_tables().await
    }

    async fn create_index(&self) -> Result<(), RepositoryError> {
        self.connected()?.create_index().await
    }

    async fn drop_index(&self) -> Result<(), RepositoryError> {
        self.connected()?.drop_index().await
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<u64, RepositoryError> {
        self.connected()?.upsert(records).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepositoryError> {
        self.connected()?.search(query).await
    }

    async fn delete(&self, scope: &DeleteScope) -> Result<u64, RepositoryError> {
        self.connected()?.delete(scope).await
    }
}
