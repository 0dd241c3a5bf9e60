//! Configuration types for prodvec.
//!
//! `AppConfig` represents `config.toml`. Every section and field has a
//! default, so an empty file (or no file) yields a working configuration
//! apart from the database URL and the API key, which come from the
//! environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
}

/// Where the product table is read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_path")]
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("data/all-outputs-fixed.csv")
}

fn default_delimiter() -> char {
    ','
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_source_path(),
            delimiter: default_delimiter(),
        }
    }
}

/// OpenAI-compatible embeddings endpoint settings.
///
/// The API key is deliberately absent: it is read from `OPENAI_API_KEY` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Postgres connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` URL. Usually supplied through `TIMESCALE_SERVICE_URL`.
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            service_url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Target table and index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
    #[serde(default)]
    pub index: IndexConfig,
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_table_name() -> String {
    "embeddings".to_string()
}

/// text-embedding-3-small output size.
fn default_embedding_dimensions() -> usize {
    1536
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            table_name: default_table_name(),
            embedding_dimensions: default_embedding_dimensions(),
            index: IndexConfig::default(),
        }
    }
}

/// Approximate nearest-neighbour index built over the embedding column.
///
/// Unset parameters are left to the database defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndexConfig {
    /// StreamingDiskANN from pgvectorscale.
    DiskAnn {
        num_neighbors: Option<u32>,
        search_list_size: Option<u32>,
        max_alpha: Option<f64>,
    },
    Hnsw {
        m: Option<u32>,
        ef_construction: Option<u32>,
    },
    IvfFlat {
        lists: Option<u32>,
    },
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig::DiskAnn {
            num_neighbors: None,
            search_list_size: None,
            max_alpha: None,
        }
    }
}
