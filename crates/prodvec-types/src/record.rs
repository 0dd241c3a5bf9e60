//! Vector records and search types exchanged with the vector store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::product::ProductMetadata;

/// A prepared product ready for upsert: id, metadata, content, embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Time-ordered identifier (UUID v7). Not derived from the input row.
    pub id: Uuid,
    pub metadata: ProductMetadata,
    /// Product description, copied verbatim from the source row.
    pub content: String,
    pub embedding: Vec<f32>,
}

/// JSON object matched by containment against stored metadata.
pub type MetadataFilter = serde_json::Map<String, serde_json::Value>;

/// Nearest-neighbour query against the store.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub embedding: Vec<f32>,
    pub limit: usize,
    pub filter: Option<MetadataFilter>,
}

/// A single search result, ranked by ascending cosine distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub metadata: serde_json::Value,
    pub content: String,
    pub distance: f64,
}

impl SearchHit {
    /// Cosine similarity derived from the cosine distance.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// Which records a delete should remove.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteScope {
    All,
    Ids(Vec<Uuid>),
    Metadata(MetadataFilter),
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub records_upserted: u64,
}
