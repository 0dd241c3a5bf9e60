//! Vector store trait.
//!
//! Defines the schema, index, and upsert contract the pipeline consumes,
//! plus search and delete. Implementations (Postgres + pgvector) live in
//! prodvec-infra.

use prodvec_types::error::RepositoryError;
use prodvec_types::record::{DeleteScope, SearchHit, SearchQuery, VectorRecord};

/// Trait for a vector-indexed record store.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait VectorStore: Send + Sync {
    /// Ensure the backing table and its metadata index exist. Idempotent.
    fn create_tables(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Ensure the similarity index over embeddings exists. Idempotent.
    fn create_index(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Drop the similarity index if present. Idempotent.
    fn drop_index(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Insert or replace records by id. Returns the number of rows written.
    fn upsert(
        &self,
        records: &[VectorRecord],
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Nearest records to the query embedding, ascending by distance.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, RepositoryError>> + Send;

    /// Delete records. Returns the number of rows removed.
    fn delete(
        &self,
        scope: &DeleteScope,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
