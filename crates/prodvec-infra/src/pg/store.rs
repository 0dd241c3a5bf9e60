//! Postgres + pgvector implementation of `VectorStore`.
//!
//! One table per store: `id UUID`, `metadata JSONB`, `contents TEXT`,
//! `embedding VECTOR(n)`. Upserts run in a single transaction, so a batch
//! is written entirely or not at all.

use pgvector::Vector;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use prodvec_core::store::VectorStore;
use prodvec_types::config::{IndexConfig, VectorStoreConfig};
use prodvec_types::error::RepositoryError;
use prodvec_types::record::{DeleteScope, SearchHit, SearchQuery, VectorRecord};

use super::sql;
use super::table::TableName;

/// pgvector-backed store.
pub struct PgVectorStore {
    pool: PgPool,
    table: TableName,
    dimensions: usize,
    index: IndexConfig,
}

impl PgVectorStore {
    pub fn new(pool: PgPool, config: &VectorStoreConfig) -> Result<Self, RepositoryError> {
        if config.embedding_dimensions == 0 {
            return Err(RepositoryError::InvalidInput(
                "embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self {
            pool,
            table: TableName::new(config.schema.clone(), config.table_name.clone())?,
            dimensions: config.embedding_dimensions,
            index: config.index.clone(),
        })
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    async fn execute(&self, statement: &str, what: &str) -> Result<u64, RepositoryError> {
        sqlx::query(statement)
            .execute(&self.pool)
            .await
            .map(|done| done.rows_affected())
            .map_err(|e| RepositoryError::Query(format!("failed to {what}: {e}")))
    }

    fn check_dimensions(&self, embedding: &[f32]) -> Result<(), RepositoryError> {
        if embedding.len() != self.dimensions {
            return Err(RepositoryError::InvalidInput(format!(
                "embedding has {} dimensions, table expects {}",
                embedding.len(),
                self.dimensions
            )));
        }
        Ok(())
    }
}

impl VectorStore for PgVectorStore {
    async fn create_tables(&self) -> Result<(), RepositoryError> {
        self.execute(sql::CREATE_VECTOR_EXTENSION, "ensure pgvector extension")
            .await?;
        self.execute(&sql::create_table(&self.table, self.dimensions), "create vector table")
            .await?;
        self.execute(&sql::create_metadata_index(&self.table), "create metadata index")
            .await?;
        tracing::info!(table = %self.table.qualified(), dimensions = self.dimensions, "vector table ready");
        Ok(())
    }

    async fn create_index(&self) -> Result<(), RepositoryError> {
        for extension in sql::required_extensions(&self.index) {
            self.execute(extension, "ensure index extension").await?;
        }
        self.execute(
            &sql::create_embedding_index(&self.table, &self.index),
            "create embedding index",
        )
        .await?;
        tracing::info!(index = %self.table.embedding_index_name(), "embedding index ready");
        Ok(())
    }

    async fn drop_index(&self) -> Result<(), RepositoryError> {
        self.execute(&sql::drop_embedding_index(&self.table), "drop embedding index")
            .await?;
        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<u64, RepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        for record in records {
            self.check_dimensions(&record.embedding)?;
        }

        let statement = sql::upsert(&self.table);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let mut written = 0u64;
        for record in records {
            let done = sqlx::query(&statement)
                .bind(record.id)
                .bind(Json(&record.metadata))
                .bind(&record.content)
                .bind(Vector::from(record.embedding.clone()))
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(format!("failed to upsert {}: {e}", record.id)))?;
            written += done.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(format!("failed to commit upsert: {e}")))?;
        Ok(written)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepositoryError> {
        self.check_dimensions(&query.embedding)?;
        let limit = i64::try_from(query.limit)
            .map_err(|_| RepositoryError::InvalidInput(format!("limit {} is too large", query.limit)))?;

        let statement = sql::search(&self.table, query.filter.is_some());
        let mut q = sqlx::query(&statement).bind(Vector::from(query.embedding.clone()));
        if let Some(filter) = &query.filter {
            q = q.bind(Json(filter));
        }
        let rows = q
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(hit_from_row).collect()
    }

    async fn delete(&self, scope: &DeleteScope) -> Result<u64, RepositoryError> {
        let result = match scope {
            DeleteScope::All => sqlx::query(&sql::delete_all(&self.table)).execute(&self.pool).await,
            DeleteScope::Ids(ids) => {
                if ids.is_empty() {
                    return Ok(0);
                }
                sqlx::query(&sql::delete_by_ids(&self.table))
                    .bind(ids.as_slice())
                    .execute(&self.pool)
                    .await
            }
            DeleteScope::Metadata(filter) => {
                sqlx::query(&sql::delete_by_metadata(&self.table))
                    .bind(Json(filter))
                    .execute(&self.pool)
                    .await
            }
        };
        let deleted = result
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .rows_affected();
        tracing::info!(deleted, "deleted records");
        Ok(deleted)
    }
}

fn hit_from_row(row: &sqlx::postgres::PgRow) -> Result<SearchHit, RepositoryError> {
    let query_err = |e: sqlx::Error| RepositoryError::Query(e.to_string());
    let id: Uuid = row.try_get("id").map_err(query_err)?;
    let metadata: Option<Json<serde_json::Value>> = row.try_get("metadata").map_err(query_err)?;
    let content: Option<String> = row.try_get("contents").map_err(query_err)?;
    let distance: f64 = row.try_get("distance").map_err(query_err)?;
    Ok(SearchHit {
        id,
        metadata: metadata.map(|m| m.0).unwrap_or(serde_json::Value::Null),
        content: content.unwrap_or_default(),
        distance,
    })
}
