//! In-memory collaborators shared by the unit tests in this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use prodvec_types::error::{EmbeddingError, RepositoryError};
use prodvec_types::product::ProductRow;
use prodvec_types::record::{DeleteScope, SearchHit, SearchQuery, VectorRecord};

use crate::embedder::Embedder;
use crate::store::VectorStore;

/// Deterministic embedder: the first component is the text length.
pub struct MockEmbedder {
    pub dimension: usize,
    pub returned_dimension: usize,
    pub fail_on: Option<String>,
    pub calls: AtomicUsize,
    pub inputs: Mutex<Vec<String>>,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            returned_dimension: dimension,
            fail_on: None,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    pub fn returning_dimension(mut self, dimension: usize) -> Self {
        self.returned_dimension = dimension;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().extend(texts.iter().cloned());
        if let Some(bad) = &self.fail_on {
            if texts.iter().any(|t| t == bad) {
                return Err(EmbeddingError::Status {
                    status: 500,
                    body: "upstream failure".to_string(),
                });
            }
        }
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0; self.returned_dimension];
                if let Some(first) = v.first_mut() {
                    *first = t.len() as f32;
                }
                v
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "mock-embedding"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Store that records every call and keeps upserted records in memory.
#[derive(Default)]
pub struct MockStore {
    pub calls: Mutex<Vec<&'static str>>,
    pub records: Mutex<Vec<VectorRecord>>,
    pub hits: Vec<SearchHit>,
    pub last_query: Mutex<Option<SearchQuery>>,
    pub fail_upsert: bool,
}

impl MockStore {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<VectorRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl VectorStore for MockStore {
    async fn create_tables(&self) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push("create_tables");
        Ok(())
    }

    async fn create_index(&self) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push("create_index");
        Ok(())
    }

    async fn drop_index(&self) -> Result<(), RepositoryError> {
        self.calls.lock().unwrap().push("drop_index");
        Ok(())
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<u64, RepositoryError> {
        self.calls.lock().unwrap().push("upsert");
        if self.fail_upsert {
            return Err(RepositoryError::Connection("connection reset".to_string()));
        }
        let mut stored = self.records.lock().unwrap();
        for record in records {
            stored.retain(|r| r.id != record.id);
            stored.push(record.clone());
        }
        Ok(records.len() as u64)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, RepositoryError> {
        self.calls.lock().unwrap().push("search");
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self.hits.iter().take(query.limit).cloned().collect())
    }

    async fn delete(&self, scope: &DeleteScope) -> Result<u64, RepositoryError> {
        self.calls.lock().unwrap().push("delete");
        let mut stored = self.records.lock().unwrap();
        let before = stored.len();
        match scope {
            DeleteScope::All => stored.clear(),
            DeleteScope::Ids(ids) => stored.retain(|r| !ids.contains(&r.id)),
            DeleteScope::Metadata(_) => {}
        }
        Ok((before - stored.len()) as u64)
    }
}

/// A complete row with every optional column populated.
pub fn product_row(id: &str, description: &str) -> ProductRow {
    ProductRow {
        product_id: Some(id.to_string()),
        product_name: Some(format!("Product {id}")),
        category: Some("CREDIT".to_string()),
        entity: Some("Acme Bank".to_string()),
        card_type: Some("VISA".to_string()),
        is_liability: Some("True".to_string()),
        is_investment: Some("False".to_string()),
        user_commission: Some("1.5".to_string()),
        company_commission: Some("3".to_string()),
        product_highlights: Some(r#"{"cashback":"5%"}"#.to_string()),
        tags: Some("travel,rewards".to_string()),
        description: Some(description.to_string()),
    }
}
