//! Semantic search over stored records.
//!
//! The query text is embedded with the same provider used at ingest time,
//! then the store returns the nearest records by cosine distance.

use prodvec_types::error::{EmbeddingError, SearchError};
use prodvec_types::product::{CellValue, TEXT_ONLY_FIELDS};
use prodvec_types::record::{MetadataFilter, SearchHit, SearchQuery};

use crate::embedder::Embedder;
use crate::store::VectorStore;

/// Embeds a query and forwards it to the store.
pub struct SearchService<E, S> {
    embedder: E,
    store: S,
}

impl<E: Embedder, S: VectorStore> SearchService<E, S> {
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    pub async fn search(
        &self,
        query_text: &str,
        limit: usize,
        filter: Option<MetadataFilter>,
    ) -> Result<Vec<SearchHit>, SearchError> {
        if query_text.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if limit == 0 {
            return Err(SearchError::InvalidLimit);
        }

        let embedding = self
            .embedder
            .embed(&[query_text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| EmbeddingError::Malformed("provider returned no vectors".to_string()))?;

        let query = SearchQuery {
            embedding,
            limit,
            filter,
        };
        let hits = self.store.search(&query).await?;
        tracing::debug!(hits = hits.len(), limit, "search complete");
        Ok(hits)
    }
}

/// Build a metadata filter from `key=value` pairs.
///
/// Values are typed the same way source cells are, so `is_liability=true`
/// matches a stored boolean. Identifier keys stay text. Null-like values
/// match the absent marker.
pub fn parse_metadata_filter<I, T>(pairs: I) -> Result<MetadataFilter, String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut filter = MetadataFilter::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid filter '{pair}': expected key=value"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("invalid filter '{pair}': empty key"));
        }
        let cell = if TEXT_ONLY_FIELDS.contains(&key) {
            CellValue::text_opt(Some(raw))
        } else {
            CellValue::parse(raw)
        };
        let value = match cell {
            Some(cell) => serde_json::to_value(cell).map_err(|e| e.to_string())?,
            None => serde_json::Value::Null,
        };
        filter.insert(key.to_string(), value);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockEmbedder, MockStore};
    use serde_json::json;
    use uuid::Uuid;

    fn hit(content: &str, distance: f64) -> SearchHit {
        SearchHit {
            id: Uuid::now_v7(),
            metadata: json!({ "category": "CREDIT" }),
            content: content.to_string(),
            distance,
        }
    }

    #[tokio::test]
    async fn test_search_embeds_query_and_applies_limit() {
        let store = MockStore {
            hits: vec![hit("Gold", 0.1), hit("Silver", 0.2), hit("Bronze", 0.3)],
            ..MockStore::default()
        };
        let service = SearchService::new(MockEmbedder::new(3), store);

        let hits = service.search("premium card", 2, None).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "Gold");

        let query = service.store.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.embedding.len(), 3);
        assert_eq!(query.embedding[0], "premium card".len() as f32);
        assert_eq!(query.limit, 2);
    }

    #[tokio::test]
    async fn test_search_forwards_filter() {
        let service = SearchService::new(MockEmbedder::new(3), MockStore::default());
        let filter = parse_metadata_filter(["category=CREDIT"]).unwrap();

        service.search("card", 5, Some(filter.clone())).await.unwrap();

        let query = service.store.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.filter, Some(filter));
    }

    #[tokio::test]
    async fn test_search_rejects_bad_input() {
        let service = SearchService::new(MockEmbedder::new(3), MockStore::default());

        assert!(matches!(
            service.search("   ", 5, None).await,
            Err(SearchError::EmptyQuery)
        ));
        assert!(matches!(
            service.search("card", 0, None).await,
            Err(SearchError::InvalidLimit)
        ));
        assert!(service.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_surfaces_embedding_failure() {
        let service = SearchService::new(
            MockEmbedder::new(3).failing_on("card"),
            MockStore::default(),
        );
        let err = service.search("card", 5, None).await.unwrap_err();
        assert!(matches!(err, SearchError::Embedding(_)));
    }

    #[test]
    fn test_parse_metadata_filter_types_values() {
        let filter = parse_metadata_filter([
            "category=CREDIT",
            "is_liability=true",
            "product_id=042",
            "user_commission=42",
            "card_type=NaN",
        ])
        .unwrap();
        assert_eq!(filter["category"], json!("CREDIT"));
        assert_eq!(filter["is_liability"], json!(true));
        assert_eq!(filter["product_id"], json!("042"));
        assert_eq!(filter["user_commission"], json!(42));
        assert!(filter["card_type"].is_null());
    }

    #[test]
    fn test_parse_metadata_filter_rejects_malformed_pairs() {
        assert!(parse_metadata_filter(["category"]).is_err());
        assert!(parse_metadata_filter(["=CREDIT"]).is_err());
    }
}
