//! Row-to-record transformation.
//!
//! Each source row becomes exactly one [`VectorRecord`]: a fresh
//! time-ordered id, normalized metadata, the description copied verbatim,
//! and one embedding call on that description.

use prodvec_types::error::{EmbeddingError, IngestError};
use prodvec_types::product::{CellValue, ProductMetadata, ProductRow, is_null_like};
use prodvec_types::record::VectorRecord;

use crate::clock::Clock;
use crate::embedder::Embedder;
use crate::ident::time_ordered_id;

/// Turns rows into records using an embedder and a clock.
///
/// Not idempotent: every call mints a new id and `created_at`.
pub struct RecordPreparer<'a, E, C> {
    embedder: &'a E,
    clock: &'a C,
}

impl<'a, E: Embedder, C: Clock> RecordPreparer<'a, E, C> {
    pub fn new(embedder: &'a E, clock: &'a C) -> Self {
        Self { embedder, clock }
    }

    /// Prepare the record for data row `row_number` (1-based).
    pub async fn prepare(
        &self,
        row_number: usize,
        row: &ProductRow,
    ) -> Result<VectorRecord, IngestError> {
        let content = row
            .description
            .as_deref()
            .filter(|d| !is_null_like(d))
            .ok_or(IngestError::MissingField {
                row: row_number,
                field: "description",
            })?;
        let product_id = required(row_number, "product_id", row.product_id.as_deref())?;
        let product_name = required(row_number, "product_name", row.product_name.as_deref())?;

        let embedding = self.embed(row_number, content).await?;
        let id = time_ordered_id(self.clock.now());

        let metadata = ProductMetadata {
            product_id,
            product_name,
            category: CellValue::parse_opt(row.category.as_deref()),
            entity: CellValue::parse_opt(row.entity.as_deref()),
            card_type: CellValue::parse_opt(row.card_type.as_deref()),
            is_liability: CellValue::parse_opt(row.is_liability.as_deref()),
            is_investment: CellValue::parse_opt(row.is_investment.as_deref()),
            user_commission: CellValue::parse_opt(row.user_commission.as_deref()),
            company_commission: CellValue::parse_opt(row.company_commission.as_deref()),
            product_highlights: CellValue::parse_opt(row.product_highlights.as_deref()),
            tags: CellValue::parse_opt(row.tags.as_deref()),
            created_at: self.clock.now(),
        };

        Ok(VectorRecord {
            id,
            metadata,
            content: content.to_string(),
            embedding,
        })
    }

    async fn embed(&self, row: usize, content: &str) -> Result<Vec<f32>, IngestError> {
        let mut vectors = self
            .embedder
            .embed(&[content.to_string()])
            .await
            .map_err(|source| IngestError::Embedding { row, source })?;

        let embedding = vectors.pop().ok_or_else(|| IngestError::Embedding {
            row,
            source: EmbeddingError::Malformed("provider returned no vectors".to_string()),
        })?;

        let expected = self.embedder.dimension();
        if embedding.len() != expected {
            return Err(IngestError::DimensionMismatch {
                row,
                expected,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}

fn required(
    row: usize,
    field: &'static str,
    raw: Option<&str>,
) -> Result<CellValue, IngestError> {
    CellValue::text_opt(raw).ok_or(IngestError::MissingField { row, field })
}
