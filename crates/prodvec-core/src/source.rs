//! Row source trait.
//!
//! A source loads the whole product table into memory. The CSV
//! implementation lives in prodvec-infra.

use prodvec_types::error::SourceError;
use prodvec_types::product::ProductRow;

/// Trait for loading the full source table in file order.
pub trait RowSource: Send + Sync {
    fn load(&self) -> Result<Vec<ProductRow>, SourceError>;
}

impl RowSource for Vec<ProductRow> {
    fn load(&self) -> Result<Vec<ProductRow>, SourceError> {
        Ok(self.clone())
    }
}
