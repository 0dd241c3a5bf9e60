//! Batch ingest: row preparation and the pipeline driver.

pub mod pipeline;
pub mod preparer;

pub use pipeline::{IngestOptions, IngestPipeline};
pub use preparer::RecordPreparer;
