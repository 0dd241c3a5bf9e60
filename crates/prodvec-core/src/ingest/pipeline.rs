//! Ingest pipeline driver.
//!
//! Load the whole table, prepare every row in order, then ensure the table,
//! ensure the index, and upsert the batch. Nothing touches the store until
//! every record has been prepared, so a failure mid-table writes nothing.

use prodvec_types::error::IngestError;
use prodvec_types::record::{IngestReport, VectorRecord};
use prodvec_types::product::ProductRow;

use crate::clock::Clock;
use crate::embedder::Embedder;
use crate::source::RowSource;
use crate::store::VectorStore;

use super::preparer::RecordPreparer;

/// Options for a single pipeline run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Prepare records (including embeddings) but skip every store call.
    pub dry_run: bool,
}

/// Sequential source → records → store pipeline.
pub struct IngestPipeline<R, E, S, C> {
    source: R,
    embedder: E,
    store: S,
    clock: C,
}

impl<R, E, S, C> IngestPipeline<R, E, S, C>
where
    R: RowSource,
    E: Embedder,
    S: VectorStore,
    C: Clock,
{
    pub fn new(source: R, embedder: E, store: S, clock: C) -> Self {
        Self {
            source,
            embedder,
            store,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Prepare one record per row, in row order.
    ///
    /// `on_progress` is called with the count of records prepared so far.
    pub async fn prepare_all<F>(
        &self,
        rows: &[ProductRow],
        mut on_progress: F,
    ) -> Result<Vec<VectorRecord>, IngestError>
    where
        F: FnMut(usize),
    {
        let preparer = RecordPreparer::new(&self.embedder, &self.clock);
        let mut records = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let record = preparer.prepare(idx + 1, row).await?;
            tracing::debug!(row = idx + 1, id = %record.id, "prepared record");
            records.push(record);
            on_progress(records.len());
        }
        Ok(records)
    }

    /// Run the full pipeline.
    pub async fn run<F>(
        &self,
        options: IngestOptions,
        on_progress: F,
    ) -> Result<IngestReport, IngestError>
    where
        F: FnMut(usize),
    {
        let rows = self.source.load()?;
        tracing::info!(rows = rows.len(), "loaded source table");

        let records = self.prepare_all(&rows, on_progress).await?;
        tracing::info!(
            records = records.len(),
            model = self.embedder.model_name(),
            "prepared records"
        );

        if options.dry_run {
            tracing::info!("dry run, skipping vector store");
            return Ok(IngestReport {
                rows_read: rows.len(),
                records_upserted: 0,
            });
        }

        self.store.create_tables().await?;
        self.store.create_index().await?;
        let upserted = self.store.upsert(&records).await?;
        tracing::info!(upserted, "upserted records");

        Ok(IngestReport {
            rows_read: rows.len(),
            records_upserted: upserted,
        })
    }
}
