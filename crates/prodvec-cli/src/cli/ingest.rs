//! `prodvec ingest`: run the pipeline with a progress bar and print a summary.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use prodvec_core::clock::SystemClock;
use prodvec_core::ingest::{IngestOptions, IngestPipeline};

use crate::state::{AppState, IngestStore};

pub async fn ingest(
    state: &AppState,
    input: Option<PathBuf>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let source = state.source(input)?;
    let embedder = state.embedder()?;
    let store = if dry_run {
        IngestStore::Detached
    } else {
        IngestStore::Connected(state.store().await?)
    };

    let source_path = source.path().display().to_string();
    let pipeline = IngestPipeline::new(source, embedder, store, SystemClock);

    let progress = if json || quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} {pos} rows ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Embedding");
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };

    let started = Instant::now();
    let result = pipeline
        .run(IngestOptions { dry_run }, |prepared| {
            progress.set_position(prepared as u64);
        })
        .await;
    progress.finish_and_clear();
    let report = result.with_context(|| format!("Ingest of {source_path} failed"))?;
    let elapsed = started.elapsed();

    if json {
        let summary = serde_json::json!({
            "source": source_path,
            "rows_read": report.rows_read,
            "records_upserted": report.records_upserted,
            "dry_run": dry_run,
            "table": state.config.vector_store.table_name,
            "elapsed_ms": elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    if dry_run {
        println!(
            "  {} Dry run: prepared {} records from {}",
            style("✓").green().bold(),
            style(report.rows_read).cyan(),
            style(&source_path).dim()
        );
    } else {
        println!(
            "  {} Ingested {} rows into {}",
            style("✓").green().bold(),
            style(report.rows_read).cyan(),
            style(&state.config.vector_store.table_name).cyan()
        );
        println!(
            "  {}  {}",
            style("Upserted:").bold(),
            report.records_upserted
        );
    }
    println!(
        "  {}  {:.1}s",
        style("Elapsed:").bold(),
        elapsed.as_secs_f64()
    );
    println!();

    Ok(())
}
