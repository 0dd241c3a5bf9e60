//! `prodvec index create|drop`.

use anyhow::Result;
use console::style;

use prodvec_core::store::VectorStore;
use prodvec_types::config::IndexConfig;

use crate::cli::IndexCommand;
use crate::state::AppState;

pub async fn handle_index_command(cmd: IndexCommand, state: &AppState, json: bool) -> Result<()> {
    let store = state.store().await?;
    let index_name = store.table().embedding_index_name();

    let action = match cmd {
        IndexCommand::Create => {
            store.create_tables().await?;
            store.create_index().await?;
            "created"
        }
        IndexCommand::Drop => {
            store.drop_index().await?;
            "dropped"
        }
    };

    if json {
        let result = serde_json::json!({
            "index": index_name,
            "kind": index_kind(&state.config.vector_store.index),
            "action": action,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Index '{}' {} ({})",
            style("ok").green(),
            style(&index_name).cyan(),
            action,
            index_kind(&state.config.vector_store.index)
        );
        println!();
    }
    Ok(())
}

fn index_kind(index: &IndexConfig) -> &'static str {
    match index {
        IndexConfig::DiskAnn { .. } => "diskann",
        IndexConfig::Hnsw { .. } => "hnsw",
        IndexConfig::IvfFlat { .. } => "ivfflat",
    }
}
