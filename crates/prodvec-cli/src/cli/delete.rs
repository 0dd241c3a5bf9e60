//! `prodvec delete (--all | --id UUID... | --filter KEY=VALUE...)`.

use anyhow::{Result, anyhow};
use console::style;

use prodvec_core::search::parse_metadata_filter;
use prodvec_core::store::VectorStore;
use prodvec_types::record::DeleteScope;

use crate::cli::DeleteArgs;
use crate::state::AppState;

pub async fn delete(state: &AppState, args: DeleteArgs, json: bool) -> Result<()> {
    let scope = scope_from_args(args)?;
    let store = state.store().await?;
    let deleted = store.delete(&scope).await?;

    if json {
        let result = serde_json::json!({
            "table": state.config.vector_store.table_name,
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Deleted {} records from '{}'",
            style("ok").green(),
            style(deleted).cyan(),
            style(&state.config.vector_store.table_name).cyan()
        );
        println!();
    }
    Ok(())
}

fn scope_from_args(args: DeleteArgs) -> Result<DeleteScope> {
    if args.all {
        return Ok(DeleteScope::All);
    }
    if !args.ids.is_empty() {
        return Ok(DeleteScope::Ids(args.ids));
    }
    if !args.filters.is_empty() {
        let filter = parse_metadata_filter(&args.filters).map_err(|e| anyhow!(e))?;
        return Ok(DeleteScope::Metadata(filter));
    }
    Err(anyhow!("nothing to delete: pass --all, --id or --filter"))
}
