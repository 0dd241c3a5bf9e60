//! prodvec CLI entry point.
//!
//! Binary name: `prodvec`
//!
//! Parses CLI arguments, resolves configuration, then dispatches to the
//! command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,prodvec_core=debug,prodvec_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "prodvec", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.config.as_deref()).await;
    tracing::debug!(config = %state.config_path.display(), "configuration resolved");

    match cli.command {
        Commands::Ingest { input, dry_run } => {
            cli::ingest::ingest(&state, input, dry_run, cli.json, cli.quiet).await?;
        }

        Commands::Search {
            query,
            limit,
            filters,
        } => {
            cli::search::search(&state, &query, limit, &filters, cli.json).await?;
        }

        Commands::Index { action } => {
            cli::index::handle_index_command(action, &state, cli.json).await?;
        }

        Commands::Delete(args) => {
            cli::delete::delete(&state, args, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
