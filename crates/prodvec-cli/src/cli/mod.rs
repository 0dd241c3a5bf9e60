//! CLI command definitions for the `prodvec` binary.
//!
//! Uses clap derive macros. Each subcommand has a handler module.

pub mod delete;
pub mod index;
pub mod ingest;
pub mod search;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

/// Load a product table into a pgvector store and search it.
#[derive(Parser)]
#[command(name = "prodvec", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed every row of the product table and upsert it into the store.
    Ingest {
        /// Product table to read (overrides [source].path).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Prepare and embed records without touching the database.
        #[arg(long)]
        dry_run: bool,
    },

    /// Semantic search over ingested products.
    Search {
        /// Free-text query.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Metadata filter, repeatable (e.g. --filter category=CREDIT).
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },

    /// Manage the similarity index.
    Index {
        #[command(subcommand)]
        action: IndexCommand,
    },

    /// Delete stored records.
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum IndexCommand {
    /// Create the table (if needed) and the configured similarity index.
    Create,
    /// Drop the similarity index.
    Drop,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct DeleteArgs {
    /// Delete every record.
    #[arg(long)]
    pub all: bool,

    /// Delete records by id (repeatable).
    #[arg(long = "id", value_name = "UUID")]
    pub ids: Vec<Uuid>,

    /// Delete records whose metadata contains KEY=VALUE (repeatable).
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,
}
