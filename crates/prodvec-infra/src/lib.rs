//! Infrastructure layer for prodvec.
//!
//! Contains implementations of the port traits defined in `prodvec-core`:
//! the CSV row source, the OpenAI-compatible embeddings client, and the
//! Postgres + pgvector store. Also loads `config.toml` and environment
//! overrides.

pub mod config;
pub mod embedding;
pub mod pg;
pub mod source;
