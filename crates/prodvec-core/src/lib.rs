//! Record preparation, the ingest pipeline, and the port traits for prodvec.
//!
//! This crate defines the "ports" (source, embedder, store, clock) that the
//! infrastructure layer implements. It depends only on `prodvec-types` --
//! never on `prodvec-infra` or any database/HTTP crate.

pub mod clock;
pub mod embedder;
pub mod ident;
pub mod ingest;
pub mod search;
pub mod source;
pub mod store;

#[cfg(test)]
mod test_support;
