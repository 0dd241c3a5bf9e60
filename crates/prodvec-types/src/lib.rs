//! Shared domain types for prodvec.
//!
//! Contains the product row read from the source file, the vector record
//! handed to the store, search types, configuration, and the error enums
//! shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod product;
pub mod record;
