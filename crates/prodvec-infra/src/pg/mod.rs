//! Postgres + pgvector storage.

pub mod pool;
pub mod sql;
pub mod store;
pub mod table;

pub use pool::connect;
pub use store::PgVectorStore;
pub use table::TableName;
