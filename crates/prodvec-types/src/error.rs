use thiserror::Error;

/// Errors raised while loading the source table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("malformed record at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("required column '{0}' is missing from the header")]
    MissingColumn(String),
}

/// Errors returned by an embedding provider.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider API key is not configured")]
    MissingApiKey,

    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("embedding provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// Errors from vector store operations (used by trait definitions in prodvec-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors surfaced by the ingest pipeline.
///
/// Row numbers are 1-based positions among the data rows (header excluded).
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("row {row}: required field '{field}' is missing or null")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: {source}")]
    Embedding {
        row: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("row {row}: embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("vector store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Errors surfaced by semantic search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("search limit must be at least 1")]
    InvalidLimit,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    Store(#[from] RepositoryError),
}
