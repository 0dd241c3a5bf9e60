//! Embedding provider clients.

pub mod openai;

pub use openai::OpenAiEmbedder;
