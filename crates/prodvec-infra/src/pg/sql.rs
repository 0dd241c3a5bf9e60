//! SQL text for the vector table.
//!
//! Identifiers are interpolated (quoted); every value is a bind parameter.

use prodvec_types::config::IndexConfig;

use super::table::{TableName, quote_ident};

/// Extensions that must exist before the table or index can be created.
pub fn required_extensions(index: &IndexConfig) -> Vec<&'static str> {
    match index {
        IndexConfig::DiskAnn { .. } => vec!["CREATE EXTENSION IF NOT EXISTS vectorscale CASCADE"],
        IndexConfig::Hnsw { .. } | IndexConfig::IvfFlat { .. } => Vec::new(),
    }
}

pub const CREATE_VECTOR_EXTENSION: &str = "CREATE EXTENSION IF NOT EXISTS vector";

pub fn create_table(table: &TableName, dimensions: usize) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY,
            metadata JSONB,
            contents TEXT,
            embedding VECTOR({dimensions})
        )",
        table.qualified()
    )
}

pub fn create_metadata_index(table: &TableName) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} USING GIN (metadata jsonb_path_ops)",
        quote_ident(&table.metadata_index_name()),
        table.qualified()
    )
}

/// Similarity index over `embedding`, using cosine distance.
pub fn create_embedding_index(table: &TableName, index: &IndexConfig) -> String {
    let (method, params) = match index {
        IndexConfig::DiskAnn {
            num_neighbors,
            search_list_size,
            max_alpha,
        } => (
            "diskann",
            with_params([
                ("num_neighbors", num_neighbors.map(|v| v.to_string())),
                ("search_list_size", search_list_size.map(|v| v.to_string())),
                ("max_alpha", max_alpha.map(|v| v.to_string())),
            ]),
        ),
        IndexConfig::Hnsw { m, ef_construction } => (
            "hnsw",
            with_params([
                ("m", m.map(|v| v.to_string())),
                ("ef_construction", ef_construction.map(|v| v.to_string())),
            ]),
        ),
        IndexConfig::IvfFlat { lists } => {
            ("ivfflat", with_params([("lists", lists.map(|v| v.to_string()))]))
        }
    };
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} USING {method} (embedding vector_cosine_ops){params}",
        quote_ident(&table.embedding_index_name()),
        table.qualified()
    )
}

pub fn drop_embedding_index(table: &TableName) -> String {
    format!("DROP INDEX IF EXISTS {}", table.qualified_embedding_index())
}

pub fn upsert(table: &TableName) -> String {
    format!(
        "INSERT INTO {} (id, metadata, contents, embedding) \
            VALUES ($1, $2, $3, $4) \
            ON CONFLICT (id) DO UPDATE SET \
                metadata = EXCLUDED.metadata, \
                contents = EXCLUDED.contents, \
                embedding = EXCLUDED.embedding",
        table.qualified()
    )
}

/// `$1` is the query vector; `$2` the JSONB filter when `filtered`; the
/// last parameter is the limit.
pub fn search(table: &TableName, filtered: bool) -> String {
    let (filter, limit_param) = if filtered {
        (" WHERE metadata @> $2::jsonb", "$3")
    } else {
        ("", "$2")
    };
    format!(
        "SELECT id, metadata, contents, embedding <=> $1 AS distance \
            FROM {}{filter} \
            ORDER BY distance \
            LIMIT {limit_param}",
        table.qualified()
    )
}

pub fn delete_all(table: &TableName) -> String {
    format!("DELETE FROM {}", table.qualified())
}

pub fn delete_by_ids(table: &TableName) -> String {
    format!("DELETE FROM {} WHERE id = ANY($1)", table.qualified())
}

pub fn delete_by_metadata(table: &TableName) -> String {
    format!("DELETE FROM {} WHERE metadata @> $1::jsonb", table.qualified())
}

fn with_params<const N: usize>(params: [(&str, Option<String>); N]) -> String {
    let set: Vec<String> = params
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name} = {v}")))
        .collect();
    if set.is_empty() {
        String::new()
    } else {
        format!(" WITH ({})", set.join(", "))
    }
}
