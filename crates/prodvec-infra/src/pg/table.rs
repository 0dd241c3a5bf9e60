//! Postgres identifiers for the vector table and its indexes.

use prodvec_types::error::RepositoryError;

/// Fully-qualified Postgres table name (schema + table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    schema: String,
    table: String,
}

impl TableName {
    /// Builds a new table identifier.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Result<Self, RepositoryError> {
        let schema = schema.into();
        let table = table.into();
        if schema.trim().is_empty() {
            return Err(RepositoryError::InvalidInput("schema name is required".to_string()));
        }
        if table.trim().is_empty() {
            return Err(RepositoryError::InvalidInput("table name is required".to_string()));
        }
        Ok(Self { schema, table })
    }

    /// Fully-qualified table reference with quoted identifiers.
    pub fn qualified(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Unqualified name of the GIN index over `metadata`.
    pub fn metadata_index_name(&self) -> String {
        self.index_name("meta_idx")
    }

    /// Unqualified name of the similarity index over `embedding`.
    pub fn embedding_index_name(&self) -> String {
        self.index_name("embedding_idx")
    }

    /// Schema-qualified, quoted similarity index name (for `DROP INDEX`).
    pub fn qualified_embedding_index(&self) -> String {
        format!(
            "{}.{}",
            quote_ident(&self.schema),
            quote_ident(&self.embedding_index_name())
        )
    }

    fn index_name(&self, suffix: &str) -> String {
        format!(
            "{}_{}_{}",
            sanitize_ident(&self.schema),
            sanitize_ident(&self.table),
            suffix
        )
    }
}

/// Quotes Postgres identifiers, escaping embedded quotes.
pub fn quote_ident(input: &str) -> String {
    format!("\"{}\"", input.replace('"', "\"\""))
}

fn sanitize_ident(input: &str) -> String {
    input
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '_' })
        .collect()
}
