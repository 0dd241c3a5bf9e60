//! CSV row source.
//!
//! Reads the whole product file into memory. The header must name every
//! product column; extra columns are ignored. Empty cells deserialize as
//! absent.

use std::io::Read;
use std::path::{Path, PathBuf};

use prodvec_core::source::RowSource;
use prodvec_types::error::SourceError;
use prodvec_types::product::{ProductRow, REQUIRED_COLUMNS};

/// File-backed [`RowSource`].
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    /// Create a source for `path`. The delimiter must be a single ASCII character.
    pub fn new(path: impl Into<PathBuf>, delimiter: char) -> Result<Self, SourceError> {
        let path = path.into();
        let delimiter = u8::try_from(delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| SourceError::Csv {
                line: 0,
                message: format!("delimiter {delimiter:?} is not a single ASCII character"),
            })?;
        Ok(Self { path, delimiter })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RowSource for CsvSource {
    fn load(&self) -> Result<Vec<ProductRow>, SourceError> {
        let file = std::fs::File::open(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let rows = parse_rows(std::io::BufReader::new(file), self.delimiter)?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read source file");
        Ok(rows)
    }
}

/// Parse product rows from any reader.
pub fn parse_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<ProductRow>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(SourceError::MissingColumn((*column).to_string()));
        }
    }

    csv_reader
        .deserialize::<ProductRow>()
        .map(|result| result.map_err(csv_error))
        .collect()
}

fn csv_error(err: csv::Error) -> SourceError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    SourceError::Csv {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "PRODUCT_ID,PRODUCT_NAME,PRODUCT_CATEGORY,ENTITY,CARD_TYPE,IS_LIABILITY,IS_INVESTMENT,USER_COMMISSION,COMPANY_COMMISSION,PRODUCT_HIGHLIGHTS_JSON,TAGS,PRODUCT_DESCRIPTION";

    #[test]
    fn parse_full_rows() {
        let data = format!(
            "{HEADER}\n\
             1,Gold Card,CREDIT,Acme Bank,,True,False,1.5,3,\"{{\"\"cashback\"\": \"\"5%\"\"}}\",travel,Gold Credit Card\n\
             2,Saver,DEPOSIT,Acme Bank,NaN,False,True,,,,,\"High-yield, no fees\"\n"
        );
        let rows = parse_rows(data.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].product_id.as_deref(), Some("1"));
        assert_eq!(rows[0].category.as_deref(), Some("CREDIT"));
        assert_eq!(rows[0].card_type, None);
        assert_eq!(
            rows[0].product_highlights.as_deref(),
            Some(r#"{"cashback": "5%"}"#)
        );
        assert_eq!(rows[0].description.as_deref(), Some("Gold Credit Card"));

        assert_eq!(rows[1].card_type.as_deref(), Some("NaN"));
        assert_eq!(rows[1].user_commission, None);
        assert_eq!(rows[1].description.as_deref(), Some("High-yield, no fees"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = format!("EXTRA,{HEADER}\nignored,7,Seven,,,,,,,,,,A card\n");
        let rows = parse_rows(data.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_id.as_deref(), Some("7"));
        assert_eq!(rows[0].tags, None);
        assert_eq!(rows[0].description.as_deref(), Some("A card"));
    }

    #[test]
    fn every_product_column_is_required() {
        for column in REQUIRED_COLUMNS {
            let header: Vec<&str> = REQUIRED_COLUMNS.iter().copied().filter(|c| c != column).collect();
            let data = format!("{}\n", header.join(","));
            let err = parse_rows(data.as_bytes(), b',').unwrap_err();
            assert!(
                matches!(&err, SourceError::MissingColumn(c) if c == column),
                "expected {column} to be reported, got {err:?}"
            );
        }
    }

    #[test]
    fn misspelled_column_is_rejected() {
        let data = format!("{}\n", HEADER.replace("PRODUCT_HIGHLIGHTS_JSON", "PRODUCT_HIGHLIGHTS"));
        let err = parse_rows(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn(c) if c == "PRODUCT_HIGHLIGHTS_JSON"));
    }

    #[test]
    fn ragged_row_reports_line() {
        let data = format!("{HEADER}\n1,Gold,,,,,,,,,,Card\n2,Silver\n");
        let err = parse_rows(data.as_bytes(), b',').unwrap_err();
        match err {
            SourceError::Csv { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected Csv error, got {:?}", other),
        }
    }

    #[test]
    fn tab_delimited() {
        let data = format!(
            "{}\n1\tGold\t\t\t\t\t\t\t\t\t\tA, card\n",
            HEADER.replace(',', "\t")
        );
        let rows = parse_rows(data.as_bytes(), b'\t').unwrap();
        assert_eq!(rows[0].description.as_deref(), Some("A, card"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.csv");
        std::fs::write(&path, format!("{HEADER}\n1,Gold,,,,,,,,,,Card\n")).unwrap();

        let source = CsvSource::new(&path, ',').unwrap();
        let rows = source.load().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = CsvSource::new("/nonexistent/products.csv", ',').unwrap();
        assert!(matches!(source.load(), Err(SourceError::Io { .. })));
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        assert!(CsvSource::new("products.csv", '§').is_err());
    }
}
