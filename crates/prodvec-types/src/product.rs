//! Product catalogue types.
//!
//! `ProductRow` mirrors one line of the source CSV. `ProductMetadata` is the
//! normalized document stored next to each embedding, with null-like cells
//! replaced by the absent marker (`None`, serialized as JSON `null`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Cell spellings treated as "no value", matched after trimming whitespace.
pub const NULL_LIKE_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Header columns that must all be present in the source file. Cells may
/// still be empty or null-like.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "PRODUCT_ID",
    "PRODUCT_NAME",
    "PRODUCT_CATEGORY",
    "ENTITY",
    "CARD_TYPE",
    "IS_LIABILITY",
    "IS_INVESTMENT",
    "USER_COMMISSION",
    "COMPANY_COMMISSION",
    "PRODUCT_HIGHLIGHTS_JSON",
    "TAGS",
    "PRODUCT_DESCRIPTION",
];

/// Metadata keys whose values are identifiers and always stay text.
pub const TEXT_ONLY_FIELDS: &[&str] = &["product_id", "product_name"];

/// Returns true when a raw cell should be read as "no value".
pub fn is_null_like(raw: &str) -> bool {
    NULL_LIKE_VALUES.contains(&raw.trim())
}

/// One row of the product source file.
///
/// Every field is optional at the parsing level; required fields are
/// enforced when the row is turned into a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "PRODUCT_ID")]
    pub product_id: Option<String>,
    #[serde(rename = "PRODUCT_NAME")]
    pub product_name: Option<String>,
    #[serde(rename = "PRODUCT_CATEGORY")]
    pub category: Option<String>,
    #[serde(rename = "ENTITY")]
    pub entity: Option<String>,
    #[serde(rename = "CARD_TYPE")]
    pub card_type: Option<String>,
    #[serde(rename = "IS_LIABILITY")]
    pub is_liability: Option<String>,
    #[serde(rename = "IS_INVESTMENT")]
    pub is_investment: Option<String>,
    #[serde(rename = "USER_COMMISSION")]
    pub user_commission: Option<String>,
    #[serde(rename = "COMPANY_COMMISSION")]
    pub company_commission: Option<String>,
    #[serde(rename = "PRODUCT_HIGHLIGHTS_JSON")]
    pub product_highlights: Option<String>,
    #[serde(rename = "TAGS")]
    pub tags: Option<String>,
    #[serde(rename = "PRODUCT_DESCRIPTION")]
    pub description: Option<String>,
}

/// A typed metadata value parsed from a non-null cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Parse a raw cell. Returns `None` for null-like cells.
    ///
    /// Booleans and numbers are recognised on the trimmed text, but a number
    /// is only typed when formatting it back yields the same text. `007`,
    /// `1.50` and integers beyond `i64` stay text. Anything else is kept
    /// exactly as written.
    pub fn parse(raw: &str) -> Option<Self> {
        if is_null_like(raw) {
            return None;
        }
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Some(CellValue::Bool(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Some(CellValue::Bool(false));
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            if n.to_string() == trimmed {
                return Some(CellValue::Integer(n));
            }
        } else if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() && f.to_string() == trimmed {
                return Some(CellValue::Float(f));
            }
        }
        Some(CellValue::Text(raw.to_string()))
    }

    /// Parse an optional cell; an absent cell stays absent.
    pub fn parse_opt(raw: Option<&str>) -> Option<Self> {
        raw.and_then(Self::parse)
    }

    /// Like [`CellValue::parse_opt`], but a non-null cell is never typed.
    pub fn text_opt(raw: Option<&str>) -> Option<Self> {
        raw.filter(|r| !is_null_like(r))
            .map(|r| CellValue::Text(r.to_string()))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

/// Metadata document stored alongside each product embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub product_id: CellValue,
    pub product_name: CellValue,
    pub category: Option<CellValue>,
    pub entity: Option<CellValue>,
    pub card_type: Option<CellValue>,
    pub is_liability: Option<CellValue>,
    pub is_investment: Option<CellValue>,
    pub user_commission: Option<CellValue>,
    pub company_commission: Option<CellValue>,
    pub product_highlights: Option<CellValue>,
    pub tags: Option<CellValue>,
    /// When the record was prepared. Read separately from the id's timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_like_cells() {
        for raw in ["", "   ", "NaN", "nan", "NULL", "null", "None", "N/A", "<NA>", " NA "] {
            assert!(is_null_like(raw), "{raw:?} should be null-like");
            assert_eq!(CellValue::parse(raw), None);
        }
        assert!(!is_null_like("0"));
        assert!(!is_null_like("Nan bread"));
    }

    #[test]
    fn test_cell_typing() {
        assert_eq!(CellValue::parse("TRUE"), Some(CellValue::Bool(true)));
        assert_eq!(CellValue::parse("False"), Some(CellValue::Bool(false)));
        assert_eq!(CellValue::parse("42"), Some(CellValue::Integer(42)));
        assert_eq!(CellValue::parse("2.5"), Some(CellValue::Float(2.5)));
        assert_eq!(CellValue::parse("CREDIT"), Some(CellValue::Text("CREDIT".into())));
        assert_eq!(CellValue::parse("inf"), Some(CellValue::Text("inf".into())));
        assert_eq!(CellValue::parse("-3"), Some(CellValue::Integer(-3)));
    }

    #[test]
    fn test_lossy_numbers_stay_text() {
        for raw in ["007", "12345678901234567890", "1.50", "1.0", "+5", "1e3"] {
            assert_eq!(
                CellValue::parse(raw),
                Some(CellValue::Text(raw.to_string())),
                "{raw:?} should pass through unchanged"
            );
        }
    }

    #[test]
    fn test_text_opt_never_types() {
        assert_eq!(CellValue::text_opt(Some("007")), Some(CellValue::Text("007".into())));
        assert_eq!(CellValue::text_opt(Some("true")), Some(CellValue::Text("true".into())));
        assert_eq!(CellValue::text_opt(Some("NaN")), None);
        assert_eq!(CellValue::text_opt(None), None);
    }

    #[test]
    fn test_text_cells_are_not_altered() {
        let raw = r#" {"cashback": "5%"} "#;
        assert_eq!(CellValue::parse(raw), Some(CellValue::Text(raw.to_string())));
    }

    #[test]
    fn test_metadata_serializes_absent_as_null() {
        let meta = ProductMetadata {
            product_id: CellValue::Text("007".into()),
            product_name: "Gold".into(),
            category: Some("CREDIT".into()),
            entity: None,
            card_type: None,
            is_liability: Some(CellValue::Bool(true)),
            is_investment: None,
            user_commission: Some(CellValue::Float(1.5)),
            company_commission: None,
            product_highlights: None,
            tags: None,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["product_id"], "007");
        assert_eq!(json["category"], "CREDIT");
        assert!(json["card_type"].is_null());
        assert!(json.as_object().unwrap().contains_key("card_type"));
        assert_eq!(json["is_liability"], true);
        assert_eq!(json["created_at"], "2024-01-01T12:00:00Z");

        let back: ProductMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }
}
