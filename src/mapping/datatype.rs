//! Property datatype categories
//!
//! Determines which index subfields exist for a property's backing field and
//! which highlighting strategies the field supports.

use serde::{Deserialize, Serialize};

/// Datatype category of a property as stored in the index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Analyzed full-text field (`txtField`)
    Text,
    /// Page reference field (`wpgField`)
    Page,
    /// Numeric field (`numField`)
    Number,
    /// Date field, stored as a Julian day number (`datField`)
    Date,
    /// Boolean field (`booField`)
    Boolean,
    /// Geographic coordinate field (`geoField`)
    Geo,
    /// URI field (`uriField`)
    Uri,
}

impl DataType {
    /// Index field suffix for this datatype
    pub fn field_suffix(&self) -> &'static str {
        match self {
            DataType::Text => "txtField",
            DataType::Page => "wpgField",
            DataType::Number => "numField",
            DataType::Date => "datField",
            DataType::Boolean => "booField",
            DataType::Geo => "geoField",
            DataType::Uri => "uriField",
        }
    }

    /// Whether the field carries an exact-match `.keyword` subfield
    pub fn has_keyword_subfield(&self) -> bool {
        matches!(self, DataType::Text | DataType::Page | DataType::Uri)
    }

    /// Whether the field carries an analyzed `.search` subfield
    pub fn has_search_subfield(&self) -> bool {
        matches!(self, DataType::Text | DataType::Page)
    }

    /// Whether the field stores term vectors and supports fast-vector highlighting
    pub fn supports_fast_vector_highlighter(&self) -> bool {
        matches!(self, DataType::Text)
    }

    /// Parse a datatype from its store identifier (e.g. `_txt`, `_wpg`)
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        match type_id {
            "_txt" | "_cod" => Some(DataType::Text),
            "_wpg" => Some(DataType::Page),
            "_num" | "_qty" | "_tem" => Some(DataType::Number),
            "_dat" => Some(DataType::Date),
            "_boo" => Some(DataType::Boolean),
            "_geo" => Some(DataType::Geo),
            "_uri" | "_ema" | "_tel" => Some(DataType::Uri),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_suffixes() {
        assert_eq!(DataType::Text.field_suffix(), "txtField");
        assert_eq!(DataType::Page.field_suffix(), "wpgField");
        assert_eq!(DataType::Number.field_suffix(), "numField");
        assert_eq!(DataType::Date.field_suffix(), "datField");
    }

    #[test]
    fn test_keyword_availability() {
        assert!(DataType::Text.has_keyword_subfield());
        assert!(DataType::Page.has_keyword_subfield());
        assert!(!DataType::Number.has_keyword_subfield());
        assert!(!DataType::Date.has_keyword_subfield());
    }

    #[test]
    fn test_fast_vector_highlighting_is_text_only() {
        assert!(DataType::Text.supports_fast_vector_highlighter());
        assert!(!DataType::Page.supports_fast_vector_highlighter());
        assert!(!DataType::Uri.supports_fast_vector_highlighter());
    }

    #[test]
    fn test_type_id_parsing() {
        assert_eq!(DataType::from_type_id("_txt"), Some(DataType::Text));
        assert_eq!(DataType::from_type_id("_wpg"), Some(DataType::Page));
        assert_eq!(DataType::from_type_id("_xyz"), None);
    }
}
