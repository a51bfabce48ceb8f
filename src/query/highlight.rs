//! Fragment highlighting configuration

use serde_json::{json, Map, Value};

use crate::mapping::PropertyFieldMapper;

/// Marker inserted before a highlighted fragment
pub const PRE_TAG: &str = "@@_HIGHLIGHT_@@";
/// Marker inserted after a highlighted fragment
pub const POST_TAG: &str = "@@_END_HIGHLIGHT_@@";

/// Highlighting strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlighterType {
    /// Unified highlighter, supported by every field
    #[default]
    Unified,
    /// Plain highlighter, re-analyzes the stored text
    Plain,
    /// Fast-vector highlighter, requires term vectors on the field
    FastVector,
}

impl HighlighterType {
    fn as_str(&self) -> &'static str {
        match self {
            HighlighterType::Unified => "unified",
            HighlighterType::Plain => "plain",
            HighlighterType::FastVector => "fvh",
        }
    }
}

/// Highlighting configuration for an ordered list of properties
#[derive(Clone, Debug)]
pub struct FieldHighlighter {
    fields: Vec<PropertyFieldMapper>,
    fragment_size: u32,
    fragment_limit: u32,
    highlighter_type: HighlighterType,
}

impl FieldHighlighter {
    /// Create a new highlighter over the given properties
    pub fn new(fields: Vec<PropertyFieldMapper>) -> Self {
        Self {
            fields,
            fragment_size: 250,
            fragment_limit: 1,
            highlighter_type: HighlighterType::Unified,
        }
    }

    /// Set the maximum fragment size in characters
    pub fn with_fragment_size(mut self, size: u32) -> Self {
        self.fragment_size = size;
        self
    }

    /// Set the maximum number of fragments per field
    pub fn with_fragment_limit(mut self, limit: u32) -> Self {
        self.fragment_limit = limit;
        self
    }

    /// Request a highlighting strategy
    ///
    /// Fast-vector highlighting falls back to unified on fields whose datatype
    /// does not store term vectors.
    pub fn with_type(mut self, highlighter_type: HighlighterType) -> Self {
        self.highlighter_type = highlighter_type;
        self
    }

    /// Compile the per-field highlight settings, keyed by field name
    pub fn compile(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for mapper in &self.fields {
            let effective = match self.highlighter_type {
                HighlighterType::FastVector if !mapper.supports_fast_vector_highlighter() => {
                    HighlighterType::Unified
                }
                other => other,
            };
            let field = mapper
                .search_field()
                .unwrap_or_else(|| mapper.field().to_string());
            fields.insert(
                field,
                json!({
                    "type": effective.as_str(),
                    "fragment_size": self.fragment_size,
                    "number_of_fragments": self.fragment_limit
                }),
            );
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    #[test]
    fn test_fast_vector_falls_back_to_unified() {
        let store = MemoryPropertyStore::new()
            .with_property("Summary", 6, DataType::Text)
            .with_property("Author", 3, DataType::Page);
        let summary = PropertyFieldMapper::resolve(&store, "Summary").unwrap();
        let author = PropertyFieldMapper::resolve(&store, "Author").unwrap();

        let highlighter =
            FieldHighlighter::new(vec![summary, author]).with_type(HighlighterType::FastVector);
        let fields = highlighter.compile();
        assert_eq!(fields["P:6.txtField.search"]["type"], json!("fvh"));
        assert_eq!(fields["P:3.wpgField.search"]["type"], json!("unified"));
    }

    #[test]
    fn test_fragment_settings() {
        let store = MemoryPropertyStore::new().with_property("Summary", 6, DataType::Text);
        let summary = PropertyFieldMapper::resolve(&store, "Summary").unwrap();
        let fields = FieldHighlighter::new(vec![summary])
            .with_fragment_size(120)
            .with_fragment_limit(3)
            .compile();
        let settings = &fields["P:6.txtField.search"];
        assert_eq!(settings["fragment_size"], json!(120));
        assert_eq!(settings["number_of_fragments"], json!(3));
    }
}
