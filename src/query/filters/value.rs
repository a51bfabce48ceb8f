//! Value filter - matches documents where a property equals a literal

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Filter matching documents whose property equals the given literal
///
/// Text-typed properties match on the exact-match keyword subfield; other
/// datatypes match on the raw field.
#[derive(Clone, Debug)]
pub struct ValueFilter {
    mapper: PropertyFieldMapper,
    value: Value,
}

impl ValueFilter {
    /// Create a new value filter
    pub fn new(mapper: PropertyFieldMapper, value: impl Into<Value>) -> Self {
        Self {
            mapper,
            value: value.into(),
        }
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    /// Compile to a term-query fragment
    pub fn compile(&self) -> Value {
        let field = self
            .mapper
            .keyword_field()
            .unwrap_or_else(|| self.mapper.field().to_string());
        json!({ "term": { field: { "value": self.value } } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    #[test]
    fn test_numeric_value_uses_raw_field() {
        let store = MemoryPropertyStore::new().with_property("Age", 2, DataType::Number);
        let mapper = PropertyFieldMapper::resolve(&store, "Age").unwrap();
        let filter = ValueFilter::new(mapper, 42);
        assert_eq!(
            filter.compile(),
            json!({ "term": { "P:2.numField": { "value": 42 } } })
        );
    }

    #[test]
    fn test_text_value_uses_keyword_subfield() {
        let store = MemoryPropertyStore::new().with_property("Genre", 7, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Genre").unwrap();
        let filter = ValueFilter::new(mapper, "jazz");
        assert_eq!(
            filter.compile(),
            json!({ "term": { "P:7.txtField.keyword": { "value": "jazz" } } })
        );
    }
}
