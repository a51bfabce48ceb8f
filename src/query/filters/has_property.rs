//! Has-property filter - matches documents where a property is set at all

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Filter matching documents that carry any value for the property
#[derive(Clone, Debug)]
pub struct HasPropertyFilter {
    mapper: PropertyFieldMapper,
}

impl HasPropertyFilter {
    /// Create a new has-property filter
    pub fn new(mapper: PropertyFieldMapper) -> Self {
        Self { mapper }
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    /// Compile to an exists-query fragment
    pub fn compile(&self) -> Value {
        json!({ "exists": { "field": self.mapper.field() } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    #[test]
    fn test_exists_fragment() {
        let store = MemoryPropertyStore::new().with_property("Author", 3, DataType::Page);
        let mapper = PropertyFieldMapper::resolve(&store, "Author").unwrap();
        let filter = HasPropertyFilter::new(mapper);
        assert_eq!(
            filter.compile(),
            json!({ "exists": { "field": "P:3.wpgField" } })
        );
    }
}
