//! Value-set filter - matches documents where a property takes any of a set of values

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Filter matching documents whose property equals any of the given values
///
/// Equivalent to a boolean OR of value filters, processed by the engine in a
/// single pass.
#[derive(Clone, Debug)]
pub struct ValuesFilter {
    mapper: PropertyFieldMapper,
    field: String,
    values: Vec<Value>,
}

impl ValuesFilter {
    /// Create a new value-set filter over the property's exact-match field
    pub fn new(mapper: PropertyFieldMapper, values: Vec<Value>) -> Self {
        let field = mapper
            .keyword_field()
            .unwrap_or_else(|| mapper.field().to_string());
        Self {
            mapper,
            field,
            values,
        }
    }

    /// Create a value-set filter over the property's page-identity field
    ///
    /// Used by chained-property resolution, where the values are document ids
    /// returned by a preceding sub-query.
    pub fn on_page_id_field(mapper: PropertyFieldMapper, values: Vec<Value>) -> Self {
        let field = mapper.page_id_field();
        Self {
            mapper,
            field,
            values,
        }
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Compile to a terms-query fragment
    pub fn compile(&self) -> Value {
        json!({ "terms": { self.field.clone(): self.values } })
    }
}
