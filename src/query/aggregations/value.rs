//! Value aggregation - buckets the distinct values of a property

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Aggregation bucketing the top distinct values of a property
#[derive(Clone, Debug)]
pub struct ValueAggregation {
    mapper: PropertyFieldMapper,
    size: Option<u32>,
}

impl ValueAggregation {
    /// Create a new value aggregation with the engine's default bucket count
    pub fn new(mapper: PropertyFieldMapper) -> Self {
        Self { mapper, size: None }
    }

    /// Cap the number of buckets returned
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    /// Compile to a terms aggregation over the property's exact-match field
    pub fn compile(&self) -> Value {
        let field = self
            .mapper
            .keyword_field()
            .unwrap_or_else(|| self.mapper.field().to_string());
        match self.size {
            Some(size) => json!({ "terms": { "field": field, "size": size } }),
            None => json!({ "terms": { "field": field } }),
        }
    }
}
