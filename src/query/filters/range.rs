//! Range filter - matches documents with property values in an interval

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;
use crate::query::types::RangeBounds;

/// Filter matching documents whose numeric or date property falls in a range
#[derive(Clone, Debug)]
pub struct RangeFilter {
    mapper: PropertyFieldMapper,
    bounds: RangeBounds,
}

impl RangeFilter {
    /// Create a new range filter
    pub fn new(mapper: PropertyFieldMapper, bounds: RangeBounds) -> Self {
        Self { mapper, bounds }
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    pub fn bounds(&self) -> &RangeBounds {
        &self.bounds
    }

    /// Compile to a range-query fragment
    pub fn compile(&self) -> Value {
        // RangeBounds serializes only the bounds that are set, plus boost.
        let bounds = serde_json::to_value(&self.bounds).unwrap_or_else(|_| json!({}));
        json!({ "range": { self.mapper.field(): bounds } })
    }
}
