//! Range aggregation - buckets a property by caller-supplied boundaries

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Aggregation bucketing a property into caller-supplied ranges
///
/// The boundary objects are passed through verbatim: ordering, overlap and
/// completeness are the caller's responsibility.
#[derive(Clone, Debug)]
pub struct RangeAggregation {
    mapper: PropertyFieldMapper,
    ranges: Vec<Value>,
}

impl RangeAggregation {
    /// Create a new range aggregation
    pub fn new(mapper: PropertyFieldMapper, ranges: Vec<Value>) -> Self {
        Self { mapper, ranges }
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    pub fn ranges(&self) -> &[Value] {
        &self.ranges
    }

    /// Compile to a keyed range aggregation over the property's raw field
    pub fn compile(&self) -> Value {
        json!({
            "range": {
                "field": self.mapper.field(),
                "ranges": self.ranges,
                "keyed": true
            }
        })
    }
}
