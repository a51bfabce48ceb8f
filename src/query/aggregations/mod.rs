//! Aggregation taxonomy
//!
//! Every aggregation is a named bucketing computation; the name becomes the
//! bucket key in the engine's response. When registered with the query engine,
//! each aggregation is additionally wrapped in an implicit filter shell so post
//! filters can be injected selectively later.

pub mod filter;
pub mod range;
pub mod value;

pub use filter::FilterAggregation;
pub use range::RangeAggregation;
pub use value::ValueAggregation;

use serde_json::Value;

use crate::error::Result;

/// Concrete aggregation kind
#[derive(Clone, Debug)]
pub enum AggregationKind {
    Value(ValueAggregation),
    Range(RangeAggregation),
    Filter(FilterAggregation),
}

/// A named bucketing computation
#[derive(Clone, Debug)]
pub struct Aggregation {
    name: String,
    kind: AggregationKind,
}

impl Aggregation {
    pub fn new(name: impl Into<String>, kind: AggregationKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn value(name: impl Into<String>, aggregation: ValueAggregation) -> Self {
        Self::new(name, AggregationKind::Value(aggregation))
    }

    pub fn range(name: impl Into<String>, aggregation: RangeAggregation) -> Self {
        Self::new(name, AggregationKind::Range(aggregation))
    }

    pub fn filtered(name: impl Into<String>, aggregation: FilterAggregation) -> Self {
        Self::new(name, AggregationKind::Filter(aggregation))
    }

    /// Response bucket key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AggregationKind {
        &self.kind
    }

    /// Name of the property this aggregation buckets, for per-property kinds
    pub fn target_property(&self) -> Option<&str> {
        match &self.kind {
            AggregationKind::Value(a) => Some(a.mapper().name()),
            AggregationKind::Range(a) => Some(a.mapper().name()),
            AggregationKind::Filter(_) => None,
        }
    }

    /// Compile the aggregation body
    pub fn compile(&self) -> Result<Value> {
        match &self.kind {
            AggregationKind::Value(a) => Ok(a.compile()),
            AggregationKind::Range(a) => Ok(a.compile()),
            AggregationKind::Filter(a) => a.compile(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore, PropertyFieldMapper};

    #[test]
    fn test_target_property() {
        let store = MemoryPropertyStore::new().with_property("Genre", 7, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Genre").unwrap();
        let agg = Aggregation::value("Genre", ValueAggregation::new(mapper));
        assert_eq!(agg.target_property(), Some("Genre"));
        assert_eq!(agg.name(), "Genre");
    }
}
