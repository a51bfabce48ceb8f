//! Filter aggregation - nests aggregations inside a named pre-filter bucket

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::query::aggregations::Aggregation;
use crate::query::filters::Filter;

/// Aggregation scoping a list of nested aggregations to a boolean pre-filter
#[derive(Clone, Debug)]
pub struct FilterAggregation {
    filter: Filter,
    aggregations: Vec<Aggregation>,
}

impl FilterAggregation {
    /// Create a new filter-scoped aggregation
    pub fn new(filter: Filter, aggregations: Vec<Aggregation>) -> Self {
        Self {
            filter,
            aggregations,
        }
    }

    /// Compile to a filter bucket with the nested aggregations inside
    pub fn compile(&self) -> Result<Value> {
        let mut nested = Map::new();
        for aggregation in &self.aggregations {
            nested.insert(aggregation.name().to_string(), aggregation.compile()?);
        }
        Ok(json!({
            "filter": self.filter.compile()?,
            "aggs": Value::Object(nested)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore, PropertyFieldMapper};
    use crate::query::aggregations::ValueAggregation;
    use crate::query::filters::ValueFilter;

    #[test]
    fn test_nested_aggregations_are_keyed_by_name() {
        let store = MemoryPropertyStore::new()
            .with_property("Genre", 7, DataType::Text)
            .with_property("Age", 2, DataType::Number);
        let genre = PropertyFieldMapper::resolve(&store, "Genre").unwrap();
        let age = PropertyFieldMapper::resolve(&store, "Age").unwrap();

        let agg = FilterAggregation::new(
            Filter::from(ValueFilter::new(age, 42)),
            vec![Aggregation::value("Genre", ValueAggregation::new(genre))],
        );
        let compiled = agg.compile().unwrap();
        assert!(compiled["filter"]["bool"]["must"].is_array());
        assert_eq!(
            compiled["aggs"]["Genre"]["terms"]["field"],
            json!("P:7.txtField.keyword")
        );
    }
}
