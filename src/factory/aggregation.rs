//! Aggregation factory

use serde_json::Value;

use crate::error::{FacetqlError, Result};
use crate::factory::{as_object, field_path, require_str};
use crate::mapping::{PropertyFieldMapper, PropertyStore};
use crate::query::aggregations::{Aggregation, RangeAggregation, ValueAggregation};

/// Factory for aggregations
pub struct AggregationFactory<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> AggregationFactory<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    /// Parse one aggregation specification
    ///
    /// The `name` defaults to the property reference when absent.
    pub fn parse(&self, spec: &Value, path: &str) -> Result<Aggregation> {
        let object = as_object(spec, path)?;
        let kind = require_str(spec, path, "type")?;
        let property = require_str(spec, path, "property")?;
        let mapper = PropertyFieldMapper::resolve(self.store, property)?;

        let name = match object.get("name") {
            None => property.to_string(),
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(FacetqlError::parse(
                    field_path(path, "name"),
                    "expected a string",
                ))
            }
        };

        match kind {
            "property" => {
                let mut aggregation = ValueAggregation::new(mapper);
                if let Some(size) = object.get("size") {
                    let size = size.as_u64().ok_or_else(|| {
                        FacetqlError::parse(
                            field_path(path, "size"),
                            "expected a non-negative integer",
                        )
                    })?;
                    aggregation = aggregation.with_size(size as u32);
                }
                Ok(Aggregation::value(name, aggregation))
            }
            "range" => {
                let ranges = object
                    .get("ranges")
                    .ok_or_else(|| {
                        FacetqlError::parse(field_path(path, "ranges"), "field is required")
                    })?
                    .as_array()
                    .ok_or_else(|| {
                        FacetqlError::parse(field_path(path, "ranges"), "expected an array")
                    })?;
                Ok(Aggregation::range(
                    name,
                    RangeAggregation::new(mapper, ranges.clone()),
                ))
            }
            other => Err(FacetqlError::parse(
                field_path(path, "type"),
                format!("unknown aggregation type `{other}`, expected `property` or `range`"),
            )),
        }
    }
}
