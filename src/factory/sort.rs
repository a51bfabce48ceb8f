//! Sort factory

use serde_json::Value;

use crate::error::{FacetqlError, Result};
use crate::factory::{as_object, field_path, require_str};
use crate::mapping::{PropertyFieldMapper, PropertyStore};
use crate::query::sort::{Sort, SortOrder};

/// Factory for sorts
pub struct SortFactory<'a> {
    store: &'a dyn PropertyStore,
}

impl<'a> SortFactory<'a> {
    pub fn new(store: &'a dyn PropertyStore) -> Self {
        Self { store }
    }

    /// Parse one sort specification
    ///
    /// An absent `order` means no explicit order is emitted.
    pub fn parse(&self, spec: &Value, path: &str) -> Result<Sort> {
        let object = as_object(spec, path)?;
        let property = require_str(spec, path, "property")?;
        let mapper = PropertyFieldMapper::resolve(self.store, property)?;

        let order = match object.get("order") {
            None => None,
            Some(Value::String(order)) => Some(SortOrder::parse(order).ok_or_else(|| {
                FacetqlError::parse(field_path(path, "order"), "expected `asc` or `desc`")
            })?),
            Some(_) => {
                return Err(FacetqlError::parse(
                    field_path(path, "order"),
                    "expected a string",
                ))
            }
        };
        Ok(Sort::property(mapper, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};
    use serde_json::json;

    fn store() -> MemoryPropertyStore {
        MemoryPropertyStore::new().with_property("Price", 5, DataType::Number)
    }

    #[test]
    fn test_sort_with_order() {
        let store = store();
        let factory = SortFactory::new(&store);
        let sort = factory
            .parse(&json!({ "property": "Price", "order": "desc" }), "sort")
            .unwrap();
        assert_eq!(
            sort.compile(),
            json!({ "P:5.numField": { "order": "desc", "mode": "max" } })
        );
    }

    #[test]
    fn test_sort_without_order() {
        let store = store();
        let factory = SortFactory::new(&store);
        let sort = factory.parse(&json!({ "property": "Price" }), "sort").unwrap();
        assert_eq!(sort.compile(), json!({ "P:5.numField": {} }));
    }

    #[test]
    fn test_invalid_order_is_an_error() {
        let store = store();
        let factory = SortFactory::new(&store);
        let err = factory
            .parse(&json!({ "property": "Price", "order": "sideways" }), "sort")
            .unwrap_err();
        assert!(err.to_string().contains("sort.order"));
    }

    #[test]
    fn test_missing_property_is_an_error() {
        let store = store();
        let factory = SortFactory::new(&store);
        assert!(factory.parse(&json!({ "order": "asc" }), "sort").is_err());
    }
}
