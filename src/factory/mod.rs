//! Specification factories
//!
//! Pure translators from externally supplied JSON specifications to the typed
//! query objects. Every validation failure is a parse error carrying the
//! dotted path of the offending field; there are no silent fallbacks.

pub mod aggregation;
pub mod engine;
pub mod filter;
pub mod sort;

pub use aggregation::AggregationFactory;
pub use engine::QueryEngineFactory;
pub use filter::FilterFactory;
pub use sort::SortFactory;

use serde_json::Value;

use crate::error::{FacetqlError, Result};

/// Join a field onto a dotted specification path
pub(crate) fn field_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Fetch a required string field
pub(crate) fn require_str<'a>(spec: &'a Value, path: &str, field: &str) -> Result<&'a str> {
    spec.get(field)
        .ok_or_else(|| FacetqlError::parse(field_path(path, field), "field is required"))?
        .as_str()
        .ok_or_else(|| FacetqlError::parse(field_path(path, field), "expected a string"))
}

/// Interpret a specification value as an object
pub(crate) fn as_object<'a>(
    spec: &'a Value,
    path: &str,
) -> Result<&'a serde_json::Map<String, Value>> {
    spec.as_object()
        .ok_or_else(|| FacetqlError::parse(path, "expected an object"))
}
