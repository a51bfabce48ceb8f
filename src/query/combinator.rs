//! Query combinator
//!
//! Merges two already-built query documents into one logical conjunction.
//! Combination is asymmetric: every non-query key (aggregations, highlight,
//! pagination, sources) is kept from the base document only.

use serde_json::{json, Value};

use crate::error::{FacetqlError, Result};

/// Conjoin two query documents
///
/// Both documents must carry a top-level `query` clause. The result is the
/// base document with its query replaced by `bool.must = [addition, base]`.
pub fn combine(base: Value, addition: Value) -> Result<Value> {
    let addition_query = addition
        .get("query")
        .cloned()
        .ok_or_else(|| FacetqlError::InvalidQuery("addition has no `query` clause".to_string()))?;

    let mut merged = base;
    let base_query = merged
        .get("query")
        .cloned()
        .ok_or_else(|| FacetqlError::InvalidQuery("base has no `query` clause".to_string()))?;

    merged["query"] = json!({
        "bool": {
            "must": [addition_query, base_query]
        }
    });
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_ands_both_queries() {
        let base = json!({
            "query": { "term": { "a": 1 } },
            "from": 20,
            "aggs": { "Genre": {} }
        });
        let addition = json!({ "query": { "term": { "b": 2 } } });

        let merged = combine(base, addition).unwrap();
        assert_eq!(
            merged["query"]["bool"]["must"],
            json!([{ "term": { "b": 2 } }, { "term": { "a": 1 } }])
        );
        // Non-query keys survive from the base only
        assert_eq!(merged["from"], json!(20));
        assert!(merged["aggs"].get("Genre").is_some());
    }

    #[test]
    fn test_combination_is_asymmetric() {
        let a = json!({ "query": { "term": { "a": 1 } }, "from": 20 });
        let b = json!({ "query": { "term": { "b": 2 } }, "from": 40 });

        let ab = combine(a.clone(), b.clone()).unwrap();
        let ba = combine(b, a).unwrap();
        assert_eq!(ab["from"], json!(20));
        assert_eq!(ba["from"], json!(40));
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_missing_query_clause_is_an_error() {
        let base = json!({ "from": 0 });
        let addition = json!({ "query": {} });
        assert!(matches!(
            combine(base, addition),
            Err(FacetqlError::InvalidQuery(_))
        ));
        let base = json!({ "query": {} });
        let addition = json!({ "size": 10 });
        assert!(matches!(
            combine(base, addition),
            Err(FacetqlError::InvalidQuery(_))
        ));
    }
}
