//! Search-engine boundary
//!
//! The core produces query documents and consumes response shapes; everything
//! the engine itself does happens behind [`SearchClient`]. The same module
//! hosts the compiler boundary for externally supplied base queries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::Result;

/// One compiled search request, ready for the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Index to search
    pub index: String,
    /// Full query document body
    pub body: Value,
}

/// One returned document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document identifier assigned by the store
    #[serde(rename = "_id")]
    pub id: String,
    /// Requested source fields
    #[serde(rename = "_source", default)]
    pub source: Value,
    /// Highlight fragments keyed by field, when highlighting was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<BTreeMap<String, Vec<String>>>,
}

/// Hit list with the total match count
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchHits {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// Raw engine response
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
    /// Aggregation results keyed by aggregation name
    #[serde(default)]
    pub aggregations: BTreeMap<String, Value>,
}

/// Client for executing compiled queries against the search engine
pub trait SearchClient {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;
}

/// Compiler for the host system's own query language
///
/// Used for the externally supplied base query; compiles a query string into a
/// document fragment carrying a top-level `query` clause.
pub trait BaseQueryCompiler {
    fn compile(&self, query: &str) -> Result<Value>;
}
