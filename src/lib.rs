//! facetql - faceted-search query compiler
//!
//! Takes a declarative, per-page search configuration plus a per-request
//! specification (filters, aggregations, sorts, a free-text term, pagination)
//! and deterministically compiles them into one Elasticsearch query document,
//! executes it through an injected client, and reshapes the response.
//!
//! The search engine, the property-metadata store, the base-query compiler
//! and configuration persistence are collaborators behind traits; no network
//! code ships in this crate.

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod mapping;
pub mod persistence;
pub mod query;
pub mod search;

pub use client::{BaseQueryCompiler, SearchClient, SearchHit, SearchQuery, SearchResponse};
pub use config::{FacetProperty, SearchEngineConfig, SearchParameters};
pub use error::{FacetqlError, Result};
pub use mapping::{DataType, PropertyFieldMapper, PropertyStore};
pub use persistence::{ConfigRepository, StoredConfig};
pub use query::{Aggregation, Filter, QueryEngine, Sort};
pub use search::{NamespaceResolver, SearchEngine, SearchParams, SearchResultSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
