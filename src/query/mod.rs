//! Query construction
//!
//! This module turns a declarative search specification into a single
//! well-formed query document:
//! - filters compile to boolean sub-query fragments
//! - aggregations are wrapped in filter shells for post-filter consistency
//! - chained properties are resolved via capped sub-queries
//! - an externally supplied base query is conjoined at compile time

pub mod aggregations;
pub mod combinator;
pub mod engine;
pub mod filters;
pub mod highlight;
pub mod sort;
pub mod types;

pub use aggregations::{Aggregation, AggregationKind};
pub use engine::QueryEngine;
pub use filters::{Filter, FilterKind};
pub use highlight::{FieldHighlighter, HighlighterType};
pub use sort::{Sort, SortOrder};
pub use types::{DefaultOperator, Fuzziness, Occur, RangeBounds, RangeValue};
