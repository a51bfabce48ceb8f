//! Query engine
//!
//! The mutable builder that accumulates filters, aggregations, sorts,
//! highlighters, sources and pagination, and compiles them into one query
//! document. Compilation is pure and idempotent; all network round-trips
//! (chain resolution) happen before filters reach the engine.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::client::{BaseQueryCompiler, SearchQuery};
use crate::error::Result;
use crate::query::aggregations::Aggregation;
use crate::query::combinator;
use crate::query::filters::Filter;
use crate::query::highlight::{FieldHighlighter, POST_TAG, PRE_TAG};
use crate::query::sort::Sort;
use crate::query::types::Occur;

/// Source patterns every query returns: subject metadata, the page title and
/// the modification date (special property with the fixed id 29)
const DEFAULT_SOURCES: &[&str] = &["subject.*", "subject.title", "P:29.datField"];

const DEFAULT_LIMIT: u64 = 10;

/// One boolean clause set
#[derive(Clone, Debug, Default)]
struct BoolClauses {
    must: Vec<Value>,
    should: Vec<Value>,
    must_not: Vec<Value>,
}

impl BoolClauses {
    fn add(&mut self, fragment: Value, occur: Occur) {
        match occur {
            Occur::Must => self.must.push(fragment),
            Occur::Should => self.should.push(fragment),
            Occur::MustNot => self.must_not.push(fragment),
        }
    }

    fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    fn compile(&self) -> Value {
        let mut clauses = Map::new();
        if !self.must.is_empty() {
            clauses.insert("must".to_string(), json!(self.must));
        }
        if !self.should.is_empty() {
            clauses.insert("should".to_string(), json!(self.should));
        }
        if !self.must_not.is_empty() {
            clauses.insert("must_not".to_string(), json!(self.must_not));
        }
        json!({ "bool": Value::Object(clauses) })
    }
}

/// The implicit filter shell every registered aggregation is nested inside
#[derive(Clone, Debug)]
struct AggregationShell {
    name: String,
    target_property: Option<String>,
    pre_filter: BoolClauses,
    body: Value,
}

impl AggregationShell {
    fn compile(&self) -> Value {
        json!({
            "filter": self.pre_filter.compile(),
            "aggs": { self.name.clone(): self.body }
        })
    }
}

/// A post filter as it was added, kept for injection into shells registered
/// afterwards
#[derive(Clone, Debug)]
struct PostFilterRecord {
    fragment: Value,
    target_property: Option<String>,
    occur: Occur,
}

/// The accumulating query builder
///
/// Construction is cheap; one engine is built per search request and discarded
/// after use. Scalar setters are last-write-wins, list operations append.
#[derive(Clone, Debug)]
pub struct QueryEngine {
    index: String,
    constant_score: BoolClauses,
    function_score: BoolClauses,
    post_filters: BoolClauses,
    post_filter_records: Vec<PostFilterRecord>,
    aggregations: Vec<AggregationShell>,
    sorts: Vec<Value>,
    highlight_fields: Map<String, Value>,
    sources: Vec<String>,
    offset: u64,
    limit: u64,
    base_query: Option<Value>,
}

impl QueryEngine {
    /// Create a new engine targeting the given index
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            constant_score: BoolClauses::default(),
            function_score: BoolClauses::default(),
            post_filters: BoolClauses::default(),
            post_filter_records: Vec::new(),
            aggregations: Vec::new(),
            sorts: Vec::new(),
            highlight_fields: Map::new(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            offset: 0,
            limit: DEFAULT_LIMIT,
            base_query: None,
        }
    }

    /// Add a filter to the constant-score set (no relevance contribution)
    ///
    /// Filters flagged as post filters are routed to [`Self::add_post_filter`]
    /// instead.
    pub fn add_constant_score_filter(
        &mut self,
        filter: Filter,
        occur: Occur,
    ) -> Result<&mut Self> {
        if filter.is_post_filter() {
            return self.add_post_filter(filter, occur);
        }
        let fragment = filter.compile()?;
        self.constant_score.add(fragment, occur);
        Ok(self)
    }

    /// Add a filter to the function-score set (contributes to relevance)
    pub fn add_function_score_filter(
        &mut self,
        filter: Filter,
        occur: Occur,
    ) -> Result<&mut Self> {
        if filter.is_post_filter() {
            return self.add_post_filter(filter, occur);
        }
        let fragment = filter.compile()?;
        self.function_score.add(fragment, occur);
        Ok(self)
    }

    /// Add a post filter, applied after aggregation computation
    ///
    /// To keep the other facets consistent with the narrowed result set, the
    /// filter's fragment is injected into the pre-filter of every aggregation
    /// shell except those targeting the same property. The exempted facet
    /// keeps showing its full distribution, which is what makes multi-select
    /// faceting work.
    pub fn add_post_filter(&mut self, filter: Filter, occur: Occur) -> Result<&mut Self> {
        let fragment = filter.compile()?;
        let target = filter.target_property().map(str::to_string);

        self.post_filters.add(fragment.clone(), occur);
        for shell in &mut self.aggregations {
            if !same_property(&shell.target_property, &target) {
                shell.pre_filter.add(fragment.clone(), occur);
            }
        }
        self.post_filter_records.push(PostFilterRecord {
            fragment,
            target_property: target,
            occur,
        });
        Ok(self)
    }

    /// Register an aggregation, wrapped in a fresh filter shell
    ///
    /// Shells registered after a post filter was added receive that filter the
    /// same way existing shells did when it arrived, so registration order
    /// does not change the compiled document.
    pub fn add_aggregation(&mut self, aggregation: Aggregation) -> Result<&mut Self> {
        let mut shell = AggregationShell {
            name: aggregation.name().to_string(),
            target_property: aggregation.target_property().map(str::to_string),
            pre_filter: BoolClauses::default(),
            body: aggregation.compile()?,
        };
        for record in &self.post_filter_records {
            if !same_property(&shell.target_property, &record.target_property) {
                shell.pre_filter.add(record.fragment.clone(), record.occur);
            }
        }
        self.aggregations.push(shell);
        Ok(self)
    }

    /// Add a highlighter's fields to the highlight configuration
    pub fn add_highlighter(&mut self, highlighter: &FieldHighlighter) -> &mut Self {
        for (field, settings) in highlighter.compile() {
            self.highlight_fields.insert(field, settings);
        }
        self
    }

    /// Append a sort criterion
    pub fn add_sort(&mut self, sort: Sort) -> &mut Self {
        self.sorts.push(sort.compile());
        self
    }

    /// Append a source field pattern to return with each hit
    pub fn add_source(&mut self, source: impl Into<String>) -> &mut Self {
        self.sources.push(source.into());
        self
    }

    pub fn set_index(&mut self, index: impl Into<String>) -> &mut Self {
        self.index = index.into();
        self
    }

    pub fn set_offset(&mut self, offset: u64) -> &mut Self {
        self.offset = offset;
        self
    }

    pub fn set_limit(&mut self, limit: u64) -> &mut Self {
        self.limit = limit;
        self
    }

    /// Set an externally supplied base query to conjoin at compile time
    ///
    /// A base query that fails to compile is logged and dropped; the search
    /// proceeds without it.
    pub fn set_base_query(&mut self, compiler: &dyn BaseQueryCompiler, query: &str) -> &mut Self {
        match compiler.compile(query) {
            Ok(fragment) => self.base_query = Some(fragment),
            Err(error) => {
                warn!(%error, query, "base query failed to compile, continuing without it");
                self.base_query = None;
            }
        }
        self
    }

    /// Whether a base query was successfully set
    pub fn has_base_query(&self) -> bool {
        self.base_query.is_some()
    }

    /// Compile the accumulated state into one query document
    ///
    /// Idempotent and side-effect free; may be called multiple times.
    pub fn to_query(&self) -> Result<SearchQuery> {
        let mut body = json!({
            "from": self.offset,
            "size": self.limit,
            "_source": self.sources,
            "query": {
                "bool": {
                    "must": [
                        { "constant_score": { "filter": self.constant_score.compile() } },
                        { "function_score": { "query": self.function_score.compile() } }
                    ]
                }
            }
        });

        if !self.post_filters.is_empty() {
            body["post_filter"] = self.post_filters.compile();
        }
        if !self.aggregations.is_empty() {
            let mut aggs = Map::new();
            for shell in &self.aggregations {
                aggs.insert(shell.name.clone(), shell.compile());
            }
            body["aggs"] = Value::Object(aggs);
        }
        if !self.highlight_fields.is_empty() {
            body["highlight"] = json!({
                "pre_tags": [PRE_TAG],
                "post_tags": [POST_TAG],
                "fields": Value::Object(self.highlight_fields.clone())
            });
        }
        if !self.sorts.is_empty() {
            body["sort"] = json!(self.sorts);
        }

        if let Some(base) = &self.base_query {
            body = combinator::combine(body, base.clone())?;
        }

        Ok(SearchQuery {
            index: self.index.clone(),
            body,
        })
    }
}

/// Whether a shell target and a post-filter target name the same property
fn same_property(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
