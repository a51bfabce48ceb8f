//! Search orchestration
//!
//! Builds a query engine from the per-page configuration, applies the
//! per-request specification, executes the compiled query and reshapes the raw
//! response for display.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::client::{BaseQueryCompiler, SearchClient, SearchQuery, SearchResponse};
use crate::config::SearchEngineConfig;
use crate::error::Result;
use crate::factory::{AggregationFactory, FilterFactory, QueryEngineFactory, SortFactory};
use crate::mapping::PropertyStore;
use crate::query::filters::{Filter, SearchTermFilter};
use crate::query::types::Occur;

/// Resolver for namespace display names, provided by the host
pub trait NamespaceResolver {
    fn namespace_name(&self, id: i64) -> Option<String>;
}

/// The per-request search specification
#[derive(Clone, Debug, Default)]
pub struct SearchParams {
    /// Free-text search term
    pub term: Option<String>,
    /// Result window offset
    pub from: u64,
    /// Result window size; 0 falls back to the engine default
    pub limit: u64,
    /// Filter specifications (see [`FilterFactory`])
    pub filters: Vec<Value>,
    /// Extra aggregation specifications beyond the configured facets
    pub aggregations: Vec<Value>,
    /// Sort specifications
    pub sorts: Vec<Value>,
}

/// One reshaped hit
#[derive(Clone, Debug)]
pub struct PageResult {
    pub id: String,
    pub source: Value,
    /// Highlight fragments across all highlighted fields, in field order
    pub highlights: Vec<String>,
}

/// The reshaped search outcome
#[derive(Clone, Debug, Default)]
pub struct SearchResultSet {
    pub total: u64,
    pub hits: Vec<PageResult>,
    /// Facet buckets keyed by facet display name
    pub aggregations: BTreeMap<String, Value>,
}

/// Orchestrates one search request end to end
pub struct SearchEngine<'a> {
    config: &'a SearchEngineConfig,
    store: &'a dyn PropertyStore,
    client: &'a dyn SearchClient,
    compiler: &'a dyn BaseQueryCompiler,
    namespaces: Option<&'a dyn NamespaceResolver>,
    index: String,
}

impl<'a> SearchEngine<'a> {
    pub fn new(
        config: &'a SearchEngineConfig,
        store: &'a dyn PropertyStore,
        client: &'a dyn SearchClient,
        compiler: &'a dyn BaseQueryCompiler,
        index: impl Into<String>,
    ) -> Self {
        Self {
            config,
            store,
            client,
            compiler,
            namespaces: None,
            index: index.into(),
        }
    }

    /// Translate namespace bucket keys to names in the response
    pub fn with_namespace_resolver(mut self, resolver: &'a dyn NamespaceResolver) -> Self {
        self.namespaces = Some(resolver);
        self
    }

    /// Execute one search request
    ///
    /// Malformed specifications and unresolvable properties are fatal; an
    /// execution failure of the final query degrades to an empty result.
    pub fn search(&self, params: &SearchParams) -> Result<SearchResultSet> {
        let query = self.build_query(params)?;
        match self.client.search(&query) {
            Ok(response) => Ok(self.process(response)),
            Err(error) => {
                warn!(%error, "search execution failed, returning an empty result");
                Ok(SearchResultSet::default())
            }
        }
    }

    /// Compile the request into a query document without executing it
    pub fn build_query(&self, params: &SearchParams) -> Result<SearchQuery> {
        let parameters = self.config.parameters();
        let mut engine = QueryEngineFactory::from_config(self.config, self.compiler, &self.index)?;
        engine.set_offset(params.from);
        if params.limit > 0 {
            engine.set_limit(params.limit);
        }

        let filter_factory = FilterFactory::new(self.store)
            .with_post_filter_properties(parameters.post_filter_properties.clone())
            .with_default_operator(parameters.default_operator);
        for (i, spec) in params.filters.iter().enumerate() {
            let filter = filter_factory.parse(spec, &format!("filters.{i}"))?;
            let filter = self.resolve(filter)?;
            engine.add_constant_score_filter(filter, Occur::Must)?;
        }

        let aggregation_factory = AggregationFactory::new(self.store);
        for (i, spec) in params.aggregations.iter().enumerate() {
            let aggregation = aggregation_factory.parse(spec, &format!("aggregations.{i}"))?;
            engine.add_aggregation(aggregation)?;
        }

        let sort_factory = SortFactory::new(self.store);
        for (i, spec) in params.sorts.iter().enumerate() {
            engine.add_sort(sort_factory.parse(spec, &format!("sorts.{i}"))?);
        }

        if let Some(term) = &params.term {
            let filter = Filter::from(SearchTermFilter::new(
                term,
                &parameters.search_term_properties,
                parameters.default_operator,
            ));
            let filter = self.resolve(filter)?;
            engine.add_function_score_filter(filter, Occur::Must)?;
        }

        engine.to_query()
    }

    /// Resolve chained properties, one capped sub-query per chain link
    fn resolve(&self, filter: Filter) -> Result<Filter> {
        if !filter.needs_resolution() {
            return Ok(filter);
        }
        filter.resolve(
            self.client,
            &self.index,
            self.config.parameters().chained_query_size,
        )
    }

    fn process(&self, response: SearchResponse) -> SearchResultSet {
        let hits = response
            .hits
            .hits
            .into_iter()
            .map(|hit| PageResult {
                id: hit.id,
                source: hit.source,
                highlights: hit
                    .highlight
                    .map(|fields| fields.into_values().flatten().collect())
                    .unwrap_or_default(),
            })
            .collect();

        let mut aggregations = BTreeMap::new();
        for (name, value) in response.aggregations {
            // Unwrap the implicit filter shell: the real buckets sit under the
            // aggregation's own name.
            let mut inner = value.get(&name).cloned().unwrap_or(value);
            let facet = self
                .config
                .facet_properties()
                .iter()
                .find(|f| f.name() == name);
            if let Some(facet) = facet {
                if facet.property().field() == "subject.namespace" {
                    self.translate_namespace_buckets(&mut inner);
                }
                let display = facet.alias().unwrap_or(facet.name()).to_string();
                aggregations.insert(display, inner);
            } else {
                aggregations.insert(name, inner);
            }
        }

        SearchResultSet {
            total: response.hits.total,
            hits,
            aggregations,
        }
    }

    /// Replace numeric namespace bucket keys with their display names
    fn translate_namespace_buckets(&self, aggregation: &mut Value) {
        let Some(resolver) = self.namespaces else {
            return;
        };
        let Some(buckets) = aggregation
            .get_mut("buckets")
            .and_then(Value::as_array_mut)
        else {
            return;
        };
        for bucket in buckets {
            let Some(id) = bucket.get("key").and_then(Value::as_i64) else {
                continue;
            };
            if let Some(namespace) = resolver.namespace_name(id) {
                bucket["name"] = Value::String(namespace);
            }
        }
    }
}
