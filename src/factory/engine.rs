//! Query engine factory
//!
//! Builds a pre-configured [`QueryEngine`] from a per-page search
//! configuration: one facet aggregation per facet property, sources for the
//! result properties, highlighters and the base query.

use crate::client::BaseQueryCompiler;
use crate::config::SearchEngineConfig;
use crate::error::Result;
use crate::query::aggregations::{Aggregation, ValueAggregation};
use crate::query::engine::QueryEngine;
use crate::query::highlight::FieldHighlighter;

/// Factory for configuration-driven query engines
pub struct QueryEngineFactory;

impl QueryEngineFactory {
    /// Build an engine for one search request against the given index
    pub fn from_config(
        config: &SearchEngineConfig,
        compiler: &dyn BaseQueryCompiler,
        index: &str,
    ) -> Result<QueryEngine> {
        let mut engine = QueryEngine::new(index);
        let parameters = config.parameters();

        for facet in config.facet_properties() {
            let mut aggregation = ValueAggregation::new(facet.property().clone());
            if let Some(size) = parameters.aggregation_size {
                aggregation = aggregation.with_size(size);
            }
            engine.add_aggregation(Aggregation::value(facet.name(), aggregation))?;
        }

        for property in config.result_properties() {
            engine.add_source(property.field().to_string());
        }

        if !parameters.highlighted_properties.is_empty() {
            let highlighter = FieldHighlighter::new(parameters.highlighted_properties.clone());
            engine.add_highlighter(&highlighter);
        }

        if let Some(base_query) = &parameters.base_query {
            engine.set_base_query(compiler, base_query);
        }

        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};
    use serde_json::json;

    struct AcceptAll;

    impl BaseQueryCompiler for AcceptAll {
        fn compile(&self, _query: &str) -> Result<serde_json::Value> {
            Ok(json!({ "query": { "term": { "subject.namespace": 0 } } }))
        }
    }

    fn store() -> MemoryPropertyStore {
        MemoryPropertyStore::new()
            .with_property("Genre", 7, DataType::Text)
            .with_property("Price", 5, DataType::Number)
            .with_property("Title", 8, DataType::Text)
    }

    fn config(store: &MemoryPropertyStore, parameters: &[(String, String)]) -> SearchEngineConfig {
        SearchEngineConfig::new(
            1,
            &["Genre".to_string(), "Price".to_string()],
            &["Title".to_string()],
            parameters,
            store,
            &AcceptAll,
        )
        .unwrap()
    }

    #[test]
    fn test_facets_become_aggregations() {
        let store = store();
        let config = config(&store, &[]);
        let engine = QueryEngineFactory::from_config(&config, &AcceptAll, "wiki_main").unwrap();
        let body = engine.to_query().unwrap().body;
        assert!(body["aggs"]["Genre"]["aggs"]["Genre"]["terms"].is_object());
        assert!(body["aggs"]["Price"]["aggs"]["Price"]["terms"].is_object());
    }

    #[test]
    fn test_aggregation_size_parameter_caps_facets() {
        let store = store();
        let config = config(
            &store,
            &[("aggregation size".to_string(), "5".to_string())],
        );
        let engine = QueryEngineFactory::from_config(&config, &AcceptAll, "wiki_main").unwrap();
        let body = engine.to_query().unwrap().body;
        assert_eq!(body["aggs"]["Genre"]["aggs"]["Genre"]["terms"]["size"], json!(5));
    }

    #[test]
    fn test_result_properties_become_sources() {
        let store = store();
        let config = config(&store, &[]);
        let engine = QueryEngineFactory::from_config(&config, &AcceptAll, "wiki_main").unwrap();
        let body = engine.to_query().unwrap().body;
        let sources = body["_source"].as_array().unwrap();
        assert!(sources.contains(&json!("P:8.txtField")));
    }

    #[test]
    fn test_base_query_from_config_is_conjoined() {
        let store = store();
        let config = config(
            &store,
            &[("base query".to_string(), "[[Category:Album]]".to_string())],
        );
        let engine = QueryEngineFactory::from_config(&config, &AcceptAll, "wiki_main").unwrap();
        assert!(engine.has_base_query());
        let body = engine.to_query().unwrap().body;
        assert_eq!(
            body["query"]["bool"]["must"][0],
            json!({ "term": { "subject.namespace": 0 } })
        );
    }
}
