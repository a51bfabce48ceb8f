//! Per-page search configuration
//!
//! An administrator declares, per page, which property conditions the search
//! runs under: the facet properties offered for filtering, the result
//! properties returned per hit, and a set of named parameters. The raw strings
//! live in storage (see [`crate::persistence`]); this module resolves them
//! into typed form and validates them eagerly.

use tracing::debug;

use crate::client::BaseQueryCompiler;
use crate::error::{FacetqlError, Result};
use crate::mapping::{PropertyFieldMapper, PropertyStore};
use crate::persistence::{ConfigRepository, StoredConfig};
use crate::query::types::DefaultOperator;

/// Default result-window cap for the sub-queries issued during chained
/// property resolution
pub const DEFAULT_CHAINED_QUERY_SIZE: u64 = 1000;

/// One facet property, optionally carrying a display alias (`Name=Alias`)
#[derive(Clone, Debug)]
pub struct FacetProperty {
    property: PropertyFieldMapper,
    name: String,
    alias: Option<String>,
}

impl FacetProperty {
    fn parse(store: &dyn PropertyStore, raw: &str) -> Result<Self> {
        let (name, alias) = match raw.split_once('=') {
            Some((name, alias)) => (name.trim(), Some(alias.trim().to_string())),
            None => (raw.trim(), None),
        };
        Ok(Self {
            property: PropertyFieldMapper::resolve(store, name)?,
            name: name.to_string(),
            alias,
        })
    }

    pub fn property(&self) -> &PropertyFieldMapper {
        &self.property
    }

    /// Property name as declared
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display alias, when one was declared
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// Typed named parameters
#[derive(Clone, Debug)]
pub struct SearchParameters {
    pub base_query: Option<String>,
    pub default_operator: DefaultOperator,
    pub aggregation_size: Option<u32>,
    pub highlighted_properties: Vec<PropertyFieldMapper>,
    pub search_term_properties: Vec<PropertyFieldMapper>,
    pub post_filter_properties: Vec<String>,
    pub chained_query_size: u64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            base_query: None,
            default_operator: DefaultOperator::default(),
            aggregation_size: None,
            highlighted_properties: Vec::new(),
            search_term_properties: Vec::new(),
            post_filter_properties: Vec::new(),
            chained_query_size: DEFAULT_CHAINED_QUERY_SIZE,
        }
    }
}

/// The declarative, per-page search specification
#[derive(Clone, Debug)]
pub struct SearchEngineConfig {
    page_id: u64,
    facet_properties: Vec<FacetProperty>,
    result_properties: Vec<PropertyFieldMapper>,
    parameters: SearchParameters,
}

impl SearchEngineConfig {
    /// Resolve and validate a configuration
    ///
    /// A declared base query is validated against the sub-query compiler here,
    /// so a broken one fails at configuration time instead of at search time.
    pub fn new(
        page_id: u64,
        facet_properties: &[String],
        result_properties: &[String],
        parameters: &[(String, String)],
        store: &dyn PropertyStore,
        compiler: &dyn BaseQueryCompiler,
    ) -> Result<Self> {
        let facet_properties = facet_properties
            .iter()
            .map(|raw| FacetProperty::parse(store, raw))
            .collect::<Result<Vec<_>>>()?;
        let result_properties = result_properties
            .iter()
            .map(|raw| PropertyFieldMapper::resolve(store, raw))
            .collect::<Result<Vec<_>>>()?;

        let mut typed = SearchParameters::default();
        for (name, value) in parameters {
            match name.as_str() {
                "base query" => {
                    compiler.compile(value).map_err(|error| {
                        FacetqlError::Config(format!("base query does not compile: {error}"))
                    })?;
                    typed.base_query = Some(value.clone());
                }
                "default operator" => {
                    typed.default_operator = DefaultOperator::parse(value).ok_or_else(|| {
                        FacetqlError::Config(format!(
                            "default operator must be `and` or `or`, got `{value}`"
                        ))
                    })?;
                }
                "aggregation size" => {
                    typed.aggregation_size = Some(value.parse().map_err(|_| {
                        FacetqlError::Config(format!(
                            "aggregation size must be a non-negative integer, got `{value}`"
                        ))
                    })?);
                }
                "highlighted properties" => {
                    typed.highlighted_properties = resolve_list(store, value)?;
                }
                "search term properties" => {
                    typed.search_term_properties = resolve_list(store, value)?;
                }
                "post filter properties" => {
                    typed.post_filter_properties =
                        value.split(',').map(|p| p.trim().to_string()).collect();
                }
                "chained query size" => {
                    typed.chained_query_size = value.parse().map_err(|_| {
                        FacetqlError::Config(format!(
                            "chained query size must be a non-negative integer, got `{value}`"
                        ))
                    })?;
                }
                other => {
                    return Err(FacetqlError::Config(format!(
                        "unknown search parameter `{other}`"
                    )))
                }
            }
        }

        debug!(page_id, facets = facet_properties.len(), "loaded search configuration");
        Ok(Self {
            page_id,
            facet_properties,
            result_properties,
            parameters: typed,
        })
    }

    /// Load a stored configuration by page id
    pub fn from_repository(
        repository: &dyn ConfigRepository,
        page_id: u64,
        store: &dyn PropertyStore,
        compiler: &dyn BaseQueryCompiler,
    ) -> Result<Option<Self>> {
        match repository.load(page_id)? {
            None => Ok(None),
            Some(stored) => Self::new(
                page_id,
                &stored.facet_properties,
                &stored.result_properties,
                &stored.parameters,
                store,
                compiler,
            )
            .map(Some),
        }
    }

    /// Persist this configuration's raw form (full replace)
    pub fn save(&self, repository: &dyn ConfigRepository) -> Result<()> {
        repository.save(self.page_id, &self.to_stored())
    }

    fn to_stored(&self) -> StoredConfig {
        StoredConfig {
            facet_properties: self
                .facet_properties
                .iter()
                .map(|f| match f.alias() {
                    Some(alias) => format!("{}={}", f.name(), alias),
                    None => f.name().to_string(),
                })
                .collect(),
            result_properties: self
                .result_properties
                .iter()
                .map(PropertyFieldMapper::reference)
                .collect(),
            parameters: self.raw_parameters(),
        }
    }

    fn raw_parameters(&self) -> Vec<(String, String)> {
        let mut raw = Vec::new();
        if let Some(base_query) = &self.parameters.base_query {
            raw.push(("base query".to_string(), base_query.clone()));
        }
        raw.push((
            "default operator".to_string(),
            self.parameters.default_operator.as_str().to_string(),
        ));
        if let Some(size) = self.parameters.aggregation_size {
            raw.push(("aggregation size".to_string(), size.to_string()));
        }
        if !self.parameters.highlighted_properties.is_empty() {
            raw.push((
                "highlighted properties".to_string(),
                join_references(&self.parameters.highlighted_properties),
            ));
        }
        if !self.parameters.search_term_properties.is_empty() {
            raw.push((
                "search term properties".to_string(),
                join_references(&self.parameters.search_term_properties),
            ));
        }
        if !self.parameters.post_filter_properties.is_empty() {
            raw.push((
                "post filter properties".to_string(),
                self.parameters.post_filter_properties.join(","),
            ));
        }
        if self.parameters.chained_query_size != DEFAULT_CHAINED_QUERY_SIZE {
            raw.push((
                "chained query size".to_string(),
                self.parameters.chained_query_size.to_string(),
            ));
        }
        raw
    }

    pub fn page_id(&self) -> u64 {
        self.page_id
    }

    pub fn facet_properties(&self) -> &[FacetProperty] {
        &self.facet_properties
    }

    pub fn result_properties(&self) -> &[PropertyFieldMapper] {
        &self.result_properties
    }

    /// The result property rendered as the hit's link target
    pub fn link_target(&self) -> Option<&PropertyFieldMapper> {
        self.result_properties.first()
    }

    pub fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }
}

fn join_references(properties: &[PropertyFieldMapper]) -> String {
    properties
        .iter()
        .map(PropertyFieldMapper::reference)
        .collect::<Vec<_>>()
        .join(",")
}

fn resolve_list(store: &dyn PropertyStore, value: &str) -> Result<Vec<PropertyFieldMapper>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| PropertyFieldMapper::resolve(store, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};
    use serde_json::json;

    struct AcceptAll;

    impl BaseQueryCompiler for AcceptAll {
        fn compile(&self, _query: &str) -> Result<serde_json::Value> {
            Ok(json!({ "query": { "match_all": {} } }))
        }
    }

    struct RejectAll;

    impl BaseQueryCompiler for RejectAll {
        fn compile(&self, query: &str) -> Result<serde_json::Value> {
            Err(FacetqlError::InvalidQuery(query.to_string()))
        }
    }

    fn store() -> MemoryPropertyStore {
        MemoryPropertyStore::new()
            .with_property("Genre", 7, DataType::Text)
            .with_property("Price", 5, DataType::Number)
            .with_property("Title", 8, DataType::Text)
    }

    #[test]
    fn test_facet_alias_parsing() {
        let store = store();
        let config = SearchEngineConfig::new(
            1,
            &["Genre=Musikrichtung".to_string(), "Price".to_string()],
            &["Title".to_string()],
            &[],
            &store,
            &AcceptAll,
        )
        .unwrap();
        let facets = config.facet_properties();
        assert_eq!(facets[0].name(), "Genre");
        assert_eq!(facets[0].alias(), Some("Musikrichtung"));
        assert_eq!(facets[1].alias(), None);
        assert_eq!(config.link_target().unwrap().name(), "Title");
    }

    #[test]
    fn test_invalid_base_query_fails_fast() {
        let store = store();
        let result = SearchEngineConfig::new(
            1,
            &[],
            &[],
            &[("base query".to_string(), "[[Broken".to_string())],
            &store,
            &RejectAll,
        );
        assert!(matches!(result, Err(FacetqlError::Config(_))));
    }

    #[test]
    fn test_unknown_parameter_is_an_error() {
        let store = store();
        let result = SearchEngineConfig::new(
            1,
            &[],
            &[],
            &[("made up".to_string(), "1".to_string())],
            &store,
            &AcceptAll,
        );
        assert!(matches!(result, Err(FacetqlError::Config(_))));
    }

    #[test]
    fn test_save_and_reload_round_trips() {
        use crate::persistence::MemoryConfigRepository;

        let store = store();
        let repository = MemoryConfigRepository::new();
        let config = SearchEngineConfig::new(
            7,
            &["Genre=Style".to_string()],
            &["Title^2".to_string()],
            &[
                ("highlighted properties".to_string(), "Title".to_string()),
                ("chained query size".to_string(), "500".to_string()),
            ],
            &store,
            &AcceptAll,
        )
        .unwrap();
        config.save(&repository).unwrap();

        let reloaded = SearchEngineConfig::from_repository(&repository, 7, &store, &AcceptAll)
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.facet_properties()[0].alias(), Some("Style"));
        assert_eq!(reloaded.result_properties()[0].weight(), 2);
        assert_eq!(reloaded.parameters().highlighted_properties.len(), 1);
        assert_eq!(reloaded.parameters().chained_query_size, 500);
    }

    #[test]
    fn test_typed_parameters() {
        let store = store();
        let config = SearchEngineConfig::new(
            1,
            &[],
            &[],
            &[
                ("default operator".to_string(), "and".to_string()),
                ("aggregation size".to_string(), "25".to_string()),
                ("post filter properties".to_string(), "Genre, Price".to_string()),
                ("chained query size".to_string(), "500".to_string()),
            ],
            &store,
            &AcceptAll,
        )
        .unwrap();
        let parameters = config.parameters();
        assert_eq!(parameters.default_operator, DefaultOperator::And);
        assert_eq!(parameters.aggregation_size, Some(25));
        assert_eq!(parameters.post_filter_properties, vec!["Genre", "Price"]);
        assert_eq!(parameters.chained_query_size, 500);
    }
}
