//! Search-term filter - free text across multiple properties
//!
//! The target properties are partitioned into plain fields, assembled into one
//! multi-field query string, and chained properties, each carrying its own
//! chained-property filter around a per-property text filter.

use serde_json::{json, Value};

use crate::client::SearchClient;
use crate::error::Result;
use crate::mapping::PropertyFieldMapper;
use crate::query::filters::{ChainedFilter, Filter, TextFilter};
use crate::query::types::DefaultOperator;

/// Generic content fields searched when no target properties are configured
const DEFAULT_SEARCH_FIELDS: &[&str] = &[
    "subject.title^8",
    "text_copy^5",
    "text_raw^3",
    "attachment.title^3",
    "attachment.content^3",
];

/// Free-text filter spanning multiple properties, some possibly chained
#[derive(Clone, Debug)]
pub struct SearchTermFilter {
    term: String,
    fields: Vec<String>,
    chained: Vec<Filter>,
    operator: DefaultOperator,
}

impl SearchTermFilter {
    /// Create a new search-term filter over the given target properties
    ///
    /// With no properties, a fixed set of generic content fields is searched.
    pub fn new(
        term: impl Into<String>,
        properties: &[PropertyFieldMapper],
        operator: DefaultOperator,
    ) -> Self {
        let term = term.into();
        let mut fields = Vec::new();
        let mut chained = Vec::new();
        for property in properties {
            if property.is_chained() {
                let inner = Filter::from(
                    TextFilter::new(property.clone(), term.clone()).with_operator(operator),
                );
                chained.push(Filter::from(ChainedFilter::new(property.clone(), inner)));
            } else {
                let field = property
                    .search_field()
                    .unwrap_or_else(|| property.field().to_string());
                fields.push(match property.weight() {
                    1 => field,
                    weight => format!("{}^{}", field, weight),
                });
            }
        }
        if fields.is_empty() && chained.is_empty() {
            fields = DEFAULT_SEARCH_FIELDS.iter().map(|f| f.to_string()).collect();
        }
        Self {
            term,
            fields,
            chained,
            operator,
        }
    }

    /// Whether any target property still needs chain resolution
    pub fn needs_resolution(&self) -> bool {
        self.chained.iter().any(Filter::needs_resolution)
    }

    /// Resolve every chained target property, one after the other
    pub fn resolve(
        &self,
        client: &dyn SearchClient,
        index: &str,
        max_size: u64,
    ) -> Result<Self> {
        let chained = self
            .chained
            .iter()
            .map(|filter| filter.resolve(client, index, max_size))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            term: self.term.clone(),
            fields: self.fields.clone(),
            chained,
            operator: self.operator,
        })
    }

    /// Compile to a boolean OR of the multi-field query string and the
    /// resolved per-property chained filters
    pub fn compile(&self) -> Result<Value> {
        let mut should = Vec::new();
        if !self.fields.is_empty() {
            should.push(json!({
                "query_string": {
                    "fields": self.fields,
                    "query": self.term,
                    "default_operator": self.operator.as_str(),
                    "analyze_wildcard": true
                }
            }));
        }
        for filter in &self.chained {
            should.push(filter.compile()?);
        }
        if should.len() == 1 {
            return Ok(should.remove(0));
        }
        Ok(json!({ "bool": { "should": should } }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    #[test]
    fn test_defaults_to_generic_content_fields() {
        let filter = SearchTermFilter::new("hello", &[], DefaultOperator::Or);
        let fragment = filter.compile().unwrap();
        assert_eq!(
            fragment["query_string"]["fields"][0],
            json!("subject.title^8")
        );
    }

    #[test]
    fn test_weighted_plain_fields() {
        let store = MemoryPropertyStore::new().with_property("Title", 8, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Title^4").unwrap();
        let filter = SearchTermFilter::new("hello", &[mapper], DefaultOperator::And);
        let fragment = filter.compile().unwrap();
        assert_eq!(
            fragment["query_string"]["fields"],
            json!(["P:8.txtField.search^4"])
        );
        assert_eq!(fragment["query_string"]["default_operator"], json!("and"));
    }

    #[test]
    fn test_chained_property_requires_resolution() {
        let store = MemoryPropertyStore::new()
            .with_property("Author", 3, DataType::Page)
            .with_property("Name", 9, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Author.Name").unwrap();
        let filter = SearchTermFilter::new("hello", &[mapper], DefaultOperator::Or);
        assert!(filter.needs_resolution());
        assert!(filter.compile().is_err());
    }
}
