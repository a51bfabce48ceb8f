//! Text filter - free-text query string scoped to one property

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;
use crate::query::types::DefaultOperator;

/// Filter matching a free-text query string against one property
///
/// The query string supports the engine's full query syntax, including
/// wildcards, which are analyzed.
#[derive(Clone, Debug)]
pub struct TextFilter {
    mapper: PropertyFieldMapper,
    query: String,
    operator: DefaultOperator,
}

impl TextFilter {
    /// Create a new text filter with the default OR operator
    pub fn new(mapper: PropertyFieldMapper, query: impl Into<String>) -> Self {
        Self {
            mapper,
            query: query.into(),
            operator: DefaultOperator::Or,
        }
    }

    /// Set the default boolean operator between terms
    pub fn with_operator(mut self, operator: DefaultOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    /// Compile to a query-string fragment
    pub fn compile(&self) -> Value {
        let field = self
            .mapper
            .search_field()
            .unwrap_or_else(|| self.mapper.field().to_string());
        json!({
            "query_string": {
                "fields": [field],
                "query": self.query,
                "default_operator": self.operator.as_str(),
                "analyze_wildcard": true
            }
        })
    }
}
