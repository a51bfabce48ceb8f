//! Sort variants

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;

/// Sort direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Tie-break mode for multi-valued fields
    fn mode(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "min",
            SortOrder::Descending => "max",
        }
    }
}

/// A sort criterion
#[derive(Clone, Debug)]
pub enum Sort {
    /// Sort by a property's value
    Property {
        mapper: PropertyFieldMapper,
        order: Option<SortOrder>,
    },
    /// Sort by relevance score, always descending
    Relevance,
}

impl Sort {
    pub fn property(mapper: PropertyFieldMapper, order: Option<SortOrder>) -> Self {
        Sort::Property { mapper, order }
    }

    pub fn relevance() -> Self {
        Sort::Relevance
    }

    /// Compile to one entry of the query document's sort list
    pub fn compile(&self) -> Value {
        match self {
            Sort::Property { mapper, order } => {
                let field = mapper
                    .keyword_field()
                    .unwrap_or_else(|| mapper.field().to_string());
                match order {
                    // No explicit order requested, leave it to the engine
                    None => json!({ field: {} }),
                    Some(order) => json!({
                        field: { "order": order.as_str(), "mode": order.mode() }
                    }),
                }
            }
            Sort::Relevance => json!({ "_score": { "order": "desc" } }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    fn mapper() -> PropertyFieldMapper {
        let store = MemoryPropertyStore::new().with_property("Price", 5, DataType::Number);
        PropertyFieldMapper::resolve(&store, "Price").unwrap()
    }

    #[test]
    fn test_ascending_uses_min_tie_break() {
        let sort = Sort::property(mapper(), Some(SortOrder::Ascending));
        assert_eq!(
            sort.compile(),
            json!({ "P:5.numField": { "order": "asc", "mode": "min" } })
        );
    }

    #[test]
    fn test_descending_uses_max_tie_break() {
        let sort = Sort::property(mapper(), Some(SortOrder::Descending));
        assert_eq!(
            sort.compile(),
            json!({ "P:5.numField": { "order": "desc", "mode": "max" } })
        );
    }

    #[test]
    fn test_absent_order_is_omitted() {
        let sort = Sort::property(mapper(), None);
        assert_eq!(sort.compile(), json!({ "P:5.numField": {} }));
    }

    #[test]
    fn test_relevance_is_fixed_descending() {
        assert_eq!(
            Sort::relevance().compile(),
            json!({ "_score": { "order": "desc" } })
        );
    }
}
