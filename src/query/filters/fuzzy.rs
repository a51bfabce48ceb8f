//! Fuzzy filter - matches terms within an edit distance

use serde_json::{json, Value};

use crate::mapping::PropertyFieldMapper;
use crate::query::types::Fuzziness;

/// Filter matching terms within an edit distance of the given term
#[derive(Clone, Debug)]
pub struct FuzzyFilter {
    mapper: PropertyFieldMapper,
    term: String,
    fuzziness: Fuzziness,
}

impl FuzzyFilter {
    /// Create a new fuzzy filter with automatic fuzziness
    pub fn new(mapper: PropertyFieldMapper, term: impl Into<String>) -> Self {
        Self {
            mapper,
            term: term.into(),
            fuzziness: Fuzziness::Auto,
        }
    }

    /// Set the maximum edit distance
    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    pub fn mapper(&self) -> &PropertyFieldMapper {
        &self.mapper
    }

    /// Compile to a fuzzy-query fragment
    pub fn compile(&self) -> Value {
        let field = self
            .mapper
            .search_field()
            .unwrap_or_else(|| self.mapper.field().to_string());
        json!({
            "fuzzy": {
                field: {
                    "value": self.term,
                    "fuzziness": self.fuzziness.to_value()
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore};

    #[test]
    fn test_fuzzy_fragment_defaults_to_auto() {
        let store = MemoryPropertyStore::new().with_property("Title", 8, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Title").unwrap();
        let filter = FuzzyFilter::new(mapper, "roust");
        assert_eq!(
            filter.compile(),
            json!({ "fuzzy": { "P:8.txtField.search": { "value": "roust", "fuzziness": "AUTO" } } })
        );
    }

    #[test]
    fn test_explicit_edit_distance() {
        let store = MemoryPropertyStore::new().with_property("Title", 8, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Title").unwrap();
        let filter = FuzzyFilter::new(mapper, "roust").with_fuzziness(Fuzziness::Distance(2));
        let fragment = filter.compile();
        assert_eq!(fragment["fuzzy"]["P:8.txtField.search"]["fuzziness"], 2);
    }
}
