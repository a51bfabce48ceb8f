//! Filter taxonomy
//!
//! Every filter compiles to a self-contained boolean-query fragment. Negation
//! and post-filter placement are carried as orthogonal flags on the shared
//! [`Filter`] wrapper: negation only changes the must/must-not envelope, and
//! the post-filter flag only changes where the engine places the fragment.

pub mod chained;
pub mod fuzzy;
pub mod has_property;
pub mod page;
pub mod range;
pub mod search_term;
pub mod text;
pub mod value;
pub mod values;

pub use chained::ChainedFilter;
pub use fuzzy::FuzzyFilter;
pub use has_property::HasPropertyFilter;
pub use page::PageFilter;
pub use range::RangeFilter;
pub use search_term::SearchTermFilter;
pub use text::TextFilter;
pub use value::ValueFilter;
pub use values::ValuesFilter;

use serde_json::{json, Value};

use crate::client::SearchClient;
use crate::error::{FacetqlError, Result};

/// Concrete filter kind
#[derive(Clone, Debug)]
pub enum FilterKind {
    Value(ValueFilter),
    Values(ValuesFilter),
    Range(RangeFilter),
    Fuzzy(FuzzyFilter),
    Text(TextFilter),
    HasProperty(HasPropertyFilter),
    Page(PageFilter),
    Chained(ChainedFilter),
    SearchTerm(SearchTermFilter),
}

/// A predicate over documents
///
/// Wraps one concrete filter kind together with the negation and post-filter
/// flags shared by all kinds.
#[derive(Clone, Debug)]
pub struct Filter {
    kind: FilterKind,
    negated: bool,
    post_filter: bool,
}

impl Filter {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            negated: false,
            post_filter: false,
        }
    }

    /// Set the negation flag
    pub fn negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Set the post-filter flag
    pub fn post_filter(mut self, post_filter: bool) -> Self {
        self.post_filter = post_filter;
        self
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_post_filter(&self) -> bool {
        self.post_filter
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    /// Name of the property this filter targets, when it targets one
    ///
    /// Chained filters target their chain's leftmost property, which is where
    /// the terminal filter lands after resolution.
    pub fn target_property(&self) -> Option<&str> {
        match &self.kind {
            FilterKind::Value(f) => Some(f.mapper().name()),
            FilterKind::Values(f) => Some(f.mapper().name()),
            FilterKind::Range(f) => Some(f.mapper().name()),
            FilterKind::Fuzzy(f) => Some(f.mapper().name()),
            FilterKind::Text(f) => Some(f.mapper().name()),
            FilterKind::HasProperty(f) => Some(f.mapper().name()),
            FilterKind::Chained(f) => Some(f.terminal_property().name()),
            FilterKind::Page(_) | FilterKind::SearchTerm(_) => None,
        }
    }

    /// Whether this filter (or one nested in it) still needs chain resolution
    pub fn needs_resolution(&self) -> bool {
        match &self.kind {
            FilterKind::Chained(_) => true,
            FilterKind::SearchTerm(f) => f.needs_resolution(),
            _ => false,
        }
    }

    /// Resolve any chained properties via capped sub-queries
    ///
    /// Filters without chains resolve to themselves. The negation and
    /// post-filter flags carry over to the resolved filter.
    pub fn resolve(
        &self,
        client: &dyn SearchClient,
        index: &str,
        max_size: u64,
    ) -> Result<Filter> {
        let resolved = match &self.kind {
            FilterKind::Chained(f) => f.resolve(client, index, max_size)?,
            FilterKind::SearchTerm(f) => {
                Filter::new(FilterKind::SearchTerm(f.resolve(client, index, max_size)?))
            }
            _ => return Ok(self.clone()),
        };
        Ok(resolved
            .negated(self.negated)
            .post_filter(self.post_filter))
    }

    /// Compile to a boolean fragment, applying the negation envelope
    ///
    /// Pure: compiling twice yields the same document. Unresolved chains are
    /// an error, never an implicit network call.
    pub fn compile(&self) -> Result<Value> {
        let fragment = match &self.kind {
            FilterKind::Value(f) => f.compile(),
            FilterKind::Values(f) => f.compile(),
            FilterKind::Range(f) => f.compile(),
            FilterKind::Fuzzy(f) => f.compile(),
            FilterKind::Text(f) => f.compile(),
            FilterKind::HasProperty(f) => f.compile(),
            FilterKind::Page(f) => f.compile(),
            FilterKind::SearchTerm(f) => f.compile()?,
            FilterKind::Chained(f) => {
                return Err(FacetqlError::UnresolvedChain(f.property().name().to_string()))
            }
        };
        Ok(if self.negated {
            json!({ "bool": { "must_not": [fragment] } })
        } else {
            json!({ "bool": { "must": [fragment] } })
        })
    }
}

impl From<ValueFilter> for Filter {
    fn from(f: ValueFilter) -> Self {
        Filter::new(FilterKind::Value(f))
    }
}

impl From<ValuesFilter> for Filter {
    fn from(f: ValuesFilter) -> Self {
        Filter::new(FilterKind::Values(f))
    }
}

impl From<RangeFilter> for Filter {
    fn from(f: RangeFilter) -> Self {
        Filter::new(FilterKind::Range(f))
    }
}

impl From<FuzzyFilter> for Filter {
    fn from(f: FuzzyFilter) -> Self {
        Filter::new(FilterKind::Fuzzy(f))
    }
}

impl From<TextFilter> for Filter {
    fn from(f: TextFilter) -> Self {
        Filter::new(FilterKind::Text(f))
    }
}

impl From<HasPropertyFilter> for Filter {
    fn from(f: HasPropertyFilter) -> Self {
        Filter::new(FilterKind::HasProperty(f))
    }
}

impl From<PageFilter> for Filter {
    fn from(f: PageFilter) -> Self {
        Filter::new(FilterKind::Page(f))
    }
}

impl From<ChainedFilter> for Filter {
    fn from(f: ChainedFilter) -> Self {
        Filter::new(FilterKind::Chained(f))
    }
}

impl From<SearchTermFilter> for Filter {
    fn from(f: SearchTermFilter) -> Self {
        Filter::new(FilterKind::SearchTerm(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DataType, MemoryPropertyStore, PropertyFieldMapper};

    fn value_filter() -> Filter {
        let store = MemoryPropertyStore::new().with_property("Age", 2, DataType::Number);
        let mapper = PropertyFieldMapper::resolve(&store, "Age").unwrap();
        Filter::from(ValueFilter::new(mapper, 42))
    }

    #[test]
    fn test_negation_changes_only_the_envelope() {
        let plain = value_filter().compile().unwrap();
        let negated = value_filter().negated(true).compile().unwrap();
        assert_eq!(plain["bool"]["must"], negated["bool"]["must_not"]);
        assert!(plain["bool"].get("must_not").is_none());
        assert!(negated["bool"].get("must").is_none());
    }

    #[test]
    fn test_post_filter_flag_does_not_change_the_fragment() {
        let plain = value_filter().compile().unwrap();
        let post = value_filter().post_filter(true).compile().unwrap();
        assert_eq!(plain, post);
    }

    #[test]
    fn test_unresolved_chain_compile_is_an_error() {
        let store = MemoryPropertyStore::new()
            .with_property("Author", 3, DataType::Page)
            .with_property("Name", 9, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Author.Name").unwrap();
        let inner = Filter::from(ValueFilter::new(mapper.clone(), "Melville"));
        let filter = Filter::from(ChainedFilter::new(mapper, inner));
        assert!(matches!(
            filter.compile(),
            Err(FacetqlError::UnresolvedChain(_))
        ));
    }

    #[test]
    fn test_chained_target_is_the_leftmost_property() {
        let store = MemoryPropertyStore::new()
            .with_property("Author", 3, DataType::Page)
            .with_property("Name", 9, DataType::Text);
        let mapper = PropertyFieldMapper::resolve(&store, "Author.Name").unwrap();
        let inner = Filter::from(ValueFilter::new(mapper.clone(), "Melville"));
        let filter = Filter::from(ChainedFilter::new(mapper, inner));
        assert_eq!(filter.target_property(), Some("Author"));
    }
}
