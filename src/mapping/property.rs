//! Property field mapper
//!
//! Resolves a human-readable property reference into the concrete index field
//! it is stored under, including weight suffixes (`Title^3`) and dot-separated
//! property chains (`Author.Employer`).

use crate::error::Result;
use crate::mapping::store::PropertyStore;
use crate::mapping::DataType;

/// Properties the index defines itself, outside the property table
///
/// Their field key is the name with `-` replaced by `.`.
const INTERNAL_PROPERTIES: &[(&str, DataType, InternalCapabilities)] = &[
    ("text_raw", DataType::Text, InternalCapabilities { keyword: false, search: true, fast_vector: true }),
    ("text_copy", DataType::Text, InternalCapabilities { keyword: false, search: true, fast_vector: true }),
    ("attachment-title", DataType::Text, InternalCapabilities { keyword: false, search: true, fast_vector: false }),
    ("attachment-content", DataType::Text, InternalCapabilities { keyword: false, search: true, fast_vector: false }),
    ("subject-title", DataType::Text, InternalCapabilities { keyword: true, search: true, fast_vector: false }),
    ("subject-subject", DataType::Text, InternalCapabilities { keyword: true, search: false, fast_vector: false }),
    ("subject-namespace", DataType::Number, InternalCapabilities { keyword: false, search: false, fast_vector: false }),
    ("subject-namespacename", DataType::Text, InternalCapabilities { keyword: true, search: false, fast_vector: false }),
    ("subject-sortkey", DataType::Text, InternalCapabilities { keyword: true, search: false, fast_vector: false }),
];

#[derive(Clone, Copy, Debug)]
struct InternalCapabilities {
    keyword: bool,
    search: bool,
    fast_vector: bool,
}

fn internal_property(name: &str) -> Option<&'static (&'static str, DataType, InternalCapabilities)> {
    INTERNAL_PROPERTIES.iter().find(|(n, _, _)| *n == name)
}

/// One resolved property reference
///
/// Immutable once constructed. A mapper built from `A.B` represents `B` and
/// holds the mapper for `A` as its chained predecessor.
#[derive(Clone, Debug)]
pub struct PropertyFieldMapper {
    name: String,
    field: String,
    datatype: DataType,
    id: Option<u32>,
    internal: bool,
    weight: u32,
    has_keyword: bool,
    has_search: bool,
    fast_vector: bool,
    chained: Option<Box<PropertyFieldMapper>>,
}

impl PropertyFieldMapper {
    /// Resolve a property reference against the metadata store
    ///
    /// Fails with [`crate::FacetqlError::PropertyResolution`] when the store
    /// does not know the property or any link of its chain.
    pub fn resolve(store: &dyn PropertyStore, reference: &str) -> Result<Self> {
        let (name, weight) = parse_weight(reference);

        // Resolve the chain front-to-back: `A.B.C` resolves `A.B` first.
        let (chained, name) = match name.rsplit_once('.') {
            Some((prefix, last)) if !prefix.is_empty() && !last.is_empty() => {
                let predecessor = Self::resolve(store, prefix)?;
                (Some(Box::new(predecessor)), last)
            }
            _ => (None, name),
        };

        let mut mapper = if let Some((_, datatype, caps)) = internal_property(name) {
            PropertyFieldMapper {
                name: name.to_string(),
                field: name.replace('-', "."),
                datatype: *datatype,
                id: None,
                internal: true,
                weight,
                has_keyword: caps.keyword,
                has_search: caps.search,
                fast_vector: caps.fast_vector,
                chained: None,
            }
        } else {
            let key = store.alias_to_key(name)?;
            let info = store.property_info(&key)?;
            PropertyFieldMapper {
                name: name.to_string(),
                field: format!("P:{}.{}", info.id, info.datatype.field_suffix()),
                datatype: info.datatype,
                id: Some(info.id),
                internal: false,
                weight,
                has_keyword: info.datatype.has_keyword_subfield(),
                has_search: info.datatype.has_search_subfield(),
                fast_vector: info.datatype.supports_fast_vector_highlighter(),
                chained: None,
            }
        };
        mapper.chained = chained;
        Ok(mapper)
    }

    /// Property name, without weight suffix or chain prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw index field the property is stored under
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Exact-match subfield, when the datatype provides one
    pub fn keyword_field(&self) -> Option<String> {
        self.has_keyword.then(|| format!("{}.keyword", self.field))
    }

    /// Analyzed search subfield, when the datatype provides one
    pub fn search_field(&self) -> Option<String> {
        self.has_search.then(|| format!("{}.search", self.field))
    }

    /// Field used to match a page reference by document identity
    ///
    /// Only meaningful for page-typed properties; other datatypes fall back to
    /// the raw field.
    pub fn page_id_field(&self) -> String {
        match self.datatype {
            DataType::Page => format!("{}.wpgID", strip_suffix_field(&self.field)),
            _ => self.field.clone(),
        }
    }

    /// Field reference with the weight suffix applied, for multi-field queries
    pub fn weighted_field(&self) -> String {
        if self.weight == 1 {
            self.field.clone()
        } else {
            format!("{}^{}", self.field, self.weight)
        }
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    /// Numeric property id; absent for internal properties
    pub fn property_id(&self) -> Option<u32> {
        self.id
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn supports_fast_vector_highlighter(&self) -> bool {
        self.fast_vector
    }

    /// Reconstruct the reference this mapper was resolved from
    pub fn reference(&self) -> String {
        let name = match &self.chained {
            Some(predecessor) => format!("{}.{}", predecessor.reference(), self.name),
            None => self.name.clone(),
        };
        if self.weight == 1 {
            name
        } else {
            format!("{}^{}", name, self.weight)
        }
    }

    /// Predecessor mapper when this property was referenced through a chain
    pub fn chained(&self) -> Option<&PropertyFieldMapper> {
        self.chained.as_deref()
    }

    pub fn is_chained(&self) -> bool {
        self.chained.is_some()
    }
}

/// Split a trailing `^N` weight off a property reference
///
/// A non-numeric suffix is part of the name, not a weight.
fn parse_weight(reference: &str) -> (&str, u32) {
    match reference.rsplit_once('^') {
        Some((name, suffix)) if !name.is_empty() => match suffix.parse::<u32>() {
            Ok(weight) => (name, weight),
            Err(_) => (reference, 1),
        },
        _ => (reference, 1),
    }
}

/// Drop the datatype suffix from a `P:<id>.<suffix>` field
fn strip_suffix_field(field: &str) -> &str {
    field.rsplit_once('.').map(|(prefix, _)| prefix).unwrap_or(field)
}
