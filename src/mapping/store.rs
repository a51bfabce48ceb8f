//! Property metadata lookup boundary
//!
//! The index is maintained by an external store that assigns each property a
//! numeric id and a datatype. The core only needs those two facts; everything
//! else about the store is opaque.

use std::collections::HashMap;

use crate::error::{FacetqlError, Result};
use crate::mapping::DataType;

/// Resolved metadata for one property
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Numeric property id assigned by the store
    pub id: u32,
    /// Datatype category of the property's values
    pub datatype: DataType,
}

/// Read-only lookup service for property metadata
pub trait PropertyStore {
    /// Resolve a human-readable label (or alias) to the canonical property key
    fn alias_to_key(&self, label: &str) -> Result<String>;

    /// Resolve a canonical property key to its id and datatype
    fn property_info(&self, key: &str) -> Result<PropertyInfo>;
}

/// In-memory property store
///
/// Backs unit tests and embedding scenarios where the property table is known
/// up front.
#[derive(Clone, Debug, Default)]
pub struct MemoryPropertyStore {
    aliases: HashMap<String, String>,
    properties: HashMap<String, PropertyInfo>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property under its canonical key
    pub fn with_property(mut self, key: impl Into<String>, id: u32, datatype: DataType) -> Self {
        self.properties
            .insert(key.into(), PropertyInfo { id, datatype });
        self
    }

    /// Register an alias for a canonical key
    pub fn with_alias(mut self, alias: impl Into<String>, key: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), key.into());
        self
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn alias_to_key(&self, label: &str) -> Result<String> {
        if let Some(key) = self.aliases.get(label) {
            return Ok(key.clone());
        }
        // Labels that are already canonical keys resolve to themselves
        if self.properties.contains_key(label) {
            return Ok(label.to_string());
        }
        Err(FacetqlError::PropertyResolution(label.to_string()))
    }

    fn property_info(&self, key: &str) -> Result<PropertyInfo> {
        self.properties
            .get(key)
            .copied()
            .ok_or_else(|| FacetqlError::PropertyResolution(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolution() {
        let store = MemoryPropertyStore::new()
            .with_property("Modification date", 29, DataType::Date)
            .with_alias("Geändert", "Modification date");

        assert_eq!(store.alias_to_key("Geändert").unwrap(), "Modification date");
        assert_eq!(
            store.alias_to_key("Modification date").unwrap(),
            "Modification date"
        );
    }

    #[test]
    fn test_unknown_property_is_an_error() {
        let store = MemoryPropertyStore::new();
        assert!(matches!(
            store.property_info("Nope"),
            Err(FacetqlError::PropertyResolution(_))
        ));
    }
}
