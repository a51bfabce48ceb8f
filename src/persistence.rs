//! Configuration persistence boundary
//!
//! A configuration is stored as three flat relations keyed by page id. Saving
//! fully replaces the previous row set for that page.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{FacetqlError, Result};

/// Raw, unresolved form of a per-page configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    /// Facet property references, possibly `Name=Alias` pairs
    pub facet_properties: Vec<String>,
    /// Result property references, first one is the link target
    pub result_properties: Vec<String>,
    /// Named parameters as (name, value) pairs
    pub parameters: Vec<(String, String)>,
}

/// Load/save collaborator for per-page configurations
pub trait ConfigRepository {
    fn load(&self, page_id: u64) -> Result<Option<StoredConfig>>;

    /// Replace the stored configuration for a page (delete + reinsert)
    fn save(&self, page_id: u64, config: &StoredConfig) -> Result<()>;

    /// Delete a page's configuration, e.g. when the page itself is deleted
    fn delete(&self, page_id: u64) -> Result<()>;
}

/// In-memory repository
#[derive(Debug, Default)]
pub struct MemoryConfigRepository {
    configs: Mutex<HashMap<u64, StoredConfig>>,
}

impl MemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<u64, StoredConfig>>> {
        self.configs
            .lock()
            .map_err(|_| FacetqlError::Config("configuration store is poisoned".to_string()))
    }
}

impl ConfigRepository for MemoryConfigRepository {
    fn load(&self, page_id: u64) -> Result<Option<StoredConfig>> {
        Ok(self.lock()?.get(&page_id).cloned())
    }

    fn save(&self, page_id: u64, config: &StoredConfig) -> Result<()> {
        self.lock()?.insert(page_id, config.clone());
        Ok(())
    }

    fn delete(&self, page_id: u64) -> Result<()> {
        self.lock()?.remove(&page_id);
        Ok(())
    }
}
