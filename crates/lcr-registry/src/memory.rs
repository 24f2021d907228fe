use std::collections::HashMap;
use std::path::Path;

use tracing::trace;

use crate::entry::RegistryEntry;
use crate::{PartRegistry, RegistryError};

/// Registry held entirely in memory, typically loaded from a JSON export.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RegistryEntry> = serde_json::from_str(json)?;
        Ok(entries.into_iter().collect())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, entry: RegistryEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RegistryEntry> for MemoryRegistry {
    fn from_iter<I: IntoIterator<Item = RegistryEntry>>(iter: I) -> Self {
        let mut registry = Self::new();
        for entry in iter {
            registry.insert(entry);
        }
        registry
    }
}

impl PartRegistry for MemoryRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError> {
        trace!(id, "memory registry lookup");
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }
}
