use std::collections::{BTreeMap, HashMap};

use lcr_core::{Component, PartRole, Pool, Pools};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::entry::RegistryEntry;
use crate::{PartRegistry, RegistryError};

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Assembly {0} listed more than once")]
    DuplicateAssembly(String),
    #[error("Registry lookup failed for assembly {assembly_id}: {source}")]
    Registry {
        assembly_id: String,
        #[source]
        source: RegistryError,
    },
}

/// Resolves assemblies into classified part pools.
///
/// Every registry lookup is memoised for the lifetime of the classifier, so
/// each unique id is fetched at most once per run.
#[derive(Debug)]
pub struct PartClassifier<R> {
    registry: R,
    cache: HashMap<String, RegistryEntry>,
}

impl<R: PartRegistry> PartClassifier<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            cache: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Number of distinct ids fetched so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Fetch an entry, going to the registry only on a cache miss.
    pub fn entry(&mut self, id: &str) -> Result<&RegistryEntry, RegistryError> {
        if !self.cache.contains_key(id) {
            let entry = self.registry.fetch(id)?;
            self.cache.insert(id.to_string(), entry);
        } else {
            trace!(id, "registry cache hit");
        }
        self.cache
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Pools for `assembly_ids`, in the given order.
    pub fn classify(&mut self, assembly_ids: &[String]) -> Result<Pools, ClassifyError> {
        let mut pools = Pools::new();
        for assembly_id in assembly_ids {
            if pools.contains(assembly_id) {
                return Err(ClassifyError::DuplicateAssembly(assembly_id.clone()));
            }
            let pool = self.pool(assembly_id).map_err(|source| ClassifyError::Registry {
                assembly_id: assembly_id.clone(),
                source,
            })?;
            debug!(
                assembly_id = assembly_id.as_str(),
                parts = pool.parts.len(),
                dominoes = pool.dominoes.len(),
                backbone = pool.backbone.len(),
                "classified assembly"
            );
            pools.insert(assembly_id.clone(), pool);
        }
        Ok(pools)
    }

    /// Every part used by `assembly_ids`, once each, sorted by id.
    pub fn order(&mut self, assembly_ids: &[String]) -> Result<Vec<Component>, ClassifyError> {
        let mut parts: BTreeMap<String, Component> = BTreeMap::new();
        for assembly_id in assembly_ids {
            let components =
                self.linked_components(assembly_id)
                    .map_err(|source| ClassifyError::Registry {
                        assembly_id: assembly_id.clone(),
                        source,
                    })?;
            for component in components {
                parts.entry(component.id.clone()).or_insert(component);
            }
        }
        Ok(parts.into_values().collect())
    }

    fn pool(&mut self, assembly_id: &str) -> Result<Pool, RegistryError> {
        let mut pool = Pool::default();
        for component in self.linked_components(assembly_id)? {
            if component.role() == PartRole::Backbone {
                if let Some(tag) = component.subtype.as_deref().filter(|t| !is_backbone_tag(t)) {
                    warn!(
                        assembly_id,
                        part_id = component.id.as_str(),
                        subtype = tag,
                        "unrecognised part type, treating as backbone"
                    );
                }
            }
            pool.push(component);
        }
        Ok(pool)
    }

    fn linked_components(&mut self, assembly_id: &str) -> Result<Vec<Component>, RegistryError> {
        let linked = self.entry(assembly_id)?.linked_parts()?.to_vec();
        linked
            .iter()
            .map(|id| self.entry(id).and_then(RegistryEntry::to_component))
            .collect()
    }
}

fn is_backbone_tag(tag: &str) -> bool {
    tag.is_empty() || tag.eq_ignore_ascii_case("backbone") || tag.eq_ignore_ascii_case("vector")
}
