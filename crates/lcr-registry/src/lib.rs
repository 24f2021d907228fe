//! Part-metadata registry access and assembly classification.

pub mod classify;
pub mod db;
pub mod entry;
pub mod memory;
pub mod seed_data;

pub use classify::{ClassifyError, PartClassifier};
pub use db::SqliteRegistry;
pub use entry::RegistryEntry;
pub use memory::MemoryRegistry;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry entry not found: {0}")]
    NotFound(String),
    #[error("Registry entry {id} has no {field}")]
    MissingMetadata { id: String, field: &'static str },
    #[error("Registry database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Malformed registry data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Description pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Source of part metadata, keyed by registry id.
pub trait PartRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError>;
}

impl<R: PartRegistry + ?Sized> PartRegistry for &R {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError> {
        (**self).fetch(id)
    }
}

impl<R: PartRegistry + ?Sized> PartRegistry for Box<R> {
    fn fetch(&self, id: &str) -> Result<RegistryEntry, RegistryError> {
        (**self).fetch(id)
    }
}
