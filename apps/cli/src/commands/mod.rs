pub mod order;
pub mod run;
pub mod seed;

use std::path::Path;

use anyhow::{bail, Context, Result};
use lcr_registry::{MemoryRegistry, PartRegistry, SqliteRegistry};
use tracing::debug;

/// Open a registry by file type: `.json` entry lists are loaded into memory,
/// anything else is treated as an existing SQLite database.
pub fn open_registry(path: &Path) -> Result<Box<dyn PartRegistry>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let registry = MemoryRegistry::from_path(path)
            .with_context(|| format!("Failed to load registry {}", path.display()))?;
        debug!(path = %path.display(), entries = registry.len(), "loaded JSON registry");
        return Ok(Box::new(registry));
    }

    if !path.exists() {
        bail!(
            "Registry {} does not exist (create one with `lcr seed`)",
            path.display()
        );
    }
    let registry = SqliteRegistry::open(path)
        .with_context(|| format!("Failed to open registry {}", path.display()))?;
    debug!(path = %path.display(), "opened SQLite registry");
    Ok(Box::new(registry))
}
