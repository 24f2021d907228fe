use anyhow::{bail, Context, Result};
use lcr_registry::db::seed_demo;
use lcr_registry::seed_data::demo_assembly_ids;
use lcr_registry::SqliteRegistry;
use tracing::info;

use crate::args::SeedArgs;
use crate::settings::Settings;

pub fn seed(settings: &Settings, args: SeedArgs) -> Result<()> {
    let path = args.registry.unwrap_or_else(|| settings.registry.clone());
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        bail!("Seeding needs a SQLite registry, got {}", path.display());
    }

    let registry = SqliteRegistry::open(&path)
        .with_context(|| format!("Failed to open registry {}", path.display()))?;
    let inserted = seed_demo(registry.connection())?;
    info!(path = %path.display(), inserted, "seeded registry");

    println!(
        "{inserted} entries added to {}; demo assemblies: {}",
        path.display(),
        demo_assembly_ids().join(" ")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcr_registry::db::list_entries;

    #[test]
    fn test_seed_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("registry.db");
        let settings = Settings::default();

        seed(&settings, SeedArgs { registry: Some(db.clone()) }).unwrap();
        seed(&settings, SeedArgs { registry: Some(db.clone()) }).unwrap();

        let registry = SqliteRegistry::open(&db).unwrap();
        let entries = list_entries(registry.connection()).unwrap();
        assert_eq!(entries.len(), lcr_registry::seed_data::demo_entries().len());
    }

    #[test]
    fn test_seed_rejects_json() {
        let tmp = tempfile::tempdir().unwrap();
        let args = SeedArgs {
            registry: Some(tmp.path().join("parts.json")),
        };
        assert!(seed(&Settings::default(), args).is_err());
    }
}
