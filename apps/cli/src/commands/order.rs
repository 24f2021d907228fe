use anyhow::{Context, Result};
use lcr_formats::write_order_file;
use lcr_registry::PartClassifier;
use tracing::info;

use crate::args::OrderArgs;
use crate::commands::open_registry;
use crate::settings::Settings;

/// Write the de-duplicated, id-sorted parts of the given assemblies.
pub fn order(settings: &Settings, args: OrderArgs) -> Result<()> {
    let registry_path = args.registry.unwrap_or_else(|| settings.registry.clone());
    let mut classifier = PartClassifier::new(open_registry(&registry_path)?);

    let components = classifier.order(&args.assemblies)?;
    write_order_file(&args.out, &components)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;

    info!(parts = components.len(), path = %args.out.display(), "order written");
    println!("{} parts written to {}", components.len(), args.out.display());
    Ok(())
}
