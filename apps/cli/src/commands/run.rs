use anyhow::{Context, Result};
use lcr_formats::OutputDir;
use lcr_protocol::AssemblyRun;
use tracing::info;

use crate::args::RunArgs;
use crate::commands::open_registry;
use crate::settings::Settings;

pub fn run(settings: &Settings, args: RunArgs) -> Result<()> {
    let registry_path = args.registry.unwrap_or_else(|| settings.registry.clone());
    let out = args.out.unwrap_or_else(|| settings.output_dir.clone());
    let geometry = settings.geometry(args.rows, args.cols)?;

    let registry = open_registry(&registry_path)?;
    let output = OutputDir::recreate(&out, geometry)
        .with_context(|| format!("Failed to prepare output directory {}", out.display()))?;

    let summary = AssemblyRun::new(args.protocol, registry, args.assemblies, output).run()?;
    info!(run_id = %summary.run_id, rows = summary.worklist_rows, "worklists written");

    println!(
        "{} run {} planned {} assemblies ({} worklist rows)",
        summary.variant, summary.run_id, summary.assemblies, summary.worklist_rows
    );
    for file in &summary.files {
        println!("  {}", file.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::SeedArgs;
    use crate::commands::seed::seed;
    use lcr_protocol::ProtocolVariant;
    use lcr_registry::seed_data::demo_assembly_ids;
    use std::path::PathBuf;

    fn run_args(protocol: ProtocolVariant, registry: PathBuf, out: PathBuf) -> RunArgs {
        RunArgs {
            protocol,
            registry: Some(registry),
            out: Some(out),
            rows: None,
            cols: None,
            assemblies: demo_assembly_ids(),
        }
    }

    #[test]
    fn test_seed_then_run() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("registry.db");
        let out = tmp.path().join("assembly");
        let settings = Settings::default();

        seed(&settings, SeedArgs { registry: Some(db.clone()) }).unwrap();
        run(&settings, run_args(ProtocolVariant::PhosphoLcr, db, out.clone())).unwrap();

        for file in [
            "MastermixTrough.csv",
            "components.csv",
            "domino_pools.csv",
            "domino_pools_worklist.csv",
            "phospho.csv",
            "phospho_worklist.csv",
            "lcr_worklist.csv",
        ] {
            assert!(out.join(file).exists(), "missing {file}");
        }
    }

    #[test]
    fn test_missing_registry() {
        let tmp = tempfile::tempdir().unwrap();
        let args = run_args(
            ProtocolVariant::Lcr,
            tmp.path().join("nope.db"),
            tmp.path().join("assembly"),
        );
        let err = run(&Settings::default(), args).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!tmp.path().join("nope.db").exists());
    }
}
