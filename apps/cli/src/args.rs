//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lcr_protocol::ProtocolVariant;

#[derive(Debug, Parser)]
#[command(name = "lcr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Plan liquid-handling worklists for LCR DNA assembly")]
pub struct Cli {
    /// Configuration file (defaults to ./lcr.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lay out plates and write worklists for a set of assemblies
    Run(RunArgs),
    /// Export the unique parts of a set of assemblies as CSV
    Order(OrderArgs),
    /// Create a SQLite registry holding the demo assemblies
    Seed(SeedArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Protocol variant: lcr or phospho-lcr
    #[arg(short, long, default_value = "lcr")]
    pub protocol: ProtocolVariant,
    /// Registry file (.json or SQLite)
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// Output directory, recreated on every run
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub rows: Option<usize>,
    #[arg(long)]
    pub cols: Option<usize>,
    /// Assembly registry ids, in destination-well order
    #[arg(required = true)]
    pub assemblies: Vec<String>,
}

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[arg(long)]
    pub registry: Option<PathBuf>,
    /// CSV file to write
    #[arg(short, long)]
    pub out: PathBuf,
    #[arg(required = true)]
    pub assemblies: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// SQLite file to create or extend
    #[arg(long)]
    pub registry: Option<PathBuf>,
}
