//! LCR assembly protocols: plate layouts and worklist generation per variant.

pub mod params;
pub mod run;

pub use params::{PhosphoParams, ProtocolParams, ProtocolVariant, ReactionParams};
pub use run::{AssemblyRun, RunSummary, Stage};

use lcr_core::{LayoutError, WorklistError};
use lcr_formats::WriteError;
use lcr_registry::ClassifyError;
use thiserror::Error;

// Plates
pub const MASTERMIX_TROUGH: &str = "MastermixTrough";
pub const COMPONENTS_PLATE: &str = "components";
pub const DOMINO_POOLS_PLATE: &str = "domino_pools";
pub const PHOSPHO_PLATE: &str = "phospho";
pub const LCR_PLATE: &str = "lcr";

// Reagents
pub const LGR_MASTERMIX: &str = "lgr-mastermix";
pub const AMPLIGASE: &str = "ampligase";
pub const PNK_MASTERMIX: &str = "pnk-mastermix";
pub const PNK: &str = "pnk";

/// A run aborted in `stage`.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct ProtocolError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("no assemblies to plan")]
    NoAssemblies,
    #[error("run already aborted by an earlier failure")]
    Aborted,
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Worklist(#[from] WorklistError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
