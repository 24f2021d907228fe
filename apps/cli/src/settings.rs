//! Layered configuration: optional `lcr.toml`, then `LCR__*` environment
//! variables. Command-line flags are applied on top by each command.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use lcr_core::{LayoutError, PlateGeometry};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = "lcr";
const ENV_PREFIX: &str = "LCR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Part registry: a `.json` entry list or a SQLite database.
    pub registry: PathBuf,
    pub output_dir: PathBuf,
    pub plate: PlateSettings,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("registry.db"),
            output_dir: PathBuf::from("assembly"),
            plate: PlateSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlateSettings {
    pub rows: usize,
    pub cols: usize,
}

impl Default for PlateSettings {
    fn default() -> Self {
        let geometry = PlateGeometry::default();
        Self {
            rows: geometry.rows,
            cols: geometry.cols,
        }
    }
}

impl Settings {
    /// Load from `path` (required) or from `./lcr.toml` when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: Option<&Path>, environment: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Plate geometry with optional command-line overrides.
    pub fn geometry(
        &self,
        rows: Option<usize>,
        cols: Option<usize>,
    ) -> Result<PlateGeometry, LayoutError> {
        PlateGeometry::new(rows.unwrap_or(self.plate.rows), cols.unwrap_or(self.plate.cols))
    }
}
