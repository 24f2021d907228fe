//! Well allocation and worklist planning for LCR DNA assembly on a
//! liquid-handling robot.

pub mod component;
pub mod merge;
pub mod plate;
pub mod wells;
pub mod worklist;

pub use component::*;
pub use plate::{well_label, PlateGeometry};
pub use wells::*;
pub use worklist::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Plate {plate_id} needs {requested} wells but holds only {capacity}")]
    CapacityExceeded {
        plate_id: String,
        requested: usize,
        capacity: usize,
    },
    #[error("Duplicate component key '{key}' on plate {plate_id}")]
    DuplicateKey { plate_id: String, key: String },
    #[error("No well assigned to component '{key}'")]
    MissingComponent { key: String },
    #[error("No well for component '{key}' at destination {destination}")]
    MissingDestination { key: String, destination: usize },
    #[error("Well index {index} outside plate of {capacity} wells")]
    WellOutOfRange { index: usize, capacity: usize },
    #[error("Invalid plate geometry: {rows} rows x {cols} columns")]
    InvalidGeometry { rows: usize, cols: usize },
}

#[derive(Debug, Error)]
pub enum WorklistError {
    #[error(
        "Negative volume {volume} of '{component}' for assembly {assembly_id} on plate {dest_plate}"
    )]
    VolumeBudget {
        dest_plate: String,
        assembly_id: String,
        component: String,
        volume: f64,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
