//! CSV output for a planning run: plate maps, worklists and parts orders.

pub mod order;
pub mod output;

pub use order::{write_order, write_order_file, ORDER_COLUMNS};
pub use output::OutputDir;

use lcr_core::LayoutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
