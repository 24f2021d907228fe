use serde::{Deserialize, Serialize};

use crate::LayoutError;

pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 12;

/// Row and column counts of a microplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateGeometry {
    pub rows: usize,
    pub cols: usize,
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl PlateGeometry {
    pub fn new(rows: usize, cols: usize) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidGeometry { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn well_label(&self, index: usize) -> Result<String, LayoutError> {
        well_label(index, self.rows, self.cols)
    }
}

impl std::fmt::Display for PlateGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Convert a zero-based well index to its plate coordinate label.
///
/// Wells are numbered column-major: on an 8x12 plate index 0 is `A1`,
/// index 1 is `B1` and index 8 is `A2`.
pub fn well_label(index: usize, rows: usize, cols: usize) -> Result<String, LayoutError> {
    if rows == 0 || cols == 0 {
        return Err(LayoutError::InvalidGeometry { rows, cols });
    }
    let capacity = rows * cols;
    if index >= capacity {
        return Err(LayoutError::WellOutOfRange { index, capacity });
    }
    Ok(format!("{}{}", row_letters(index % rows), index / rows + 1))
}

/// Spreadsheet-style row letters: A..Z, AA, AB, ...
fn row_letters(row: usize) -> String {
    let mut n = row + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
