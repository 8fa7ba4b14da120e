//! Shrinking play field dimensions
//!
//! Only the row/column counts are tracked. Cells have no identity in the core,
//! so removing a row or column is just a decrement.

use serde::{Deserialize, Serialize};

/// Remaining rows and columns of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub cols: u32,
    /// Size restored by `reset` (square grid)
    initial_size: u32,
}

impl GridDimensions {
    /// Create a square grid. A size of 0 is raised to 1.
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        Self {
            rows: size,
            cols: size,
            initial_size: size,
        }
    }

    pub fn initial_size(&self) -> u32 {
        self.initial_size
    }

    /// Restore the grid to its initial square size
    pub fn reset(&mut self) {
        self.rows = self.initial_size;
        self.cols = self.initial_size;
    }

    /// Drop one row (no-op at 1)
    pub fn remove_row(&mut self) {
        if self.rows > 1 {
            self.rows -= 1;
        }
    }

    /// Drop one column (no-op at 1)
    pub fn remove_column(&mut self) {
        if self.cols > 1 {
            self.cols -= 1;
        }
    }

    pub fn is_one_by_one(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Whether (row, col) addresses a cell of the current field
    #[inline]
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }
}
