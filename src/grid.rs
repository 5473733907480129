//! The 9x9 grid of byte cells behind the protocol.
//!
//! Cells are raw bytes: the wire carries cell values unencoded, so the store
//! does not interpret them. Indices are zero-based here; the wire is
//! one-based and the session layer converts at the boundary.
//!
//! # Example
//!
//! ```
//! use gridwire::grid::Grid;
//!
//! let mut grid = Grid::default();
//! grid.set(0, 8, 7);
//! assert_eq!(grid.get(0, 8), 7);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

/// Cells per side.
pub const GRID_SIZE: usize = 9;

/// A 9x9 matrix of byte cells, zero-initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u8; GRID_SIZE]; GRID_SIZE],
}

/// Shared handle to a grid observed by both the session and its embedder.
///
/// A std mutex, locked per access and never held across an await.
pub type SharedGrid = Arc<Mutex<Grid>>;

/// Lock a shared grid, recovering from a poisoned mutex.
///
/// Cell accesses are single reads or single assignments, so a panicking
/// lock holder cannot leave a torn state behind.
pub fn lock_grid(grid: &SharedGrid) -> MutexGuard<'_, Grid> {
    grid.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Grid {
    /// Create an empty grid (all cells zero).
    pub fn new() -> Self {
        Self {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Create a grid from a full cell matrix, row-major.
    pub fn from_cells(cells: [[u8; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// Wrap the grid in a [`SharedGrid`] handle.
    pub fn into_shared(self) -> SharedGrid {
        Arc::new(Mutex::new(self))
    }

    /// Read one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 9 or more.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Write one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 9 or more.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    /// Borrow the full cell matrix, row-major.
    #[inline]
    pub fn cells(&self) -> &[[u8; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Borrow one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is 9 or more.
    #[inline]
    pub fn row(&self, row: usize) -> &[u8; GRID_SIZE] {
        &self.cells[row]
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    /// Box-drawn render with `_` for zero cells and rules between 3x3 bands.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---------------------------")?;
        for (i, row) in self.cells.iter().enumerate() {
            write!(f, "{} | ", i + 1)?;
            for (j, &value) in row.iter().enumerate() {
                if value == 0 {
                    write!(f, "_ ")?;
                } else {
                    write!(f, "{} ", value)?;
                }
                if (j + 1) % 3 == 0 && (j + 1) != GRID_SIZE {
                    write!(f, "| ")?;
                }
            }
            write!(f, "|")?;
            if (i + 1) % 3 == 0 && (i + 1) != GRID_SIZE {
                write!(f, "\n===========================")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "---------------------------")?;
        write!(f, "  | 1 2 3 | 4 5 6 | 7 8 9 |")
    }
}
