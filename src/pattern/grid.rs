//! Fixed-size brightness grid.
//!
//! A [`Grid`] holds 625 brightness values (25×25, row-major). It is a plain
//! value: cloning yields an independent copy, so a snapshot handed to a
//! background send never aliases the pattern being edited.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use super::level::{Level, quantize};

// ============================================================================
// Constants
// ============================================================================

/// Width and height of the matrix.
pub const GRID_SIZE: usize = 25;

/// Number of cells in the matrix.
pub const TOTAL_PIXELS: usize = GRID_SIZE * GRID_SIZE;

// ============================================================================
// Grid
// ============================================================================

/// 25×25 brightness grid, row-major, values `0..=255`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [u8; TOTAL_PIXELS],
}

// ============================================================================
// Constructors
// ============================================================================

impl Grid {
    /// Creates a grid with every LED off.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self::filled(0)
    }

    /// Creates a grid with every cell set to `brightness`.
    #[inline]
    #[must_use]
    pub const fn filled(brightness: u8) -> Self {
        Self {
            cells: [brightness; TOTAL_PIXELS],
        }
    }

    /// Creates a grid from a slice of any length.
    ///
    /// Missing cells are zero, extra values are ignored.
    #[must_use]
    pub fn from_slice(values: &[u8]) -> Self {
        let mut grid = Self::empty();
        let len = values.len().min(TOTAL_PIXELS);
        grid.cells[..len].copy_from_slice(&values[..len]);
        grid
    }

    /// Creates a grid from quantized levels, zero-filling missing cells.
    #[must_use]
    pub fn from_levels(levels: impl IntoIterator<Item = Level>) -> Self {
        let mut grid = Self::empty();
        for (cell, level) in grid.cells.iter_mut().zip(levels) {
            *cell = level.to_brightness();
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<[u8; TOTAL_PIXELS]> for Grid {
    fn from(cells: [u8; TOTAL_PIXELS]) -> Self {
        Self { cells }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Grid {
    /// Returns the brightness at `index`, or 0 when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> u8 {
        self.cells.get(index).copied().unwrap_or(0)
    }

    /// Returns the brightness at (`row`, `col`), or 0 when out of range.
    #[inline]
    #[must_use]
    pub fn get_at(&self, row: usize, col: usize) -> u8 {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return 0;
        }
        self.cells[row * GRID_SIZE + col]
    }

    /// Sets the brightness at `index`.
    ///
    /// Returns `false` and leaves the grid untouched when out of range.
    #[inline]
    pub fn set(&mut self, index: usize, brightness: u8) -> bool {
        match self.cells.get_mut(index) {
            Some(cell) => {
                *cell = brightness;
                true
            }
            None => false,
        }
    }

    /// Returns a copy with one cell changed.
    ///
    /// This is how a paint stroke updates the current pattern.
    #[must_use]
    pub fn with_pixel(&self, index: usize, brightness: u8) -> Self {
        let mut next = self.clone();
        next.set(index, brightness);
        next
    }

    /// Returns the cells as a slice of exactly [`TOTAL_PIXELS`] values.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Iterates the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(GRID_SIZE)
    }

    /// Returns `true` if every LED is off.
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&b| b == 0)
    }

    /// Number of cells with non-zero brightness.
    #[inline]
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&b| b != 0).count()
    }

    /// Returns a copy with every cell snapped to its 16-level value.
    #[must_use]
    pub fn quantized(&self) -> Self {
        let mut cells = self.cells;
        for cell in &mut cells {
            *cell = quantize(*cell);
        }
        Self { cells }
    }

    /// Returns `true` if every cell already holds a 16-level value.
    #[must_use]
    pub fn is_quantized(&self) -> bool {
        self.cells.iter().all(|&b| quantize(b) == b)
    }
}

impl AsRef<[u8]> for Grid {
    fn as_ref(&self) -> &[u8] {
        &self.cells
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("lit", &self.lit_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
