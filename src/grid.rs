use std::cmp::min;

use itertools::iproduct;

use crate::Cell;

/// Fixed board geometry. Cells are `(row, col)` pairs.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    height: usize,
    width: usize,
}
impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, (row, col): Cell) -> bool {
        row < self.height && col < self.width
    }

    /// The in-bounds cells touching `cell` (not including `cell` itself), in
    /// row-major order. Empty if `cell` is off the grid.
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let grid = *self;
        let (row, col) = cell;
        let last_row = min(row.saturating_add(1), self.height.saturating_sub(1));
        let last_col = min(col.saturating_add(1), self.width.saturating_sub(1));
        let rows = row.saturating_sub(1)..=last_row;
        let cols = col.saturating_sub(1)..=last_col;
        iproduct!(rows, cols)
            .filter(move |&other| other != cell && grid.contains(cell) && grid.contains(other))
    }

    /// Every cell, in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(0..self.height, 0..self.width)
    }
}
