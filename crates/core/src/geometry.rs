//! Geometry module - cells, board dimensions and collision predicates
//!
//! Every higher component is built from these predicates. They are pure, total,
//! and work in grid units (one unit per cell, rows grow downward).

use serde::{Deserialize, Serialize};

use crate::settled::SettledCells;
use crate::types::{Color, BOARD_HEIGHT, BOARD_WIDTH};

/// One square of the grid.
///
/// Collision only ever looks at `(col, row)`. `id` is a stable identifier for
/// renderers that diff frames; the simulation never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
    pub color: Color,
    pub id: u64,
}

impl Cell {
    pub fn new(col: i32, row: i32, color: Color, id: u64) -> Self {
        Self { col, row, color, id }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.col, self.row)
    }

    /// Same cell moved by `(dx, dy)`; color and id are kept.
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            col: self.col + dx,
            row: self.row + dy,
            ..self
        }
    }

    pub fn same_position(&self, other: &Cell) -> bool {
        self.col == other.col && self.row == other.row
    }
}

/// Playfield size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn bottom_row(&self) -> i32 {
        self.height - 1
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(BOARD_WIDTH as i32, BOARD_HEIGHT as i32)
    }
}

/// The cell sits on the floor row (or below it).
#[inline]
pub fn is_at_bottom_edge(dims: Dimensions, cell: &Cell) -> bool {
    cell.row >= dims.bottom_row()
}

/// Same row, columns exactly one apart, in either order.
#[inline]
pub fn horizontally_adjacent(a: &Cell, b: &Cell) -> bool {
    a.row == b.row && (a.col - b.col).abs() == 1
}

/// `top` rests directly on `bottom`.
///
/// Directional: callers pass a moving cell as `top` and a settled cell as
/// `bottom`, so a piece is never held up by cells hanging above it.
#[inline]
pub fn vertically_stacked(top: &Cell, bottom: &Cell) -> bool {
    top.col == bottom.col && top.row + 1 == bottom.row
}

/// Inside the side walls and not below the floor. There is no ceiling.
#[inline]
pub fn in_bounds(dims: Dimensions, cell: &Cell) -> bool {
    cell.col >= 0 && cell.col <= dims.width - 1 && cell.row <= dims.bottom_row()
}

/// A settled cell already holds this coordinate.
#[inline]
pub fn occupied(settled: &SettledCells, cell: &Cell) -> bool {
    settled.contains(cell.col, cell.row)
}
