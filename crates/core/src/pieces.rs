//! Pieces module - spawn layouts, kick tables and the Piece value
//!
//! Kick tables are the SRS tables with the Y component negated, since rows grow
//! downward here. Transition indices follow the order
//! 0->1, 0->3, 1->0, 1->2, 2->1, 2->3, 3->2, 3->0.

use serde::Serialize;

use crate::geometry::{in_bounds, occupied, Cell, Dimensions};
use crate::settled::SettledCells;
use crate::types::{Rotation, Shape, PIECE_SIZE};

/// `(dx, dy)` in grid units.
pub type Offset = (i32, i32);

/// Per-shape spawn offsets from the anchor. Index 0 is the rotation pivot.
pub fn spawn_layout(shape: Shape) -> [Offset; PIECE_SIZE] {
    match shape {
        Shape::I => [(1, 0), (0, 0), (2, 0), (3, 0)],
        Shape::J => [(1, 1), (0, 0), (0, 1), (2, 1)],
        Shape::L => [(1, 1), (0, 1), (2, 1), (2, 0)],
        Shape::O => [(0, 1), (0, 0), (1, 0), (1, 1)],
        Shape::S => [(1, 1), (0, 1), (1, 0), (2, 0)],
        Shape::T => [(1, 1), (0, 1), (1, 0), (2, 1)],
        Shape::Z => [(1, 1), (0, 0), (1, 0), (2, 1)],
    }
}

/// Wall kick data for J, L, S, T, Z.
static JLSTZ_KICKS: [[Offset; 4]; 8] = [
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)], // 0->1
    [(1, 0), (1, -1), (0, 2), (1, 2)],    // 0->3
    [(1, 0), (1, 1), (0, -2), (1, -2)],   // 1->0
    [(1, 0), (1, 1), (0, -2), (1, -2)],   // 1->2
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)], // 2->1
    [(1, 0), (1, -1), (0, 2), (1, 2)],    // 2->3
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)], // 3->2
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)], // 3->0
];

/// Wall kick data for I.
static I_KICKS: [[Offset; 4]; 8] = [
    [(-2, 0), (1, 0), (-2, 1), (1, -2)], // 0->1
    [(-1, 0), (2, 0), (-1, -2), (2, 1)], // 0->3
    [(2, 0), (-1, 0), (2, -1), (-1, 2)], // 1->0
    [(-1, 0), (2, 0), (-1, -2), (2, 1)], // 1->2
    [(1, 0), (-2, 0), (1, 2), (-2, -1)], // 2->1
    [(2, 0), (-1, 0), (2, -1), (-1, 2)], // 2->3
    [(-2, 0), (1, 0), (-2, 1), (1, -2)], // 3->2
    [(1, 0), (-2, 0), (1, 2), (-2, -1)], // 3->0
];

fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (North, West) => Some(1),
        (East, North) => Some(2),
        (East, South) => Some(3),
        (South, East) => Some(4),
        (South, West) => Some(5),
        (West, South) => Some(6),
        (West, North) => Some(7),
        _ => None,
    }
}

/// Kick offsets tried after the untranslated attempt.
///
/// Empty for O and for transitions that are not a single quarter turn.
pub fn kicks(shape: Shape, from: Rotation, to: Rotation) -> &'static [Offset] {
    let Some(idx) = kick_index(from, to) else {
        return &[];
    };
    match shape {
        Shape::O => &[],
        Shape::I => &I_KICKS[idx],
        _ => &JLSTZ_KICKS[idx],
    }
}

/// A falling piece: shape, four cells and rotation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    shape: Shape,
    cells: [Cell; PIECE_SIZE],
    rotation: Rotation,
}

impl Piece {
    /// Build from explicit cells. Cell 0 is treated as the pivot.
    pub fn from_cells(shape: Shape, cells: [Cell; PIECE_SIZE], rotation: Rotation) -> Self {
        Self {
            shape,
            cells,
            rotation,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn cells(&self) -> &[Cell; PIECE_SIZE] {
        &self.cells
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn pivot(&self) -> &Cell {
        &self.cells[0]
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            cells: self.cells.map(|c| c.translated(dx, dy)),
            ..*self
        }
    }

    /// Every cell in bounds and off the settled stack.
    pub fn fits(&self, settled: &SettledCells, dims: Dimensions) -> bool {
        self.cells
            .iter()
            .all(|c| in_bounds(dims, c) && !occupied(settled, c))
    }

    /// Some cell of the piece sits at `(col, row)`.
    pub fn covers(&self, col: i32, row: i32) -> bool {
        self.cells.iter().any(|c| c.col == col && c.row == row)
    }
}
