//! Rotation engine - quarter turns about the pivot with wall kicks
//!
//! A rotation either lands whole on the first free candidate or does not happen.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::geometry::{Cell, Dimensions};
use crate::pieces::{kicks, Offset, Piece};
use crate::settled::SettledCells;
use crate::types::{Rotation, Shape, PIECE_SIZE};

/// Turn every cell 90 degrees about cell 0.
///
/// Clockwise maps a pivot-relative `(dx, dy)` to `(-dy, dx)`; counter-clockwise
/// maps it to `(dy, -dx)`. With rows growing downward both are visually correct.
pub fn rotate_cells(cells: &[Cell; PIECE_SIZE], clockwise: bool) -> [Cell; PIECE_SIZE] {
    let pivot = cells[0];
    cells.map(|c| {
        let (dx, dy) = (c.col - pivot.col, c.row - pivot.row);
        let (rx, ry) = if clockwise { (-dy, dx) } else { (dy, -dx) };
        Cell {
            col: pivot.col + rx,
            row: pivot.row + ry,
            ..c
        }
    })
}

/// Translations to try, in order: the untranslated attempt, then the kicks.
pub fn candidates(shape: Shape, from: Rotation, to: Rotation) -> ArrayVec<Offset, 5> {
    let mut out = ArrayVec::new();
    out.push((0, 0));
    for &kick in kicks(shape, from, to) {
        out.push(kick);
    }
    out
}

/// Rotate `piece`, or return it unchanged if nothing fits.
pub fn rotate(
    piece: &Piece,
    settled: &SettledCells,
    dims: Dimensions,
    clockwise: bool,
) -> Piece {
    if piece.shape() == Shape::O {
        return *piece;
    }

    let from = piece.rotation();
    let to = from.rotated(clockwise);
    let turned = Piece::from_cells(piece.shape(), rotate_cells(piece.cells(), clockwise), to);

    candidates(piece.shape(), from, to)
        .into_iter()
        .map(|(dx, dy)| turned.translated(dx, dy))
        .find(|candidate| candidate.fits(settled, dims))
        .unwrap_or(*piece)
}

pub(crate) fn apply_rotate(board: &mut Board, clockwise: bool) {
    let dims = board.dims();
    if let Some(piece) = board.active {
        board.active = Some(rotate(&piece, &board.settled, dims, clockwise));
    }
}
