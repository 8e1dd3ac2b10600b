//! Movement engine - one-cell shifts and hard-drop distance
//!
//! Each axis is checked on its own. An illegal axis contributes no displacement,
//! so blocked moves are absorbed rather than reported.

use crate::board::Board;
use crate::geometry::{in_bounds, is_at_bottom_edge, occupied, Dimensions};
use crate::gravity;
use crate::pieces::Piece;
use crate::settled::SettledCells;
use crate::types::Direction;

/// Shift `piece` one cell in `direction` if that is legal.
pub fn shift(
    piece: &Piece,
    settled: &SettledCells,
    dims: Dimensions,
    direction: Direction,
) -> Piece {
    let (dx, dy) = direction.delta();
    let dx = if dx != 0 && can_shift_horizontally(piece, settled, dims, dx) {
        dx
    } else {
        0
    };
    let dy = if dy != 0 && can_shift_vertically(piece, settled, dims, dy) {
        dy
    } else {
        0
    };
    piece.translated(dx, dy)
}

/// `dx` is `-1` or `1`.
///
/// Blocked when a moved cell leaves the walls or lands on the stack, which is
/// the same as a current cell having a settled neighbour on that side.
pub fn can_shift_horizontally(
    piece: &Piece,
    settled: &SettledCells,
    dims: Dimensions,
    dx: i32,
) -> bool {
    piece.cells().iter().all(|cell| {
        let moved = cell.translated(dx, 0);
        in_bounds(dims, &moved) && !occupied(settled, &moved)
    })
}

/// `dy` is `-1` or `1`.
///
/// Downward is blocked by the floor or by a settled cell directly beneath;
/// upward only by landing on a settled coordinate.
pub fn can_shift_vertically(
    piece: &Piece,
    settled: &SettledCells,
    dims: Dimensions,
    dy: i32,
) -> bool {
    if dy > 0 {
        can_descend(piece, settled, dims)
    } else {
        piece
            .cells()
            .iter()
            .all(|cell| !occupied(settled, &cell.translated(0, dy)))
    }
}

/// Only the coordinate directly beneath each cell matters, so a piece is
/// never held up by cells hanging above it.
pub fn can_descend(piece: &Piece, settled: &SettledCells, dims: Dimensions) -> bool {
    piece
        .cells()
        .iter()
        .all(|cell| !is_at_bottom_edge(dims, cell) && !occupied(settled, &cell.translated(0, 1)))
}

/// Rows the piece can fall before it rests on the stack or the floor.
///
/// Only settled cells below each piece cell count, so overhangs above the piece
/// never shorten the drop.
pub fn drop_distance(piece: &Piece, settled: &SettledCells, dims: Dimensions) -> i32 {
    piece
        .cells()
        .iter()
        .map(|cell| {
            let stop = settled
                .first_row_below(cell.col, cell.row)
                .unwrap_or(dims.height);
            stop - cell.row - 1
        })
        .min()
        .unwrap_or(0)
        .max(0)
}

/// Where the piece would come to rest.
pub fn landing(piece: &Piece, settled: &SettledCells, dims: Dimensions) -> Piece {
    piece.translated(0, drop_distance(piece, settled, dims))
}

pub(crate) fn apply_move(board: &mut Board, direction: Direction) {
    let dims = board.dims();
    if let Some(piece) = board.active {
        board.active = Some(shift(&piece, &board.settled, dims, direction));
    }
}

pub(crate) fn apply_hard_drop(board: &mut Board) {
    let dims = board.dims();
    if let Some(piece) = board.active {
        board.active = Some(landing(&piece, &board.settled, dims));
        gravity::settle(board);
    }
}
