//! Piece spawner - builds pieces from the catalog and fills the active slot

use tracing::trace;

use crate::board::Board;
use crate::geometry::Cell;
use crate::pieces::{spawn_layout, Piece};
use crate::types::{Rotation, Shape, SPAWN_ANCHOR};

/// Build `shape` with its layout added to `anchor`. Cell ids run from
/// `first_id` upward.
pub fn build_piece(shape: Shape, anchor: (i32, i32), first_id: u64) -> Piece {
    let color = shape.color();
    let (ax, ay) = anchor;
    let mut id = first_id;
    let cells = spawn_layout(shape).map(|(dx, dy)| {
        let cell = Cell::new(ax + dx, ay + dy, color, id);
        id += 1;
        cell
    });
    Piece::from_cells(shape, cells, Rotation::North)
}

/// Build at the spawn anchor, consuming four ids from the board.
///
/// `None` when the anchor area is already taken by the stack; the board is
/// then left unchanged and the next tick ends the game.
pub(crate) fn spawn(board: &mut Board, shape: Shape) -> Option<Piece> {
    let piece = build_piece(shape, SPAWN_ANCHOR, board.next_id);
    if !piece.fits(&board.settled, board.dims()) {
        trace!(shape = %shape, "spawn blocked");
        return None;
    }
    board.next_id += piece.cells().len() as u64;
    trace!(shape = %shape, first_id = piece.cells()[0].id, "spawned piece");
    Some(piece)
}

/// Install the queued shape if the board is empty; `incoming` becomes the new
/// queued shape. With an active piece the board is left alone, but a drawn
/// shape is still consumed from the source.
pub(crate) fn apply_spawn(board: &mut Board, incoming: Option<Shape>) {
    let incoming = match incoming {
        Some(shape) => shape,
        None => board.shapes.draw(),
    };
    if board.active.is_some() {
        return;
    }
    let queued = board.next_shape;
    if let Some(piece) = spawn(board, queued) {
        board.active = Some(piece);
        board.next_shape = incoming;
    }
}
