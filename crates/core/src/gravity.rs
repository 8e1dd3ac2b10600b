//! Gravity module - the per-tick pass pipeline
//!
//! A tick runs, in order: discard last step's cleared cells, clear full rows,
//! refresh the drop preview, auto-descend (settling a blocked piece), level up,
//! and finally the game-over check. Rows filled by a piece settling on this
//! tick are cleared on the next one.

use tracing::debug;

use crate::board::Board;
use crate::movement::can_descend;
use crate::scoring::next_fall_interval;
use crate::settled::rows_beneath;

pub(crate) fn apply_tick(board: &mut Board, elapsed_ms: u32) {
    board.pending_cleared.clear();
    clear_rows(board);
    refresh_preview(board);
    descend(board, elapsed_ms);
    level_up(board);
    check_game_over(board);
}

/// The active piece falls with the stack around it. A piece never shares a row
/// with a full row, so every one of its cells sits on the same side of each
/// cleared row and the pivot decides the shift for all four.
fn clear_rows(board: &mut Board) {
    let full = board.settled.full_rows(board.dims().width);
    if full.is_empty() {
        return;
    }
    let cleared = board.settled.remove_rows(&full);
    if let Some(piece) = board.active {
        board.active = Some(piece.translated(0, rows_beneath(&full, piece.pivot().row)));
    }

    let rows = full.len() as u32;
    board.score.award_rows(rows);
    debug!(
        rows,
        score = board.score.score,
        level = board.score.level,
        "cleared rows"
    );
    board.pending_cleared = cleared;
}

fn refresh_preview(board: &mut Board) {
    board.drop_preview = board.ghost().map(|ghost| *ghost.cells());
}

fn descend(board: &mut Board, elapsed_ms: u32) {
    board.tick_accumulator_ms = board.tick_accumulator_ms.saturating_add(elapsed_ms);
    if board.tick_accumulator_ms < board.fall_interval_ms {
        return;
    }
    board.tick_accumulator_ms = 0;

    let Some(piece) = board.active else {
        return;
    };
    if can_descend(&piece, &board.settled, board.dims()) {
        board.active = Some(piece.translated(0, 1));
    } else {
        settle(board);
    }
}

/// Merge the active piece into the stack and empty the active slot.
pub(crate) fn settle(board: &mut Board) {
    if let Some(piece) = board.active.take() {
        debug!(
            shape = %piece.shape(),
            col = piece.pivot().col,
            row = piece.pivot().row,
            "settled piece"
        );
        board.settled.extend(piece.cells().iter().copied());
    }
}

fn level_up(board: &mut Board) {
    if !board.score.try_level_up(board.config.level_goal) {
        return;
    }
    board.fall_interval_ms = next_fall_interval(
        board.fall_interval_ms,
        board.config.fall_interval_step_ms,
        board.config.min_fall_interval_ms,
    );
    debug!(
        level = board.score.level,
        fall_interval_ms = board.fall_interval_ms,
        "level up"
    );
}

fn check_game_over(board: &mut Board) {
    if board.settled.highest_row().is_some_and(|row| row <= 0) {
        debug!(
            score = board.score.score,
            high_score = board.score.best(),
            "game over"
        );
        *board = board.ended();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Cell;
    use crate::spawner::build_piece;
    use crate::types::{Color, Command, Shape};

    fn full_row(row: i32) -> Vec<Cell> {
        (0..10)
            .map(|col| Cell::new(col, row, Color::Cyan, 500 + col as u64))
            .collect()
    }

    fn tick(board: &Board, ms: u32) -> Board {
        board.apply(Command::Tick { elapsed_ms: ms })
    }

    #[test]
    fn full_row_clears_and_scores() {
        let mut cells = full_row(19);
        cells.push(Cell::new(2, 18, Color::Red, 1));
        let board = Board::with_seed(1)
            .with_active(Some(build_piece(Shape::T, (3, 5), 50)))
            .with_settled(cells);

        let next = tick(&board, 16);
        assert_eq!(next.score(), 40);
        assert_eq!(next.pending_cleared().len(), 10);
        assert_eq!(next.settled().len(), 1);
        let moved = next.settled().get(2, 19).copied().unwrap();
        assert_eq!((moved.color, moved.id), (Color::Red, 1));

        let after = tick(&next, 16);
        assert!(after.pending_cleared().is_empty());
        assert_eq!(after.score(), 40);
    }

    #[test]
    fn reward_scales_with_level() {
        let mut board = Board::with_seed(1)
            .with_active(None)
            .with_settled(full_row(19));
        board.score.level = 3;
        assert_eq!(tick(&board, 1).score(), 120);
    }

    #[test]
    fn descends_once_interval_elapses() {
        let board = Board::with_seed(1).with_active(Some(build_piece(Shape::O, (4, 5), 1)));
        let waited = tick(&board, 299);
        assert_eq!(waited.active(), board.active());
        assert_eq!(waited.tick_accumulator_ms(), 299);

        let fell = tick(&waited, 1);
        assert_eq!(fell.active().map(|p| p.pivot().row), Some(7));
        assert_eq!(fell.tick_accumulator_ms(), 0);
    }

    #[test]
    fn blocked_piece_settles_on_interval() {
        let board = Board::with_seed(1).with_active(Some(build_piece(Shape::O, (4, 18), 1)));
        let early = tick(&board, 100);
        assert!(early.active().is_some());

        let settled = tick(&early, 200);
        assert!(settled.active().is_none());
        assert_eq!(settled.settled().len(), 4);
        assert!(settled.settled().contains(4, 19));
    }

    #[test]
    fn row_filled_by_settle_clears_next_tick() {
        let mut cells: Vec<Cell> = full_row(19).into_iter().filter(|c| c.col > 1).collect();
        cells.extend(full_row(18).into_iter().filter(|c| c.col > 1));
        let board = Board::with_seed(1)
            .with_active(Some(build_piece(Shape::O, (0, 18), 1)))
            .with_settled(cells);

        let settled = tick(&board, 300);
        assert!(settled.active().is_none());
        assert_eq!(settled.score(), 0);

        let cleared = tick(&settled, 1);
        assert_eq!(cleared.score(), 100);
        assert!(cleared.settled().is_empty());
    }

    #[test]
    fn piece_under_an_overhang_falls_with_it() {
        let mut cells = full_row(19);
        cells.push(Cell::new(5, 15, Color::Red, 1));
        cells.push(Cell::new(5, 14, Color::Red, 2));
        // O tucked under the overhang: (5,16) (6,16) (5,17) (6,17).
        let board = Board::with_seed(1)
            .with_active(Some(build_piece(Shape::O, (5, 16), 50)))
            .with_settled(cells);

        let next = tick(&board, 16);
        assert_eq!(next.score(), 40);
        assert!(next.settled().contains(5, 16));
        assert!(next.settled().contains(5, 15));
        let piece = next.active().copied().unwrap();
        assert_eq!(piece, build_piece(Shape::O, (5, 16), 50).translated(0, 1));
        assert!(piece
            .cells()
            .iter()
            .all(|c| !next.settled().contains(c.col, c.row)));
    }

    #[test]
    fn piece_between_cleared_rows_falls_by_rows_beneath_it() {
        let mut cells = full_row(19);
        cells.extend(full_row(8).into_iter().map(|c| Cell { id: c.id + 100, ..c }));
        cells.push(Cell::new(0, 7, Color::Red, 1));
        let board = Board::with_seed(1)
            .with_active(Some(build_piece(Shape::O, (4, 12), 50)))
            .with_settled(cells);

        let next = tick(&board, 16);
        assert_eq!(next.active().map(|p| p.pivot().row), Some(13));
        // Above both cleared rows, so it drops two.
        assert!(next.settled().contains(0, 9));
        assert_eq!(next.settled().len(), 1);
    }

    #[test]
    fn preview_tracks_landing_spot() {
        let board = Board::with_seed(1).with_active(Some(build_piece(Shape::O, (4, 5), 1)));
        let next = tick(&board, 1);
        let preview = next.drop_preview().copied().unwrap();
        assert!(preview.iter().all(|c| c.row >= 18));

        let empty = Board::with_seed(1).with_active(None);
        assert!(tick(&empty, 1).drop_preview().is_none());
    }

    #[test]
    fn level_up_speeds_up_fall() {
        let mut board = Board::with_seed(1)
            .with_active(None)
            .with_settled(full_row(19));
        board.score.level_progress = 3;
        let next = tick(&board, 1);
        assert_eq!(next.level(), 2);
        assert_eq!(next.score_state().level_progress, 0);
        assert_eq!(next.fall_interval_ms(), 275);
    }

    #[test]
    fn fall_interval_has_a_floor() {
        let mut board = Board::with_seed(1)
            .with_active(None)
            .with_settled(full_row(19));
        board.score.level_progress = 3;
        board.fall_interval_ms = 110;
        assert_eq!(tick(&board, 1).fall_interval_ms(), 100);
    }

    #[test]
    fn stack_at_top_ends_the_game() {
        let mut board = Board::with_seed(1)
            .with_active(Some(build_piece(Shape::I, (3, 10), 1)))
            .with_settled([Cell::new(0, 0, Color::Red, 9)]);
        board.score.score = 700;
        board.score.high_score = 300;

        let over = tick(&board, 1);
        assert!(over.game_ended());
        assert!(over.active().is_none());
        assert!(over.drop_preview().is_none());
        assert!(over.settled().is_empty());
        assert_eq!(over.score(), 0);
        assert_eq!(over.high_score(), 700);
    }
}
