//! Board tests - command behaviour through the public API

use blockfall::core::spawner::build_piece;
use blockfall::core::{Board, Cell, GameConfig};
use blockfall::types::{Color, Command, Direction, Shape, SPAWN_ANCHOR};

fn full_row(row: i32, first_id: u64) -> Vec<Cell> {
    (0..10)
        .map(|col| Cell::new(col, row, Color::Cyan, first_id + col as u64))
        .collect()
}

fn tick(board: &Board, ms: u32) -> Board {
    board.apply(Command::Tick { elapsed_ms: ms })
}

#[test]
fn test_single_row_clear_shifts_only_cells_above() {
    let mut cells = full_row(15, 100);
    cells.push(Cell::new(3, 14, Color::Red, 1));
    cells.push(Cell::new(7, 10, Color::Blue, 2));
    cells.push(Cell::new(0, 19, Color::Green, 3));
    let board = Board::with_seed(1).with_active(None).with_settled(cells);

    let next = tick(&board, 16);

    assert_eq!(next.score(), 40);
    assert_eq!(next.settled().len(), 3);
    assert_eq!(next.settled().get(3, 15).map(|c| c.id), Some(1));
    assert_eq!(next.settled().get(7, 11).map(|c| c.id), Some(2));
    // Below the cleared row: untouched.
    assert_eq!(next.settled().get(0, 19).map(|c| c.id), Some(3));
    assert_eq!(next.settled().row_len(15), 1);
    assert_eq!(next.pending_cleared().len(), 10);
}

#[test]
fn test_split_clear_compacts_rows() {
    let mut cells = full_row(19, 100);
    cells.extend(full_row(17, 200));
    cells.push(Cell::new(4, 18, Color::Red, 1));
    cells.push(Cell::new(4, 16, Color::Blue, 2));
    let board = Board::with_seed(1).with_active(None).with_settled(cells);

    let next = tick(&board, 16);

    assert_eq!(next.score(), 100);
    assert_eq!(next.settled().len(), 2);
    assert_eq!(next.settled().get(4, 19).map(|c| c.id), Some(1));
    assert_eq!(next.settled().get(4, 18).map(|c| c.id), Some(2));
}

#[test]
fn test_row_clear_carries_piece_tucked_under_overhang() {
    let mut cells = full_row(19, 100);
    cells.push(Cell::new(5, 15, Color::Red, 1));
    cells.push(Cell::new(5, 14, Color::Red, 2));
    let mut board = Board::with_seed(1)
        .with_active(Some(build_piece(Shape::O, (7, 0), 50)))
        .with_settled(cells);

    // Steer the O under the overhang before the full row is cleared.
    for _ in 0..16 {
        board = board.apply(Command::Move(Direction::Down));
    }
    for _ in 0..2 {
        board = board.apply(Command::Move(Direction::Left));
    }
    let tucked = *board.active().unwrap();
    assert_eq!(tucked, build_piece(Shape::O, (5, 16), 50));

    let next = tick(&board, 16);
    assert_eq!(next.score(), 40);
    assert_eq!(next.settled().get(5, 16).map(|c| c.id), Some(1));
    let piece = next.active().unwrap();
    assert_eq!(*piece, tucked.translated(0, 1));
    for cell in piece.cells() {
        assert!(!next.settled().contains(cell.col, cell.row), "{:?}", cell);
    }

    // The next settle keeps all four cells.
    let dropped = next.apply(Command::HardDrop);
    assert_eq!(dropped.settled().len(), 2 + 4);
}

#[test]
fn test_slide_window_before_settle() {
    // O resting on the floor: cells (4,18) (5,18) (4,19) (5,19).
    let board = Board::with_seed(1).with_active(Some(build_piece(Shape::O, (4, 18), 1)));

    let board = tick(&board, 100);
    let board = board.apply(Command::Move(Direction::Right));
    let board = tick(&board, 100);

    let active = board.active().copied().expect("still falling");
    assert!(active.covers(6, 19));
    assert!(!active.covers(4, 19));
    assert!(board.settled().is_empty());

    let board = tick(&board, 100);
    assert!(board.active().is_none());
    assert!(board.settled().contains(6, 19));
    assert!(board.settled().contains(5, 18));
}

#[test]
fn test_out_of_bounds_move_is_a_no_op() {
    let board = Board::with_seed(1).with_active(Some(build_piece(Shape::I, (0, 5), 1)));
    let moved = board.apply(Command::Move(Direction::Left));
    assert_eq!(moved.active(), board.active());
    assert_eq!(moved, board);

    let floor = Board::with_seed(1).with_active(Some(build_piece(Shape::I, (0, 19), 1)));
    assert_eq!(floor.apply(Command::Move(Direction::Down)), floor);
}

#[test]
fn test_move_into_settled_cell_is_absorbed() {
    let board = Board::with_seed(1)
        .with_active(Some(build_piece(Shape::O, (4, 10), 1)))
        .with_settled([Cell::new(6, 11, Color::Red, 90)]);
    let moved = board.apply(Command::Move(Direction::Right));
    assert_eq!(moved.active(), board.active());

    let left = board.apply(Command::Move(Direction::Left));
    assert!(left.active().unwrap().covers(3, 11));
}

#[test]
fn test_hard_drop_settles_at_landing() {
    let board =
        Board::with_seed(1).with_active(Some(build_piece(Shape::T, SPAWN_ANCHOR, 1)));
    let dropped = board.apply(Command::HardDrop);

    assert!(dropped.active().is_none());
    assert_eq!(dropped.settled().len(), 4);
    for (col, row) in [(3, 19), (4, 19), (5, 19), (4, 18)] {
        assert_eq!(
            dropped.settled().get(col, row).map(|c| c.color),
            Some(Color::Purple)
        );
    }
    // Settling happens immediately; scoring waits for a tick.
    assert_eq!(dropped.score(), 0);
}

#[test]
fn test_hard_drop_stops_on_stack() {
    let board = Board::with_seed(1)
        .with_active(Some(build_piece(Shape::I, (0, 0), 1)))
        .with_settled([Cell::new(2, 12, Color::Red, 90)]);
    let dropped = board.apply(Command::HardDrop);
    for col in 0..4 {
        assert!(dropped.settled().contains(col, 11));
    }
}

#[test]
fn test_spawn_is_a_no_op_while_piece_is_active() {
    let board = Board::with_seed(5);
    let active = board.active().copied();
    let next_shape = board.next_shape();

    let explicit = board.apply(Command::SpawnPiece {
        shape: Some(Shape::I),
    });
    assert_eq!(explicit.active().copied(), active);
    assert_eq!(explicit.next_shape(), next_shape);

    // A random spawn still advances the shape source.
    let drawn = board.apply(Command::SpawnPiece { shape: None });
    assert_eq!(drawn.active().copied(), active);
    assert_eq!(
        drawn.shape_source().draws(),
        board.shape_source().draws() + 1
    );
}

#[test]
fn test_spawn_promotes_next_shape() {
    let board = Board::with_seed(5)
        .with_active(None)
        .with_next_shape(Shape::S);
    let spawned = board.apply(Command::SpawnPiece {
        shape: Some(Shape::Z),
    });

    let active = spawned.active().expect("spawned");
    assert_eq!(active.shape(), Shape::S);
    assert_eq!(spawned.next_shape(), Shape::Z);
    assert!(active.cells().iter().all(|c| c.color == Color::Green));
}

#[test]
fn test_four_rows_level_up() {
    let mut cells = Vec::new();
    for row in 16..20 {
        cells.extend(full_row(row, 100 + row as u64 * 10));
    }
    let board = Board::with_seed(1).with_active(None).with_settled(cells);

    let next = tick(&board, 16);
    assert_eq!(next.score(), 1200);
    assert_eq!(next.level(), 2);
    assert_eq!(next.score_state().level_progress, 0);
    assert_eq!(next.fall_interval_ms(), 275);
    assert!(next.settled().is_empty());
}

#[test]
fn test_fall_interval_floor() {
    let config = GameConfig {
        initial_fall_interval_ms: 110,
        min_fall_interval_ms: 100,
        level_goal: 1,
        ..GameConfig::default()
    };
    let board = Board::new(config, 1)
        .unwrap()
        .with_active(None)
        .with_settled(full_row(19, 100));

    let next = tick(&board, 1);
    assert_eq!(next.level(), 2);
    assert_eq!(next.fall_interval_ms(), 100);

    let again = tick(&next.with_settled(full_row(19, 300)), 1);
    assert_eq!(again.level(), 3);
    assert_eq!(again.fall_interval_ms(), 100);
}

#[test]
fn test_game_over_then_new_game() {
    // Clearing row 19 pulls the row -1 cell down onto row 0.
    let mut cells = full_row(19, 100);
    cells.push(Cell::new(0, -1, Color::Red, 1));
    let board = Board::with_seed(9).with_active(None).with_settled(cells);

    let ended = tick(&board, 16);
    assert!(ended.game_ended());
    assert_eq!(ended.high_score(), 40);
    assert!(ended.settled().is_empty());
    assert!(ended.active().is_none());

    // Everything but NewGame is ignored once the game has ended.
    for command in [
        Command::Move(Direction::Left),
        Command::HardDrop,
        Command::Tick { elapsed_ms: 500 },
        Command::SpawnPiece { shape: None },
    ] {
        assert_eq!(ended.apply(command), ended);
    }

    let fresh = ended.apply(Command::NewGame);
    assert!(!fresh.game_ended());
    assert!(fresh.settled().is_empty());
    assert!(fresh.active().is_some());
    assert_eq!(fresh.score(), 0);
    assert_eq!(fresh.level(), 1);
    assert_eq!(fresh.high_score(), 40);
    assert_eq!(fresh.fall_interval_ms(), 300);
}

#[test]
fn test_high_score_keeps_maximum() {
    let mut cells = full_row(19, 100);
    cells.push(Cell::new(0, -1, Color::Red, 1));
    let first = tick(&Board::with_seed(9).with_active(None).with_settled(cells), 1);
    assert_eq!(first.high_score(), 40);

    // A scoreless second game must not lower it.
    let second = first
        .apply(Command::NewGame)
        .with_active(None)
        .with_settled([Cell::new(5, 0, Color::Red, 1)]);
    let second = tick(&second, 1);
    assert!(second.game_ended());
    assert_eq!(second.high_score(), 40);
}

#[test]
fn test_new_game_mid_game_keeps_best_score() {
    let board = Board::with_seed(2)
        .with_active(None)
        .with_settled(full_row(19, 100));
    let scored = tick(&board, 1);
    assert_eq!(scored.score(), 40);

    let restarted = scored.apply(Command::NewGame);
    assert_eq!(restarted.score(), 0);
    assert_eq!(restarted.high_score(), 40);
}
