//! Reducer - folds commands over a board
//!
//! Every command has exactly one handler. A board that has ended ignores
//! everything except [`Command::NewGame`].

use crate::board::Board;
use crate::gravity;
use crate::movement;
use crate::rotation;
use crate::spawner;
use crate::types::Command;

/// Apply one command, returning a new board. `board` is left untouched.
pub fn apply(board: &Board, command: Command) -> Board {
    if board.game_ended && command != Command::NewGame {
        return board.clone();
    }

    let mut next = board.clone();
    match command {
        Command::NewGame => {
            next = Board::start(
                board.config,
                board.shapes,
                board.score.best(),
                board.next_id,
            );
        }
        Command::Move(direction) => movement::apply_move(&mut next, direction),
        Command::Rotate { clockwise } => rotation::apply_rotate(&mut next, clockwise),
        Command::HardDrop => movement::apply_hard_drop(&mut next),
        Command::Tick { elapsed_ms } => gravity::apply_tick(&mut next, elapsed_ms),
        Command::SpawnPiece { shape } => spawner::apply_spawn(&mut next, shape),
    }
    next
}

/// Fold a command sequence over `board`.
pub fn reduce<I>(board: Board, commands: I) -> Board
where
    I: IntoIterator<Item = Command>,
{
    commands
        .into_iter()
        .fold(board, |board, command| apply(&board, command))
}
