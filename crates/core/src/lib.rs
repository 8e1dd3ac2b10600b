//! Core simulation - pure, deterministic, and testable
//!
//! This crate holds every rule of the game: spawning, movement and collision,
//! rotation with wall kicks, gravity, row clearing, scoring, leveling and game
//! over. It has **no dependencies** on terminals, event loops or clocks. A
//! [`Board`] is a plain value and each [`Command`](types::Command) produces a
//! new one.
//!
//! # Module Structure
//!
//! - [`geometry`]: cells, dimensions and the collision predicates
//! - [`settled`]: the settled stack, keyed by coordinate, and row clearing
//! - [`pieces`]: spawn layouts, SRS kick tables and the [`Piece`] value
//! - [`movement`]: one-cell shifts and hard-drop distance
//! - [`rotation`]: quarter turns with wall kicks
//! - `gravity`: the per-tick pass pipeline
//! - [`spawner`] / [`rng`]: piece construction and the seeded shape source
//! - [`scoring`]: line rewards and fall speed
//! - [`board`] / [`reducer`]: state and command folding
//! - [`snapshot`]: read-only view for renderers
//! - [`config`]: tunable rules, loadable from JSON
//!
//! # Game Rules
//!
//! - **Settling**: a blocked piece only settles when its auto-descent timer
//!   fires (or on hard drop), so a landed piece can still slide or rotate until
//!   then.
//! - **Row clear**: full rows are removed at the start of the next tick and pay
//!   `[0, 40, 100, 300, 1200]` times the level.
//! - **Leveling**: every `level_goal` rows the level goes up and the fall
//!   interval shrinks by a fixed step, down to a floor.
//! - **Game over**: any settled cell reaching row 0 ends the game. Only the
//!   high score survives.
//! - **Spawning**: the core never spawns on its own. The host sends
//!   `SpawnPiece` whenever it wants the active slot refilled.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{reducer, Board};
//! use blockfall_core::types::{Command, Direction};
//!
//! let board = Board::with_seed(12345);
//!
//! let board = reducer::reduce(
//!     board,
//!     [
//!         Command::Move(Direction::Right),
//!         Command::Rotate { clockwise: true },
//!         Command::HardDrop,
//!         Command::SpawnPiece { shape: None },
//!         Command::Tick { elapsed_ms: 16 },
//!     ],
//! );
//!
//! assert_eq!(board.settled().len(), 4);
//! assert!(board.active().is_some());
//! ```

pub mod board;
pub mod config;
pub mod geometry;
mod gravity;
pub mod movement;
pub mod pieces;
pub mod reducer;
pub mod rng;
pub mod rotation;
pub mod scoring;
pub mod settled;
pub mod snapshot;
pub mod spawner;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, GameConfig};
pub use geometry::{Cell, Dimensions};
pub use pieces::Piece;
pub use rng::{Lcg, ShapeSource};
pub use scoring::ScoreState;
pub use settled::SettledCells;
pub use snapshot::{ActiveSnapshot, BoardSnapshot};
