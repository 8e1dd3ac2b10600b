//! Core types module - shared value types, commands and constants
//!
//! Everything in here is plain data: the simulation in `blockfall-core`, the key
//! mapping in `blockfall-input` and the renderer in `blockfall-term` all speak
//! these types, so none of them has to depend on the others.
//!
//! # Coordinates
//!
//! Grid units, one unit per cell. `col` grows to the right, `row` grows downward.
//! Rows above the visible field are negative; pieces spawn partly up there.
//!
//! # Default timing and leveling
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep used by the runner (~60 FPS) |
//! | `INITIAL_FALL_INTERVAL_MS` | 300 | Auto-descent interval at level 1 |
//! | `FALL_INTERVAL_STEP_MS` | 25 | Interval reduction per level |
//! | `MIN_FALL_INTERVAL_MS` | 100 | Interval floor |
//! | `LEVEL_GOAL` | 4 | Rows needed per level |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, Direction, Rotation, Shape};
//!
//! let shape: Shape = "t".parse().unwrap();
//! assert_eq!(shape, Shape::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! let cmd: Command = "moveLeft".parse().unwrap();
//! assert_eq!(cmd, Command::Move(Direction::Left));
//!
//! // Diagonal moves cannot be expressed.
//! assert!(Direction::from_delta(1, 1).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Number of cells in every piece.
pub const PIECE_SIZE: usize = 4;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Auto-descent interval for a fresh game.
pub const INITIAL_FALL_INTERVAL_MS: u32 = 300;

/// Auto-descent never gets faster than this.
pub const MIN_FALL_INTERVAL_MS: u32 = 100;

/// How much faster auto-descent gets on each level up.
pub const FALL_INTERVAL_STEP_MS: u32 = 25;

/// Rows to clear before the level goes up.
pub const LEVEL_GOAL: u32 = 4;

/// Level of a fresh game.
pub const START_LEVEL: u32 = 1;

/// Base reward by rows cleared in one pass (index = rows).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Spawn anchor `(col, row)`; piece offsets are added to it.
pub const SPAWN_ANCHOR: (i32, i32) = (3, -1);

/// Errors raised while building commands from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("move must use exactly one axis, got ({dx}, {dy})")]
    DiagonalMove { dx: i32, dy: i32 },
    #[error("move has no displacement")]
    ZeroMove,
    #[error("move must be a single cell, got ({dx}, {dy})")]
    StepTooLarge { dx: i32, dy: i32 },
    #[error("unknown shape: {0:?}")]
    UnknownShape(String),
    #[error("shape index {0} is out of range 0..7")]
    ShapeIndexOutOfRange(usize),
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("invalid argument {value:?} for {command}")]
    InvalidArgument { command: String, value: String },
}

/// Tetromino shapes.
///
/// Declaration order is the catalog order the random shape source indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Shape {
    /// All shapes in catalog order.
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::J,
        Shape::L,
        Shape::O,
        Shape::S,
        Shape::T,
        Shape::Z,
    ];

    /// Look up a shape by catalog index.
    pub fn from_index(index: usize) -> Result<Self, CommandError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CommandError::ShapeIndexOutOfRange(index))
    }

    pub fn index(self) -> usize {
        match self {
            Shape::I => 0,
            Shape::J => 1,
            Shape::L => 2,
            Shape::O => 3,
            Shape::S => 4,
            Shape::T => 5,
            Shape::Z => 6,
        }
    }

    /// Fixed color of every cell of this shape.
    pub fn color(self) -> Color {
        match self {
            Shape::I => Color::Cyan,
            Shape::J => Color::Blue,
            Shape::L => Color::Orange,
            Shape::O => Color::Yellow,
            Shape::S => Color::Green,
            Shape::T => Color::Purple,
            Shape::Z => Color::Red,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::I => "I",
            Shape::J => "J",
            Shape::L => "L",
            Shape::O => "O",
            Shape::S => "S",
            Shape::T => "T",
            Shape::Z => "Z",
        }
    }
}

impl FromStr for Shape {
    type Err = CommandError;

    /// Parse a shape letter (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" => Ok(Shape::I),
            "J" => Ok(Shape::J),
            "L" => Ok(Shape::L),
            "O" => Ok(Shape::O),
            "S" => Ok(Shape::S),
            "T" => Ok(Shape::T),
            "Z" => Ok(Shape::Z),
            _ => Err(CommandError::UnknownShape(s.to_string())),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell color tag. Carried through settling and row clears unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Blue,
    Orange,
    Yellow,
    Green,
    Purple,
    Red,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Purple => "purple",
            Color::Red => "red",
        }
    }
}

/// Rotation states (North = spawn orientation, index 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    pub fn rotated(self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }

    /// Rotation index in `0..4`.
    pub fn index(self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build from any integer, wrapping modulo 4.
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }
}

/// One-cell translation direction for [`Command::Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    /// `(dx, dy)` in grid units.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    /// Validate a raw displacement: exactly one axis, exactly one cell.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Self, CommandError> {
        match (dx, dy) {
            (0, 0) => Err(CommandError::ZeroMove),
            (-1, 0) => Ok(Direction::Left),
            (1, 0) => Ok(Direction::Right),
            (0, 1) => Ok(Direction::Down),
            (0, -1) => Ok(Direction::Up),
            (x, y) if x != 0 && y != 0 => Err(CommandError::DiagonalMove { dx, dy }),
            _ => Err(CommandError::StepTooLarge { dx, dy }),
        }
    }
}

/// Everything the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    NewGame,
    Move(Direction),
    Rotate { clockwise: bool },
    HardDrop,
    Tick { elapsed_ms: u32 },
    /// `None` pulls the shape from the board's own random source.
    SpawnPiece { shape: Option<Shape> },
}

impl Command {
    /// Build a move from a raw displacement.
    pub fn move_by(dx: i32, dy: i32) -> Result<Self, CommandError> {
        Direction::from_delta(dx, dy).map(Command::Move)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse the textual command form used by scripts.
    ///
    /// `tick` and `spawn` take an optional `:argument`, e.g. `tick:16`, `spawn:T`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg.trim())),
            None => (s, None),
        };

        let cmd = match (name.to_ascii_lowercase().as_str(), arg) {
            ("newgame", None) => Command::NewGame,
            ("moveleft", None) => Command::Move(Direction::Left),
            ("moveright", None) => Command::Move(Direction::Right),
            ("movedown", None) => Command::Move(Direction::Down),
            ("moveup", None) => Command::Move(Direction::Up),
            ("rotatecw", None) => Command::Rotate { clockwise: true },
            ("rotateccw", None) => Command::Rotate { clockwise: false },
            ("harddrop", None) => Command::HardDrop,
            ("tick", None) => Command::Tick {
                elapsed_ms: TICK_MS,
            },
            ("tick", Some(v)) => Command::Tick {
                elapsed_ms: v.parse().map_err(|_| CommandError::InvalidArgument {
                    command: "tick".to_string(),
                    value: v.to_string(),
                })?,
            },
            ("spawn", None) => Command::SpawnPiece { shape: None },
            ("spawn", Some(v)) => Command::SpawnPiece {
                shape: Some(v.parse()?),
            },
            _ => return Err(CommandError::UnknownCommand(s.to_string())),
        };
        Ok(cmd)
    }
}
