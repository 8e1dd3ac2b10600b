//! Board module - the complete simulation state
//!
//! A [`Board`] is a plain value. Commands never mutate it in place; see
//! [`Board::apply`] and [`crate::reducer`].

use crate::config::{ConfigError, GameConfig};
use crate::geometry::{Cell, Dimensions};
use crate::movement;
use crate::pieces::Piece;
use crate::reducer;
use crate::rng::ShapeSource;
use crate::scoring::ScoreState;
use crate::settled::SettledCells;
use crate::snapshot::BoardSnapshot;
use crate::spawner;
use crate::types::{Command, Shape, PIECE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) config: GameConfig,
    pub(crate) active: Option<Piece>,
    pub(crate) next_shape: Shape,
    pub(crate) settled: SettledCells,
    pub(crate) score: ScoreState,
    pub(crate) fall_interval_ms: u32,
    pub(crate) tick_accumulator_ms: u32,
    pub(crate) game_ended: bool,
    pub(crate) pending_cleared: Vec<Cell>,
    pub(crate) drop_preview: Option<[Cell; PIECE_SIZE]>,
    pub(crate) shapes: ShapeSource,
    pub(crate) next_id: u64,
}

impl Board {
    /// Validate `config` and start a game seeded with `seed`.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, ShapeSource::new(seed), 0, 1))
    }

    /// Default 10x20 rules.
    pub fn with_seed(seed: u32) -> Self {
        Self::start(GameConfig::default(), ShapeSource::new(seed), 0, 1)
    }

    /// Fresh game with an empty stack and a spawned piece.
    pub(crate) fn start(
        config: GameConfig,
        shapes: ShapeSource,
        high_score: u32,
        next_id: u64,
    ) -> Self {
        let mut board = Self::idle(config, shapes, high_score, next_id);
        board.next_shape = board.shapes.draw();
        spawner::apply_spawn(&mut board, None);
        board
    }

    /// Initial field values without any piece and without drawing a shape.
    fn idle(config: GameConfig, shapes: ShapeSource, high_score: u32, next_id: u64) -> Self {
        Self {
            config,
            active: None,
            next_shape: shapes.peek(),
            settled: SettledCells::new(),
            score: ScoreState::fresh(high_score),
            fall_interval_ms: config.initial_fall_interval_ms,
            tick_accumulator_ms: 0,
            game_ended: false,
            pending_cleared: Vec::new(),
            drop_preview: None,
            shapes,
            next_id,
        }
    }

    /// Terminal state after game over. Keeps the best score, the shape source
    /// cursor and the id counter; everything else returns to its initial value.
    pub(crate) fn ended(&self) -> Self {
        Self {
            next_shape: self.next_shape,
            game_ended: true,
            ..Self::idle(self.config, self.shapes, self.score.best(), self.next_id)
        }
    }

    /// Apply one command and return the resulting board.
    pub fn apply(&self, command: Command) -> Board {
        reducer::apply(self, command)
    }

    /// Replace the settled stack. Duplicate coordinates are dropped.
    ///
    /// Meant for setting up positions; the caller keeps the active piece clear
    /// of the new cells.
    pub fn with_settled(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.settled = cells.into_iter().collect();
        self
    }

    /// Replace the active piece.
    pub fn with_active(mut self, piece: Option<Piece>) -> Self {
        self.active = piece;
        self
    }

    pub fn with_next_shape(mut self, shape: Shape) -> Self {
        self.next_shape = shape;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dims(&self) -> Dimensions {
        self.config.dims()
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next_shape(&self) -> Shape {
        self.next_shape
    }

    pub fn settled(&self) -> &SettledCells {
        &self.settled
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn high_score(&self) -> u32 {
        self.score.high_score
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn tick_accumulator_ms(&self) -> u32 {
        self.tick_accumulator_ms
    }

    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    /// Cells removed by the most recent row clear.
    pub fn pending_cleared(&self) -> &[Cell] {
        &self.pending_cleared
    }

    /// Ghost computed on the last tick.
    pub fn drop_preview(&self) -> Option<&[Cell; PIECE_SIZE]> {
        self.drop_preview.as_ref()
    }

    /// Ghost for the current position, computed now.
    pub fn ghost(&self) -> Option<Piece> {
        self.active
            .map(|piece| movement::landing(&piece, &self.settled, self.dims()))
    }

    pub fn seed(&self) -> u32 {
        self.shapes.seed()
    }

    pub fn shape_source(&self) -> &ShapeSource {
        &self.shapes
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from(self)
    }
}
