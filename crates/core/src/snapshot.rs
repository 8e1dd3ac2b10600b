use serde::Serialize;

use crate::board::Board;
use crate::geometry::Cell;
use crate::pieces::Piece;
use crate::spawner::build_piece;
use crate::types::{Color, Rotation, Shape, PIECE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub shape: Shape,
    pub rotation: Rotation,
    pub cells: [Cell; PIECE_SIZE],
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            shape: value.shape(),
            rotation: value.rotation(),
            cells: *value.cells(),
        }
    }
}

/// Read-only view of a board for renderers and serializers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    /// Visible rows top to bottom; settled cells only.
    pub board: Vec<Vec<Option<Color>>>,
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<[Cell; PIECE_SIZE]>,
    pub next_shape: Shape,
    /// Next shape laid out at the origin, for preview panels.
    pub next_preview: [Cell; PIECE_SIZE],
    pub cleared: Vec<Cell>,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub level_progress: u32,
    pub fall_interval_ms: u32,
    pub game_over: bool,
    pub seed: u32,
}

impl BoardSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Settled color at a visible coordinate.
    pub fn settled_at(&self, col: i32, row: i32) -> Option<Color> {
        if col < 0 || row < 0 {
            return None;
        }
        self.board
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .flatten()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        let dims = board.dims();
        let mut grid = vec![vec![None; dims.width as usize]; dims.height as usize];
        for cell in board.settled().iter() {
            if (0..dims.height).contains(&cell.row) && (0..dims.width).contains(&cell.col) {
                grid[cell.row as usize][cell.col as usize] = Some(cell.color);
            }
        }

        let score = board.score_state();
        Self {
            width: dims.width,
            height: dims.height,
            board: grid,
            active: board.active().copied().map(ActiveSnapshot::from),
            ghost: board.drop_preview().copied(),
            next_shape: board.next_shape(),
            next_preview: *build_piece(board.next_shape(), (0, 0), 0).cells(),
            cleared: board.pending_cleared().to_vec(),
            score: score.score,
            high_score: score.high_score,
            level: score.level,
            level_progress: score.level_progress,
            fall_interval_ms: board.fall_interval_ms(),
            game_over: board.game_ended(),
            seed: board.seed(),
        }
    }
}
