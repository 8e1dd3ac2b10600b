//! Scoring module - line rewards, level progress and fall speed

use serde::{Deserialize, Serialize};

use crate::types::{LINE_SCORES, START_LEVEL};

/// Score, level and the persistent high score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub level: u32,
    /// Rows cleared since the last level up.
    pub level_progress: u32,
    pub high_score: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::fresh(0)
    }
}

impl ScoreState {
    /// Start-of-game state carrying over `high_score`.
    pub fn fresh(high_score: u32) -> Self {
        Self {
            score: 0,
            level: START_LEVEL,
            level_progress: 0,
            high_score,
        }
    }

    /// Credit `rows` cleared at the current level.
    pub fn award_rows(&mut self, rows: u32) {
        self.score = self.score.saturating_add(line_reward(rows, self.level));
        self.level_progress += rows;
    }

    /// Level up once progress reaches `goal`. Returns true on level up.
    pub fn try_level_up(&mut self, goal: u32) -> bool {
        if self.level_progress >= goal {
            self.level += 1;
            self.level_progress = 0;
            true
        } else {
            false
        }
    }

    /// Highest of the stored high score and the current score.
    pub fn best(&self) -> u32 {
        self.high_score.max(self.score)
    }
}

/// Reward for clearing `rows` rows in one pass at `level`.
///
/// More than four rows can only happen when several pieces settle between two
/// ticks; each group of four pays as a four-row clear.
pub fn line_reward(rows: u32, level: u32) -> u32 {
    let tetrises = rows / 4;
    let rest = (rows % 4) as usize;
    let base = LINE_SCORES[4]
        .saturating_mul(tetrises)
        .saturating_add(LINE_SCORES[rest]);
    base.saturating_mul(level)
}

/// Fall interval after one level up.
pub fn next_fall_interval(current_ms: u32, step_ms: u32, floor_ms: u32) -> u32 {
    current_ms.saturating_sub(step_ms).max(floor_ms)
}
