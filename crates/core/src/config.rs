//! Game configuration
//!
//! Defaults mirror the constants in `blockfall-types`. A JSON file may override
//! any subset of fields; missing fields keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Dimensions;
use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, FALL_INTERVAL_STEP_MS, INITIAL_FALL_INTERVAL_MS, LEVEL_GOAL,
    MIN_FALL_INTERVAL_MS, TICK_MS,
};

/// Narrowest board a horizontal I can spawn on at the anchor column.
pub const MIN_WIDTH: u16 = 7;
/// Shortest board that leaves room below the game-over line.
pub const MIN_HEIGHT: u16 = 4;
/// Largest board on either axis; keeps terminal layout math in `u16`.
pub const MAX_SIDE: u16 = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board {width}x{height} is too small (minimum 7x4)")]
    BoardTooSmall { width: u16, height: u16 },
    #[error("board {width}x{height} is too large (maximum 256x256)")]
    BoardTooLarge { width: u16, height: u16 },
    #[error("fall interval must be non-zero")]
    ZeroFallInterval,
    #[error("minimum fall interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    MinAboveInitial { min_ms: u32, initial_ms: u32 },
    #[error("level goal must be non-zero")]
    ZeroLevelGoal,
    #[error("tick length must be non-zero")]
    ZeroTick,
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub initial_fall_interval_ms: u32,
    pub min_fall_interval_ms: u32,
    pub fall_interval_step_ms: u32,
    pub level_goal: u32,
    /// Frame length the runner feeds into `Tick`.
    pub tick_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH as u16,
            height: BOARD_HEIGHT as u16,
            initial_fall_interval_ms: INITIAL_FALL_INTERVAL_MS,
            min_fall_interval_ms: MIN_FALL_INTERVAL_MS,
            fall_interval_step_ms: FALL_INTERVAL_STEP_MS,
            level_goal: LEVEL_GOAL,
            tick_ms: TICK_MS,
        }
    }
}

impl GameConfig {
    pub fn dims(&self) -> Dimensions {
        Dimensions::new(self.width as i32, self.height as i32)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.initial_fall_interval_ms == 0 || self.min_fall_interval_ms == 0 {
            return Err(ConfigError::ZeroFallInterval);
        }
        if self.min_fall_interval_ms > self.initial_fall_interval_ms {
            return Err(ConfigError::MinAboveInitial {
                min_ms: self.min_fall_interval_ms,
                initial_ms: self.initial_fall_interval_ms,
            });
        }
        if self.level_goal == 0 {
            return Err(ConfigError::ZeroLevelGoal);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dims(), Dimensions::new(10, 20));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "width": 12, "level_goal": 10 }"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.level_goal, 10);
        assert_eq!(config.height, 20);
        assert_eq!(config.initial_fall_interval_ms, 300);
    }

    #[test]
    fn rejects_tiny_board() {
        let err = GameConfig::from_json_str(r#"{ "width": 4 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooSmall { width: 4, .. }));
    }

    #[test]
    fn rejects_huge_board() {
        let err = GameConfig::from_json_str(r#"{ "width": 40000 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BoardTooLarge { width: 40000, .. }));

        let widest = GameConfig {
            width: MAX_SIDE,
            height: MAX_SIDE,
            ..GameConfig::default()
        };
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_intervals() {
        let config = GameConfig {
            min_fall_interval_ms: 500,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MinAboveInitial { min_ms: 500, .. })
        ));
    }

    #[test]
    fn rejects_zero_values() {
        let zero_goal = GameConfig {
            level_goal: 0,
            ..GameConfig::default()
        };
        assert!(matches!(zero_goal.validate(), Err(ConfigError::ZeroLevelGoal)));

        let zero_fall = GameConfig {
            initial_fall_interval_ms: 0,
            min_fall_interval_ms: 0,
            ..GameConfig::default()
        };
        assert!(matches!(zero_fall.validate(), Err(ConfigError::ZeroFallInterval)));

        let zero_tick = GameConfig {
            tick_ms: 0,
            ..GameConfig::default()
        };
        assert!(matches!(zero_tick.validate(), Err(ConfigError::ZeroTick)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
