//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`] values. The board
//! has no key-repeat or lock timing of its own, so this is a straight lookup.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
