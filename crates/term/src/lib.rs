//! Terminal rendering for the board.
//!
//! Renders into a plain framebuffer instead of a widget toolkit, then flushes
//! only the glyphs that changed. Board cells are drawn two columns wide so the
//! playfield keeps a square-ish aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{CellStyle, FrameBuffer, Glyph, Rect, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
