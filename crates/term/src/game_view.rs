//! GameView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested.

use crate::core::{BoardSnapshot, Cell};
use crate::fb::{CellStyle, FrameBuffer, Glyph, Rect, Rgb};
use crate::types::Color;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);

/// Lays out the playfield, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares up typical terminal glyphs.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into(&self, snap: &BoardSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::BLANK);

        let frame = self.frame(snap, viewport);
        fb.fill(frame.inset(1), play_style().glyph(' '));
        draw_border(fb, frame);

        for (y, row) in snap.board.iter().enumerate() {
            for (x, color) in row.iter().enumerate() {
                let (col, row) = (x as i32, y as i32);
                match color {
                    Some(color) => self.draw_block(fb, frame, col, row, *color),
                    None => self.paint(fb, frame, col, row, empty_style().glyph('·')),
                }
            }
        }

        if let Some(ghost) = &snap.ghost {
            for cell in ghost.iter().filter(|c| visible(snap, c)) {
                self.paint(fb, frame, cell.col, cell.row, ghost_style().glyph('░'));
            }
        }

        if let Some(active) = &snap.active {
            for cell in active.cells.iter().filter(|c| visible(snap, c)) {
                self.draw_block(fb, frame, cell.col, cell.row, cell.color);
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            draw_overlay_text(fb, frame, 0, "GAME OVER");
            draw_overlay_text(fb, frame, 1, "R: NEW GAME");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    /// Outer rectangle of the bordered playfield, centered horizontally.
    fn frame(&self, snap: &BoardSnapshot, viewport: Viewport) -> Rect {
        let cols = u16::try_from(snap.width.max(0)).unwrap_or(u16::MAX);
        let rows = u16::try_from(snap.height.max(0)).unwrap_or(u16::MAX);
        let w = cols.saturating_mul(self.cell_w).saturating_add(2);
        let h = rows.saturating_mul(self.cell_h).saturating_add(2);
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Rect::new(viewport.width.saturating_sub(w) / 2, y, w, h)
    }

    /// Terminal rectangle covered by cell `(col, row)` of a grid whose
    /// top-left cell starts at `(x, y)`. Negative cells land off screen.
    fn cell_rect(&self, (x, y): (u16, u16), col: i32, row: i32) -> Rect {
        let col = u16::try_from(col).unwrap_or(u16::MAX);
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        Rect::new(
            x.saturating_add(col.saturating_mul(self.cell_w)),
            y.saturating_add(row.saturating_mul(self.cell_h)),
            self.cell_w,
            self.cell_h,
        )
    }

    fn paint(&self, fb: &mut FrameBuffer, frame: Rect, col: i32, row: i32, glyph: Glyph) {
        let inner = frame.inset(1);
        fb.fill(self.cell_rect((inner.x, inner.y), col, row), glyph);
    }

    fn draw_block(&self, fb: &mut FrameBuffer, frame: Rect, col: i32, row: i32, color: Color) {
        let style = CellStyle {
            fg: Rgb::from(color),
            bg: PLAY_BG,
            bold: true,
            dim: false,
        };
        self.paint(fb, frame, col, row, style.glyph('█'));
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        viewport: Viewport,
        frame: Rect,
    ) {
        let panel_x = frame.right().saturating_add(2);
        if viewport.width.saturating_sub(panel_x) < 10 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::PLAIN
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            ..CellStyle::PLAIN
        };

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("HIGH", snap.high_score),
            ("LEVEL", snap.level),
        ] {
            fb.print(panel_x, y, name, label);
            fb.print_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.print(panel_x, y, "NEXT", label);
        let origin = (panel_x, y.saturating_add(1));
        let block = CellStyle {
            fg: Rgb::from(snap.next_shape.color()),
            bold: true,
            ..CellStyle::PLAIN
        }
        .glyph('█');
        for cell in &snap.next_preview {
            fb.fill(self.cell_rect(origin, cell.col, cell.row), block);
        }
    }
}

fn play_style() -> CellStyle {
    CellStyle {
        fg: Rgb::new(80, 80, 90),
        bg: PLAY_BG,
        bold: false,
        dim: false,
    }
}

fn empty_style() -> CellStyle {
    CellStyle {
        fg: Rgb::new(90, 90, 100),
        bg: PLAY_BG,
        bold: false,
        dim: true,
    }
}

fn ghost_style() -> CellStyle {
    CellStyle {
        fg: Rgb::new(140, 140, 140),
        bg: PLAY_BG,
        bold: false,
        dim: true,
    }
}

fn visible(snap: &BoardSnapshot, cell: &Cell) -> bool {
    (0..snap.width).contains(&cell.col) && (0..snap.height).contains(&cell.row)
}

fn draw_border(fb: &mut FrameBuffer, frame: Rect) {
    if frame.w < 2 || frame.h < 2 {
        return;
    }
    let style = CellStyle {
        fg: Rgb::new(200, 200, 200),
        ..CellStyle::PLAIN
    };
    let (left, top) = (frame.x, frame.y);
    let (right, bottom) = (frame.right() - 1, frame.bottom() - 1);
    let inner = frame.inset(1);

    fb.fill(Rect::new(inner.x, top, inner.w, 1), style.glyph('─'));
    fb.fill(Rect::new(inner.x, bottom, inner.w, 1), style.glyph('─'));
    fb.fill(Rect::new(left, inner.y, 1, inner.h), style.glyph('│'));
    fb.fill(Rect::new(right, inner.y, 1, inner.h), style.glyph('│'));
    fb.set(left, top, style.glyph('┌'));
    fb.set(right, top, style.glyph('┐'));
    fb.set(left, bottom, style.glyph('└'));
    fb.set(right, bottom, style.glyph('┘'));
}

/// Centered text, `line` rows below the middle of the frame.
fn draw_overlay_text(fb: &mut FrameBuffer, frame: Rect, line: u16, text: &str) {
    let y = frame.y.saturating_add(frame.h / 2).saturating_add(line);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let style = CellStyle {
        fg: Rgb::new(255, 255, 255),
        bold: true,
        ..CellStyle::PLAIN
    };
    fb.print(x, y, text, style);
}
