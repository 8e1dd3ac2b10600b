//! Framebuffer and style types for terminal rendering.
//!
//! All writes are clipped against the buffer, so the view can lay out a board
//! larger than the terminal without bounds checks of its own.

use blockfall_types::Color;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        match color {
            Color::Cyan => Rgb::new(80, 220, 220),
            Color::Blue => Rgb::new(80, 120, 220),
            Color::Orange => Rgb::new(255, 165, 0),
            Color::Yellow => Rgb::new(240, 220, 80),
            Color::Green => Rgb::new(100, 220, 120),
            Color::Purple => Rgb::new(200, 120, 220),
            Color::Red => Rgb::new(220, 80, 80),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        fg: Rgb::new(220, 220, 220),
        bg: Rgb::new(0, 0, 0),
        bold: false,
        dim: false,
    };

    pub const fn glyph(self, ch: char) -> Glyph {
        Glyph { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::PLAIN
    }
}

/// One terminal column of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: CellStyle,
}

impl Glyph {
    pub const BLANK: Glyph = CellStyle::PLAIN.glyph(' ');
}

impl Default for Glyph {
    fn default() -> Self {
        Self::BLANK
    }
}

/// Axis-aligned rectangle in terminal columns and rows.
///
/// Edges saturate at `u16::MAX` instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Shrink by `by` on every side.
    pub fn inset(self, by: u16) -> Rect {
        Rect {
            x: self.x.saturating_add(by),
            y: self.y.saturating_add(by),
            w: self.w.saturating_sub(by.saturating_mul(2)),
            h: self.h.saturating_sub(by.saturating_mul(2)),
        }
    }

    pub fn intersect(self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x,
            y,
            w: right.saturating_sub(x),
            h: bottom.saturating_sub(y),
        }
    }
}

/// Row-major grid of glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            glyphs: vec![Glyph::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Change dimensions. The allocation only grows; contents are unspecified
    /// until the next `clear`.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.glyphs.resize(width as usize * height as usize, Glyph::BLANK);
    }

    /// Glyphs of row `y`; empty past the bottom edge.
    pub fn row(&self, y: u16) -> &[Glyph] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.glyphs[start..start + self.width as usize]
    }

    fn row_mut(&mut self, y: u16) -> &mut [Glyph] {
        if y >= self.height {
            return &mut [];
        }
        let start = y as usize * self.width as usize;
        &mut self.glyphs[start..start + self.width as usize]
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.row(y).get(x as usize).copied()
    }

    pub fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(slot) = self.row_mut(y).get_mut(x as usize) {
            *slot = glyph;
        }
    }

    pub fn clear(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Fill the visible part of `rect`.
    pub fn fill(&mut self, rect: Rect, glyph: Glyph) {
        let clip = rect.intersect(self.area());
        if clip.is_empty() {
            return;
        }
        for y in clip.y..clip.bottom() {
            self.row_mut(y)[clip.x as usize..clip.right() as usize].fill(glyph);
        }
    }

    /// Write `text` left to right from `(x, y)`, dropping what falls off the
    /// right edge. Returns the column after the last character.
    pub fn print(&mut self, x: u16, y: u16, text: &str, style: CellStyle) -> u16 {
        let row = self.row_mut(y);
        let mut end = x;
        for ch in text.chars() {
            if let Some(slot) = row.get_mut(end as usize) {
                *slot = style.glyph(ch);
            }
            end = end.saturating_add(1);
        }
        end
    }

    /// Decimal `value` at `(x, y)`, without going through a `String`.
    pub fn print_u32(&mut self, x: u16, y: u16, value: u32, style: CellStyle) -> u16 {
        let mut digits = [b'0'; 10];
        let mut start = digits.len();
        let mut n = value;
        loop {
            start -= 1;
            digits[start] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        let mut end = x;
        for &d in &digits[start..] {
            self.set(end, y, style.glyph(d as char));
            end = end.saturating_add(1);
        }
        end
    }

    /// Characters of row `y`, for tests and debugging.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|g| g.ch).collect()
    }

    /// Column and row where `needle` first starts, top to bottom.
    pub fn find_text(&self, needle: &str) -> Option<(u16, u16)> {
        (0..self.height).find_map(|y| {
            let text = self.row_text(y);
            let byte = text.find(needle)?;
            Some((text[..byte].chars().count() as u16, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set(5, 0, CellStyle::PLAIN.glyph('X'));
        fb.set(0, 5, CellStyle::PLAIN.glyph('X'));
        fb.fill(Rect::new(10, 10, 4, 4), CellStyle::PLAIN.glyph('X'));
        assert!((0..2).all(|y| fb.row_text(y) == "   "));
        assert!(fb.row(2).is_empty());
    }

    #[test]
    fn fill_is_clipped_to_the_buffer() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill(Rect::new(2, 1, 100, 100), CellStyle::PLAIN.glyph('#'));
        assert_eq!(fb.row_text(0), "    ");
        assert_eq!(fb.row_text(1), "  ##");
        assert_eq!(fb.row_text(2), "  ##");
    }

    #[test]
    fn print_clips_and_reports_end_column() {
        let mut fb = FrameBuffer::new(4, 1);
        let end = fb.print(1, 0, "HELLO", CellStyle::PLAIN);
        assert_eq!(fb.row_text(0), " HEL");
        assert_eq!(end, 6);
    }

    #[test]
    fn print_u32_writes_digits() {
        let mut fb = FrameBuffer::new(12, 2);
        assert_eq!(fb.print_u32(0, 0, 0, CellStyle::PLAIN), 1);
        fb.print_u32(0, 1, u32::MAX, CellStyle::PLAIN);
        assert_eq!(fb.row_text(0).trim_end(), "0");
        assert_eq!(fb.row_text(1).trim_end(), "4294967295");
    }

    #[test]
    fn rect_math_saturates() {
        let r = Rect::new(u16::MAX - 1, 0, 10, 3);
        assert_eq!(r.right(), u16::MAX);
        assert!(Rect::new(0, 0, 3, 3).inset(2).is_empty());
        assert_eq!(
            Rect::new(0, 0, 10, 10).intersect(Rect::new(5, 8, 10, 10)),
            Rect::new(5, 8, 5, 2)
        );
        assert!(Rect::new(0, 0, 2, 2)
            .intersect(Rect::new(4, 4, 2, 2))
            .is_empty());
    }

    #[test]
    fn find_text_reports_glyph_columns() {
        let mut fb = FrameBuffer::new(8, 2);
        fb.fill(Rect::new(0, 1, 3, 1), CellStyle::PLAIN.glyph('─'));
        fb.print(3, 1, "OK", CellStyle::PLAIN);
        assert_eq!(fb.find_text("OK"), Some((3, 1)));
        assert_eq!(fb.find_text("NO"), None);
    }

    #[test]
    fn resize_changes_row_length() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(4, 3);
        fb.clear(Glyph::BLANK);
        assert_eq!((fb.width(), fb.height()), (4, 3));
        assert_eq!(fb.row(2).len(), 4);
    }

    #[test]
    fn every_board_color_is_distinct() {
        let colors = [
            Color::Cyan,
            Color::Blue,
            Color::Orange,
            Color::Yellow,
            Color::Green,
            Color::Purple,
            Color::Red,
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(Rgb::from(*a), Rgb::from(*b));
            }
        }
    }
}
