//! TerminalRenderer: flushes framebuffers to a terminal.
//!
//! The first frame (and any frame after a resize) is a full redraw. After that
//! only runs of changed glyphs are emitted. Board cells are two glyphs wide and
//! mostly change in pairs a few columns apart, so nearby runs are merged and
//! style escapes are only sent for the parts of a style that actually change.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};

/// Unchanged glyphs that may be reprinted to join two runs. A cursor move
/// costs more bytes than this many plain glyphs.
const MERGE_GAP: usize = 3;

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize event).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// On return `fb` holds stale contents the caller may overwrite for the
    /// next frame; nothing is cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                self.buf.clear();
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            _ => {
                self.buf.clear();
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` without touching the terminal.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::new(out);
    for y in 0..fb.height() {
        pen.print_run(0, y, fb.row(y))?;
    }
    pen.finish()
}

/// Encode only what changed between two frames. Frames of different sizes
/// fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::new(out);
    for y in 0..next.height() {
        let row = next.row(y);
        for span in ChangedSpans::new(prev.row(y), row) {
            pen.print_run(span.start as u16, y, &row[span])?;
        }
    }
    pen.finish()
}

/// Terminal state already in effect, so repeated escapes can be skipped.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    attrs: Option<(bool, bool)>,
    cursor: Option<(u16, u16)>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            fg: None,
            bg: None,
            attrs: None,
            cursor: None,
        }
    }

    fn print_run(&mut self, x: u16, y: u16, glyphs: &[Glyph]) -> Result<()> {
        if glyphs.is_empty() {
            return Ok(());
        }
        if self.cursor != Some((x, y)) {
            self.out.queue(cursor::MoveTo(x, y))?;
        }
        for glyph in glyphs {
            self.style(glyph.style)?;
            self.out.queue(Print(glyph.ch))?;
        }
        self.cursor = Some((x.saturating_add(glyphs.len() as u16), y));
        Ok(())
    }

    fn style(&mut self, style: CellStyle) -> Result<()> {
        let attrs = (style.bold, style.dim);
        if self.attrs != Some(attrs) {
            // SGR reset also drops both colors.
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.attrs = Some(attrs);
            self.fg = None;
            self.bg = None;
        }
        if self.fg != Some(style.fg) {
            self.out.queue(SetForegroundColor(truecolor(style.fg)))?;
            self.fg = Some(style.fg);
        }
        if self.bg != Some(style.bg) {
            self.out.queue(SetBackgroundColor(truecolor(style.bg)))?;
            self.bg = Some(style.bg);
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn truecolor(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Column ranges of one row that differ between two frames, with runs closer
/// than [`MERGE_GAP`] joined.
struct ChangedSpans<'a> {
    prev: &'a [Glyph],
    next: &'a [Glyph],
    pos: usize,
}

impl<'a> ChangedSpans<'a> {
    fn new(prev: &'a [Glyph], next: &'a [Glyph]) -> Self {
        Self { prev, next, pos: 0 }
    }

    fn differs(&self, i: usize) -> bool {
        self.prev.get(i) != self.next.get(i)
    }
}

impl Iterator for ChangedSpans<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let len = self.next.len();
        let start = (self.pos..len).find(|&i| self.differs(i))?;

        let mut end = start + 1;
        let mut i = end;
        while i < len && i - end <= MERGE_GAP {
            if self.differs(i) {
                end = i + 1;
            }
            i += 1;
        }
        self.pos = end;
        Some(start..end)
    }
}
