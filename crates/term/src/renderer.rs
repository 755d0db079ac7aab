//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Each frame is compared row by row with the one drawn before it and only
//! the runs of cells that changed are written. With nothing comparable to
//! diff against (first frame, resize, [`invalidate`]) the screen is cleared
//! and redrawn whole.
//!
//! [`invalidate`]: TerminalRenderer::invalidate

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen.
    shown: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen and mouse capture (squares are clickable).
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(terminal::SetTitle("tui-chess"))?;
        self.buf.queue(event::EnableMouseCapture)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.shown = None;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(event::DisableMouseCapture)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Redraw everything on the next frame (after a resize).
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Draw `fb`, then hand the previously shown frame back through `fb`.
    ///
    /// Keeps two buffers alive for the whole session; the caller redraws the
    /// returned one completely before the next call.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_frame(self.shown.as_ref(), fb, &mut self.buf)?;
        self.flush_buf()?;

        let spare = self
            .shown
            .take()
            .unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        self.shown = Some(std::mem::replace(fb, spare));
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode `next` as terminal commands into `out`, writing only the cells
/// that differ from `prev`.
///
/// A missing or differently sized `prev` clears the screen and writes every
/// cell.
pub fn encode_frame(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let prev = prev.filter(|p| p.width() == next.width() && p.height() == next.height());
    if prev.is_none() {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let width = usize::from(next.width());
    if width == 0 {
        return Ok(());
    }
    let mut pen = Pen::default();
    for (y, row) in next.cells().chunks(width).enumerate() {
        let old = prev.and_then(|p| p.cells().get(y * width..(y + 1) * width));
        for (x, run) in dirty_runs(row, old) {
            out.queue(cursor::MoveTo(x as u16, y as u16))?;
            for &cell in run {
                pen.print(out, cell)?;
            }
        }
    }

    if pen.style.is_some() {
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(ResetColor)?;
    }
    Ok(())
}

/// Maximal runs of `row` that differ from `old`, as `(start column, cells)`.
/// The whole row is one run when there is nothing to compare with.
fn dirty_runs<'a>(
    row: &'a [Cell],
    old: Option<&'a [Cell]>,
) -> impl Iterator<Item = (usize, &'a [Cell])> + 'a {
    let changed = move |i: usize| old.map_or(true, |o| o[i] != row[i]);
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < row.len() && !changed(x) {
            x += 1;
        }
        if x == row.len() {
            return None;
        }
        let start = x;
        while x < row.len() && changed(x) {
            x += 1;
        }
        Some((start, &row[start..x]))
    })
}

/// Remembers the active style so a run of same-styled cells sets it once.
#[derive(Default)]
struct Pen {
    style: Option<CellStyle>,
}

impl Pen {
    fn print(&mut self, out: &mut Vec<u8>, cell: Cell) -> Result<()> {
        if self.style != Some(cell.style) {
            let style = cell.style;
            // SGR reset also clears colours, so it goes first.
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(SetForegroundColor(colour(style.fg)))?;
            out.queue(SetBackgroundColor(colour(style.bg)))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        out.queue(Print(cell.ch))?;
        Ok(())
    }
}

fn colour(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(prev: Option<&FrameBuffer>, next: &FrameBuffer) -> String {
        let mut out = Vec::new();
        encode_frame(prev, next, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn first_frame_clears_and_draws_everything() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.put_char(0, 0, '♞', CellStyle::default());
        fb.put_char(1, 1, 'a', CellStyle::default().bold());

        let text = encode(None, &fb);
        assert!(text.contains("\x1b[2J"));
        assert!(text.contains('♞'));
        assert!(text.contains('a'));
        assert!(text.contains("\x1b[2;1H"), "second row is positioned");
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let fb = FrameBuffer::new(3, 3);
        assert_eq!(encode(Some(&fb), &fb), "");
    }

    #[test]
    fn only_the_changed_run_is_written() {
        let prev = FrameBuffer::new(8, 2);
        let mut next = prev.clone();
        for x in 2..5 {
            next.put_char(x, 1, '♙', CellStyle::default());
        }

        let text = encode(Some(&prev), &next);
        assert!(!text.contains("\x1b[2J"));
        assert_eq!(text.matches('♙').count(), 3);
        // One cursor move, to column 3 of row 2 (1-based).
        assert_eq!(text.matches('H').count(), 1);
        assert!(text.contains("\x1b[2;3H"));
    }

    #[test]
    fn resized_frame_is_a_full_redraw() {
        let prev = FrameBuffer::new(4, 4);
        let next = FrameBuffer::new(5, 4);
        let text = encode(Some(&prev), &next);
        assert!(text.contains("\x1b[2J"));
        assert_eq!(text.matches(' ').count(), 20);
    }

    #[test]
    fn dirty_runs_split_on_unchanged_cells() {
        let old = [Cell::default(); 6];
        let mut row = old;
        row[0].ch = 'x';
        row[2].ch = 'y';
        row[3].ch = 'z';

        let runs: Vec<(usize, usize)> = dirty_runs(&row, Some(&old[..]))
            .map(|(x, run)| (x, run.len()))
            .collect();
        assert_eq!(runs, vec![(0, 1), (2, 2)]);

        let whole: Vec<(usize, usize)> = dirty_runs(&row, None).map(|(x, run)| (x, run.len())).collect();
        assert_eq!(whole, vec![(0, 6)]);
    }
}
