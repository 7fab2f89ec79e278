//! Per-line edit state and screen refresh.
//!
//! `LineState` owns the rune buffer, the cursor and the multiline paint
//! bookkeeping for exactly one `read` call. Every mutator ends by
//! repainting, so the screen always matches the buffer between
//! keystrokes; a failed repaint write is fatal to the read in progress.
//!
//! Editor-level rendering inputs (multiline flag, hints callback) are
//! threaded in per call through [`RefreshCtx`] rather than held as a back
//! reference, which keeps the loop free to borrow the history and the
//! callbacks independently.

use core_term::{fdio, geometry};
use core_text::{slice_width, str_width};
use std::io;
use std::os::unix::io::RawFd;

/// An inline suggestion rendered after the buffer. Not part of the line.
#[derive(Debug, Clone)]
pub struct Hint {
    pub text: String,
    /// ANSI color code; negative means unstyled unless `bold` forces the
    /// default of 37.
    pub color: i32,
    pub bold: bool,
}

pub type HintsFn = dyn Fn(&str) -> Option<Hint>;

/// Rendering inputs owned by the editor, borrowed per refresh.
#[derive(Clone, Copy)]
pub struct RefreshCtx<'a> {
    pub multiline: bool,
    pub hints: Option<&'a HintsFn>,
}

impl<'a> RefreshCtx<'a> {
    /// The same context with hints suppressed (used for the final repaint
    /// of a committed line).
    pub fn without_hints(self) -> Self {
        Self {
            hints: None,
            ..self
        }
    }
}

pub struct LineState {
    pub(crate) ifd: RawFd,
    ofd: RawFd,
    prompt: String,
    prompt_width: usize,
    pub(crate) buf: Vec<char>,
    pub(crate) pos: usize,
    /// Terminal width, sampled once at line start.
    cols: usize,
    /// Cursor rune index at the previous multiline refresh.
    oldpos: usize,
    /// Greatest number of rows this line has occupied so far.
    maxrows: usize,
    /// History navigation cursor; 0 is the newest entry.
    pub(crate) history_idx: usize,
}

impl LineState {
    pub fn new(ifd: RawFd, ofd: RawFd, prompt: &str) -> Self {
        Self {
            ifd,
            ofd,
            prompt: prompt.to_string(),
            prompt_width: str_width(prompt),
            buf: Vec::new(),
            pos: 0,
            cols: geometry::columns(ifd, ofd).max(1),
            oldpos: 0,
            maxrows: 0,
            history_idx: 0,
        }
    }

    pub fn as_string(&self) -> String {
        self.buf.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Insert a rune at the cursor.
    pub fn insert(&mut self, rune: char, ctx: &RefreshCtx) -> io::Result<()> {
        self.buf.insert(self.pos, rune);
        self.pos += 1;
        self.refresh(ctx)
    }

    /// Remove the rune left of the cursor.
    pub fn backspace(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        self.buf.remove(self.pos - 1);
        self.pos -= 1;
        self.refresh(ctx)
    }

    /// Remove the rune under the cursor.
    pub fn delete(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos >= self.buf.len() {
            return Ok(());
        }
        self.buf.remove(self.pos);
        self.refresh(ctx)
    }

    /// Swap the rune left of the cursor with the one under it, advancing
    /// the cursor except over the final rune. At end of line the last two
    /// runes are swapped in place.
    pub fn swap(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == 0 || self.buf.len() < 2 {
            return Ok(());
        }
        if self.pos == self.buf.len() {
            let n = self.buf.len();
            self.buf.swap(n - 2, n - 1);
        } else {
            self.buf.swap(self.pos - 1, self.pos);
            if self.pos != self.buf.len() - 1 {
                self.pos += 1;
            }
        }
        self.refresh(ctx)
    }

    pub fn move_left(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        self.pos -= 1;
        self.refresh(ctx)
    }

    pub fn move_right(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == self.buf.len() {
            return Ok(());
        }
        self.pos += 1;
        self.refresh(ctx)
    }

    pub fn move_home(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == 0 {
            return Ok(());
        }
        self.pos = 0;
        self.refresh(ctx)
    }

    pub fn move_end(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if self.pos == self.buf.len() {
            return Ok(());
        }
        self.pos = self.buf.len();
        self.refresh(ctx)
    }

    /// Erase the whole line.
    pub fn delete_line(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        self.buf.clear();
        self.pos = 0;
        self.refresh(ctx)
    }

    /// Erase from the cursor to the end of the line.
    pub fn delete_to_end(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        self.buf.truncate(self.pos);
        self.refresh(ctx)
    }

    /// Erase the space-delimited word left of the cursor, including the
    /// trailing spaces between it and the cursor.
    pub fn delete_prev_word(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        let old_pos = self.pos;
        while self.pos > 0 && self.buf[self.pos - 1] == ' ' {
            self.pos -= 1;
        }
        while self.pos > 0 && self.buf[self.pos - 1] != ' ' {
            self.pos -= 1;
        }
        self.buf.drain(self.pos..old_pos);
        self.refresh(ctx)
    }

    /// Replace the buffer, cursor at the end.
    pub fn set(&mut self, line: &str, ctx: &RefreshCtx) -> io::Result<()> {
        self.buf = line.chars().collect();
        self.pos = self.buf.len();
        self.refresh(ctx)
    }

    /// Repaint prompt + buffer + hints in the active layout.
    pub fn refresh(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        if ctx.multiline {
            self.refresh_multiline(ctx)
        } else {
            self.refresh_singleline(ctx)
        }
    }

    fn refresh_singleline(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        let mut b_start = 0;
        let mut b_end = self.buf.len();
        // Walk the left anchor right until the cursor fits on screen. If
        // the prompt alone is wider than the window the anchor stops at
        // the cursor and the paint stays consistent, merely cramped.
        let mut pos_width = slice_width(&self.buf[..self.pos]);
        while self.prompt_width + pos_width >= self.cols && b_start < self.pos {
            b_start += 1;
            pos_width = slice_width(&self.buf[b_start..self.pos]);
        }
        // Trim the right anchor so nothing is painted past the last column.
        let mut span_width = slice_width(&self.buf[b_start..b_end]);
        while self.prompt_width + span_width >= self.cols && b_end > b_start {
            b_end -= 1;
            span_width = slice_width(&self.buf[b_start..b_end]);
        }
        let mut seq = String::with_capacity(64);
        seq.push('\r');
        seq.push_str(&self.prompt);
        seq.extend(self.buf[b_start..b_end].iter());
        self.push_hints(&mut seq, ctx);
        // Erase to the right, then park the cursor.
        seq.push_str("\x1b[0K");
        seq.push_str(&format!("\r\x1b[{}C", self.prompt_width + pos_width));
        fdio::write_str(self.ofd, &seq)
    }

    // Row arithmetic uses the cursor rune index in the column terms;
    // rune index and column agree for ASCII. Wide glyphs can misplace
    // the cursor by a row near a wrap boundary.
    fn refresh_multiline(&mut self, ctx: &RefreshCtx) -> io::Result<()> {
        let buf_width = slice_width(&self.buf);
        let old_rows = self.maxrows;
        // Row the cursor was on at the previous refresh (1-based).
        let rpos = (self.prompt_width + self.oldpos + self.cols) / self.cols;
        // Rows the buffer occupies now.
        let mut rows = (self.prompt_width + buf_width + self.cols - 1) / self.cols;
        if rows > self.maxrows {
            self.maxrows = rows;
        }
        let mut seq = String::with_capacity(64);
        // Go down to the last row used before, then clear rows upward.
        if old_rows > rpos {
            seq.push_str(&format!("\x1b[{}B", old_rows - rpos));
        }
        for _ in 1..old_rows {
            seq.push_str("\r\x1b[0K\x1b[1A");
        }
        seq.push_str("\r\x1b[0K");
        seq.push_str(&self.prompt);
        seq.extend(self.buf.iter());
        self.push_hints(&mut seq, ctx);
        // Cursor at the very end of a row that is exactly full: open the
        // next row so the cursor has somewhere to be.
        if self.pos != 0
            && self.pos == buf_width
            && (self.pos + self.prompt_width) % self.cols == 0
        {
            seq.push_str("\n\r");
            rows += 1;
            if rows > self.maxrows {
                self.maxrows = rows;
            }
        }
        // Climb from the bottom row to the cursor's row.
        let rpos2 = (self.prompt_width + self.pos + self.cols) / self.cols;
        if rows > rpos2 {
            seq.push_str(&format!("\x1b[{}A", rows - rpos2));
        }
        let col = (self.prompt_width + self.pos) % self.cols;
        if col != 0 {
            seq.push_str(&format!("\r\x1b[{}C", col));
        } else {
            seq.push('\r');
        }
        self.oldpos = self.pos;
        fdio::write_str(self.ofd, &seq)
    }

    /// Append the styled hint to the paint when one is offered and fits in
    /// the columns remaining after the buffer.
    fn push_hints(&self, seq: &mut String, ctx: &RefreshCtx) {
        let Some(hints) = ctx.hints else {
            return;
        };
        let used = self.prompt_width + slice_width(&self.buf);
        if used >= self.cols {
            return;
        }
        let hint_cols = self.cols - used;
        let Some(mut hint) = hints(&self.as_string()) else {
            return;
        };
        if hint.text.is_empty() {
            return;
        }
        let mut runes: Vec<char> = hint.text.chars().collect();
        while slice_width(&runes) > hint_cols {
            runes.pop();
        }
        if hint.bold && hint.color < 0 {
            hint.color = 37;
        }
        let styled = hint.color >= 0 || hint.bold;
        if styled {
            seq.push_str(&format!("\x1b[{};{};49m", i32::from(hint.bold), hint.color));
        }
        seq.extend(runes.iter());
        if styled {
            seq.push_str("\x1b[0m");
        }
    }
}
