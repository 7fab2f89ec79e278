//! Terminal width discovery.
//!
//! The window-size ioctl answers instantly when the output is a real
//! terminal. When it cannot, the terminal itself is interrogated: query the
//! cursor column, drive the cursor to the right margin, query again, and
//! put it back. Every failure path collapses to the 80-column default; a
//! wrong width degrades the paint, it must never abort a read.

use crate::fdio;
use crate::reader::{RuneReader, NUL};
use std::mem;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Width assumed when the terminal will not tell us.
pub const DEFAULT_COLS: usize = 80;

/// Per-rune wait while parsing the cursor-position report.
const QUERY_TIMEOUT: Duration = Duration::from_millis(20);

const ESC: char = '\x1b';

/// Ask the terminal for the current cursor column via `ESC[6n`. The reply
/// is `ESC[<rows>;<cols>R`; returns `None` on a missing or malformed reply.
fn cursor_column(ifd: RawFd, ofd: RawFd) -> Option<usize> {
    fdio::write_str(ofd, "\x1b[6n").ok()?;
    let mut reader = RuneReader::new();
    let mut reply: Vec<char> = Vec::with_capacity(32);
    while reply.len() < 32 {
        let rune = reader.next_rune(ifd, Some(QUERY_TIMEOUT)).ok()?;
        if rune == NUL {
            break;
        }
        reply.push(rune);
        if rune == 'R' {
            break;
        }
    }
    if reply.len() < 6 || reply[0] != ESC || reply[1] != '[' || *reply.last()? != 'R' {
        return None;
    }
    let body: String = reply[2..reply.len() - 1].iter().collect();
    let mut fields = body.split(';');
    let _rows = fields.next()?;
    let cols = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    cols.parse().ok()
}

/// Number of columns of the terminal behind `ofd`.
pub fn columns(ifd: RawFd, ofd: RawFd) -> usize {
    let mut ws: libc::winsize = unsafe { mem::zeroed() };
    if unsafe { libc::ioctl(ofd, libc::TIOCGWINSZ, &mut ws) } == 0 && ws.ws_col > 0 {
        return usize::from(ws.ws_col);
    }
    // A non-tty cannot answer the cursor query; probing it would swallow
    // whatever the caller piped in.
    if unsafe { libc::isatty(ofd) } == 0 {
        return DEFAULT_COLS;
    }
    let Some(start) = cursor_column(ifd, ofd) else {
        return DEFAULT_COLS;
    };
    if fdio::write_str(ofd, "\x1b[999C").is_err() {
        return DEFAULT_COLS;
    }
    let Some(cols) = cursor_column(ifd, ofd) else {
        return DEFAULT_COLS;
    };
    // Put the cursor back where it started.
    if cols > start {
        let _ = fdio::write_str(ofd, &format!("\x1b[{}D", cols - start));
    }
    cols
}
