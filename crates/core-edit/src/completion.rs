//! Interactive completion cycling.
//!
//! Successive TABs walk the candidate list; the slot one past the end
//! re-shows the caller's original buffer (with a beep as the wrap marker).
//! Any other key commits the candidate on display and is handed back to
//! the edit loop to be processed as if it had just been typed. A lone ESC
//! restores the original buffer and swallows itself.

use crate::keys::{ESC, ESC_TIMEOUT, NUL, TAB};
use crate::line::{LineState, RefreshCtx};
use core_term::{poll, screen, RuneReader};
use std::io;

pub type CompletionFn = dyn Fn(&str) -> Vec<String>;

/// Run the cycler; returns the rune that ended it (`NUL` when the cycle
/// was fully handled and the loop should just read the next key).
pub(crate) fn complete_line(
    ls: &mut LineState,
    completion: &CompletionFn,
    reader: &mut RuneReader,
    ctx: &RefreshCtx,
) -> io::Result<char> {
    let candidates = completion(&ls.as_string());
    if candidates.is_empty() {
        screen::beep();
        return Ok(NUL);
    }
    let mut idx = 0usize;
    loop {
        if idx < candidates.len() {
            // Paint the candidate without adopting it.
            let saved_buf = std::mem::take(&mut ls.buf);
            let saved_pos = ls.pos;
            ls.buf = candidates[idx].chars().collect();
            ls.pos = ls.buf.len();
            ls.refresh(ctx)?;
            ls.buf = saved_buf;
            ls.pos = saved_pos;
        } else {
            // The wrap slot: show the original buffer.
            ls.refresh(ctx)?;
        }
        let rune = reader.next_rune(ls.ifd, None)?;
        match rune {
            NUL => return Ok(NUL),
            TAB => {
                idx = (idx + 1) % (candidates.len() + 1);
                if idx == candidates.len() {
                    screen::beep();
                }
            }
            ESC => {
                if poll::would_block(ls.ifd, ESC_TIMEOUT) {
                    // A lone escape: drop back to the original buffer.
                    if idx < candidates.len() {
                        ls.refresh(ctx)?;
                    }
                    return Ok(NUL);
                }
                // An escape sequence: adopt the candidate and let the edit
                // loop parse the rest of the sequence.
                if idx < candidates.len() {
                    ls.buf = candidates[idx].chars().collect();
                    ls.pos = ls.buf.len();
                }
                return Ok(ESC);
            }
            other => {
                if idx < candidates.len() {
                    ls.buf = candidates[idx].chars().collect();
                    ls.pos = ls.buf.len();
                }
                return Ok(other);
            }
        }
    }
}
