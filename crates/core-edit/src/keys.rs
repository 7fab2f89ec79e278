//! Keycodes and keystroke-to-command translation.
//!
//! Parsing is decoupled from dispatch: a keystroke (or escape sequence) is
//! first translated into a tagged [`Command`], and the edit loop acts on
//! commands only. The escape matcher is table-driven because the grammar is
//! tiny and the real hazard is the timing: a lone `ESC` is indistinguishable
//! from the start of a sequence until a 20 ms readiness window has passed.

use core_term::{poll, RuneReader};
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

pub const NUL: char = '\0';
pub const CTRL_A: char = '\x01';
pub const CTRL_B: char = '\x02';
pub const CTRL_C: char = '\x03';
pub const CTRL_D: char = '\x04';
pub const CTRL_E: char = '\x05';
pub const CTRL_F: char = '\x06';
pub const CTRL_H: char = '\x08';
pub const TAB: char = '\x09';
pub const LF: char = '\x0a';
pub const CTRL_K: char = '\x0b';
pub const CTRL_L: char = '\x0c';
pub const CR: char = '\x0d';
pub const CTRL_N: char = '\x0e';
pub const CTRL_P: char = '\x10';
pub const CTRL_T: char = '\x14';
pub const CTRL_U: char = '\x15';
pub const CTRL_W: char = '\x17';
pub const ESC: char = '\x1b';
pub const BS: char = '\x7f';

/// Window for deciding whether an `ESC` begins a sequence, and for each
/// follow-up rune of one.
pub const ESC_TIMEOUT: Duration = Duration::from_millis(20);

/// One decoded keystroke, ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(char),
    Backspace,
    Delete,
    Swap,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    DeleteLine,
    DeleteToEnd,
    DeletePrevWord,
    HistoryPrev,
    HistoryNext,
    ClearScreen,
    /// TAB with a completion callback installed.
    Complete,
    /// CR: finalize the line.
    Commit,
    /// The configured hotkey: finalize with the hotkey appended.
    Hotkey,
    /// Lone ESC: abandon the line.
    AbandonLine,
    /// Ctrl-C.
    Interrupt,
    /// Ctrl-D: delete-forward, or quit on an empty buffer.
    Eof,
    /// Unrecognized escape sequence; do nothing.
    Ignore,
}

const CONTROL_COMMANDS: &[(char, Command)] = &[
    (CTRL_A, Command::MoveHome),
    (CTRL_B, Command::MoveLeft),
    (CTRL_C, Command::Interrupt),
    (CTRL_D, Command::Eof),
    (CTRL_E, Command::MoveEnd),
    (CTRL_F, Command::MoveRight),
    (CTRL_H, Command::Backspace),
    (CTRL_K, Command::DeleteToEnd),
    (CTRL_L, Command::ClearScreen),
    (CR, Command::Commit),
    (CTRL_N, Command::HistoryNext),
    (CTRL_P, Command::HistoryPrev),
    (CTRL_T, Command::Swap),
    (CTRL_U, Command::DeleteLine),
    (CTRL_W, Command::DeletePrevWord),
    (BS, Command::Backspace),
];

/// `ESC [ <final>` cursor and history keys.
const CSI_FINAL: &[(char, Command)] = &[
    ('A', Command::HistoryPrev),
    ('B', Command::HistoryNext),
    ('C', Command::MoveRight),
    ('D', Command::MoveLeft),
    ('H', Command::MoveHome),
    ('F', Command::MoveEnd),
];

/// `ESC [ <digit> ~` extended keys.
const CSI_TILDE: &[(char, Command)] = &[('3', Command::Delete)];

/// `ESC 0 <final>` home/end variants.
const ESC_DIGIT: &[(char, Command)] = &[('H', Command::MoveHome), ('F', Command::MoveEnd)];

fn lookup(table: &[(char, Command)], rune: char) -> Option<Command> {
    table
        .iter()
        .find(|&&(key, _)| key == rune)
        .map(|&(_, cmd)| cmd)
}

/// Translate one already-read rune into a [`Command`], reading further
/// runes from `ifd` when it opens an escape sequence.
pub fn translate(
    rune: char,
    hotkey: Option<char>,
    has_completion: bool,
    reader: &mut RuneReader,
    ifd: RawFd,
) -> io::Result<Command> {
    if hotkey == Some(rune) {
        return Ok(Command::Hotkey);
    }
    if rune == TAB && has_completion {
        return Ok(Command::Complete);
    }
    if rune == ESC {
        return translate_escape(reader, ifd);
    }
    if let Some(cmd) = lookup(CONTROL_COMMANDS, rune) {
        return Ok(cmd);
    }
    Ok(Command::Insert(rune))
}

/// Disambiguate a just-read `ESC`: silence within the window means the key
/// itself; otherwise parse the sequence. Unknown sequences are consumed and
/// ignored.
fn translate_escape(reader: &mut RuneReader, ifd: RawFd) -> io::Result<Command> {
    if poll::would_block(ifd, ESC_TIMEOUT) {
        return Ok(Command::AbandonLine);
    }
    let s0 = reader.next_rune(ifd, Some(ESC_TIMEOUT))?;
    let s1 = reader.next_rune(ifd, Some(ESC_TIMEOUT))?;
    match s0 {
        '[' if s1.is_ascii_digit() => {
            let s2 = reader.next_rune(ifd, Some(ESC_TIMEOUT))?;
            if s2 == '~' {
                if let Some(cmd) = lookup(CSI_TILDE, s1) {
                    return Ok(cmd);
                }
            }
            Ok(Command::Ignore)
        }
        '[' => Ok(lookup(CSI_FINAL, s1).unwrap_or(Command::Ignore)),
        '0' => Ok(lookup(ESC_DIGIT, s1).unwrap_or(Command::Ignore)),
        _ => Ok(Command::Ignore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_term::fdio::test_support::PipePair;
    use core_term::fdio::write_str;

    fn translate_bytes(first: char, pending: &str) -> Command {
        let p = PipePair::new();
        write_str(p.write_fd, pending).unwrap();
        let mut reader = RuneReader::new();
        translate(first, Some('?'), true, &mut reader, p.read_fd).unwrap()
    }

    #[test]
    fn printable_inserts() {
        assert_eq!(translate_bytes('x', ""), Command::Insert('x'));
        assert_eq!(translate_bytes('界', ""), Command::Insert('界'));
    }

    #[test]
    fn control_keys_map() {
        assert_eq!(translate_bytes(CTRL_A, ""), Command::MoveHome);
        assert_eq!(translate_bytes(CTRL_W, ""), Command::DeletePrevWord);
        assert_eq!(translate_bytes(CR, ""), Command::Commit);
        assert_eq!(translate_bytes(BS, ""), Command::Backspace);
    }

    #[test]
    fn hotkey_wins_over_insert() {
        assert_eq!(translate_bytes('?', ""), Command::Hotkey);
    }

    #[test]
    fn lone_escape_abandons() {
        assert_eq!(translate_bytes(ESC, ""), Command::AbandonLine);
    }

    #[test]
    fn arrow_sequences() {
        assert_eq!(translate_bytes(ESC, "[A"), Command::HistoryPrev);
        assert_eq!(translate_bytes(ESC, "[B"), Command::HistoryNext);
        assert_eq!(translate_bytes(ESC, "[C"), Command::MoveRight);
        assert_eq!(translate_bytes(ESC, "[D"), Command::MoveLeft);
        assert_eq!(translate_bytes(ESC, "[H"), Command::MoveHome);
        assert_eq!(translate_bytes(ESC, "[F"), Command::MoveEnd);
        assert_eq!(translate_bytes(ESC, "0H"), Command::MoveHome);
        assert_eq!(translate_bytes(ESC, "0F"), Command::MoveEnd);
    }

    #[test]
    fn delete_sequence() {
        assert_eq!(translate_bytes(ESC, "[3~"), Command::Delete);
    }

    #[test]
    fn unknown_sequences_are_ignored() {
        assert_eq!(translate_bytes(ESC, "[Z"), Command::Ignore);
        assert_eq!(translate_bytes(ESC, "[5~"), Command::Ignore);
        assert_eq!(translate_bytes(ESC, "xy"), Command::Ignore);
    }

    #[test]
    fn tab_without_completion_inserts() {
        let p = PipePair::new();
        let mut reader = RuneReader::new();
        let cmd = translate(TAB, None, false, &mut reader, p.read_fd).unwrap();
        assert_eq!(cmd, Command::Insert(TAB));
    }
}
