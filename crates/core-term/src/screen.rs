//! Whole-screen operations and terminal capability checks.

use crate::fdio;
use std::env;
use std::io;
use std::os::unix::io::RawFd;

/// Terminals that cannot be driven with CSI sequences; raw editing is
/// disabled for these and input falls back to plain buffered reads.
const UNSUPPORTED_TERMS: &[&str] = &["dumb", "cons25", "emacs"];

/// Clear the screen and home the cursor.
pub fn clear_screen(ofd: RawFd) -> io::Result<()> {
    fdio::write_str(ofd, "\x1b[H\x1b[2J")
}

/// Ring the terminal bell on stderr. Failures are ignored; a missed beep
/// is not worth interrupting an edit.
pub fn beep() {
    let _ = fdio::write_str(libc::STDERR_FILENO, "\x07");
}

/// True when `$TERM` names a terminal we know we cannot drive.
pub fn unsupported_term() -> bool {
    match env::var("TERM") {
        Ok(term) => UNSUPPORTED_TERMS.contains(&term.as_str()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_list_is_exact() {
        for term in ["dumb", "cons25", "emacs"] {
            assert!(UNSUPPORTED_TERMS.contains(&term));
        }
        assert!(!UNSUPPORTED_TERMS.contains(&"xterm-256color"));
    }
}
