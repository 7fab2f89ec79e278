//! Raw terminal mode with guaranteed restoration.
//!
//! `RawMode::enable` snapshots the current termios attributes, applies the
//! raw-mode mask and hands back a guard. Dropping the guard restores the
//! snapshot, so any early return or panic between enable and the explicit
//! `restore` still leaves the terminal usable.

use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RawModeError {
    #[error("fd {0} is not a tty")]
    NotATty(RawFd),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Guard holding the pre-raw termios snapshot for one descriptor.
pub struct RawMode {
    fd: RawFd,
    saved: libc::termios,
    active: bool,
}

impl RawMode {
    /// Put `fd` into raw mode: no line buffering, no echo, no signal keys,
    /// no output post-processing, 8-bit characters, one-byte blocking reads.
    pub fn enable(fd: RawFd) -> Result<Self, RawModeError> {
        if unsafe { libc::isatty(fd) } == 0 {
            return Err(RawModeError::NotATty(fd));
        }
        let mut saved: libc::termios = unsafe { mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut saved) } != 0 {
            return Err(io::Error::last_os_error().into());
        }
        let mut mode = saved;
        mode.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::INLCR
            | libc::IGNCR
            | libc::ICRNL
            | libc::IXON);
        mode.c_oflag &= !libc::OPOST;
        mode.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
        mode.c_cflag &= !(libc::CSIZE | libc::PARENB);
        mode.c_cflag |= libc::CS8;
        mode.c_cc[libc::VMIN] = 1;
        mode.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &mode) } != 0 {
            return Err(io::Error::last_os_error().into());
        }
        Ok(Self {
            fd,
            saved,
            active: true,
        })
    }

    /// Restore the saved attributes, consuming the guard.
    pub fn restore(mut self) -> io::Result<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.restore_inner() {
            tracing::warn!(target: "term.raw", %err, fd = self.fd, "restore_failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdio::test_support::PipePair;

    #[test]
    fn enable_refuses_non_tty() {
        let p = PipePair::new();
        match RawMode::enable(p.read_fd) {
            Err(RawModeError::NotATty(fd)) => assert_eq!(fd, p.read_fd),
            other => panic!("expected NotATty, got {:?}", other.map(|_| ())),
        }
    }
}
