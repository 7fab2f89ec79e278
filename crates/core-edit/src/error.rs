//! Error taxonomy for the editor's public surface.

use core_term::RawModeError;
use std::io;
use std::os::unix::io::RawFd;
use thiserror::Error;

/// Why a `read` ended without a line.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The user asked to leave: Ctrl-C, Ctrl-D on an empty buffer, or end
    /// of stream on non-tty input.
    #[error("quit")]
    Quit,
    /// Raw editing was requested on something that is not a terminal.
    #[error("fd {0} is not a tty")]
    NotATty(RawFd),
    /// A read, write or terminal control call failed in a way the editor
    /// could not paint around.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<RawModeError> for ReadError {
    fn from(err: RawModeError) -> Self {
        match err {
            RawModeError::NotATty(fd) => ReadError::NotATty(fd),
            RawModeError::Io(err) => ReadError::Io(err),
        }
    }
}
