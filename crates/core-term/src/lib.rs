//! Terminal backend: raw mode, fd-level I/O, readiness polling, the timed
//! rune reader and terminal geometry.
//!
//! Everything in this crate operates on raw file descriptors because the
//! editor's contract is expressed in terms of an input fd and an output fd;
//! the higher layers never touch a syscall directly.

pub mod fdio;
pub mod geometry;
pub mod poll;
pub mod raw;
pub mod reader;
pub mod screen;

pub use raw::{RawMode, RawModeError};
pub use reader::{RuneReader, NUL};
