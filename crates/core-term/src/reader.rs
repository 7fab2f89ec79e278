//! Timed rune reader: bytes from a descriptor, runes out.
//!
//! The decoder state lives across calls because a multi-byte code point may
//! straddle reads. `NUL` is the out-of-band sentinel for "no input within
//! the window" and for malformed input; callers must never treat it as a
//! typed key.

use crate::fdio;
use crate::poll;
use core_text::{Decoded, Utf8Decoder};
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Sentinel returned on timeout or decode error. Not a valid key.
pub const NUL: char = '\0';

#[derive(Debug, Default)]
pub struct RuneReader {
    dec: Utf8Decoder,
}

impl RuneReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one code point from `fd`. With a timeout, every byte wait is
    /// bounded and `NUL` is returned when nothing arrives in the window;
    /// without one the read blocks. Malformed input also yields `NUL` (the
    /// decoder has already resynchronized).
    pub fn next_rune(&mut self, fd: RawFd, timeout: Option<Duration>) -> io::Result<char> {
        loop {
            if let Some(window) = timeout {
                if !poll::wait_readable(fd, window)? {
                    return Ok(NUL);
                }
            }
            let byte = fdio::read_byte(fd)?;
            match self.dec.add(byte) {
                Decoded::Pending => continue,
                Decoded::Rune(rune, size) => {
                    if size == 1 && rune == char::REPLACEMENT_CHARACTER {
                        // Decode error; the decoder has resynchronized.
                        return Ok(NUL);
                    }
                    return Ok(rune);
                }
            }
        }
    }
}
