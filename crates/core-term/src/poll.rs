//! Readiness waits on a single descriptor via `select(2)`.
//!
//! The editor never multiplexes more than one input source; the only use of
//! `select` here is bounding a read with a short window (escape-sequence
//! disambiguation, the loop-utility poll, and the cursor-position query).

use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use std::ptr;
use std::time::Duration;

/// Wait until `fd` is readable or `timeout` elapses. Returns whether the
/// descriptor was readable.
pub fn wait_readable(fd: RawFd, timeout: Duration) -> io::Result<bool> {
    loop {
        let mut readfds: libc::fd_set = unsafe { mem::zeroed() };
        unsafe {
            libc::FD_ZERO(&mut readfds);
            libc::FD_SET(fd, &mut readfds);
        }
        let mut tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        let n = unsafe {
            libc::select(
                fd + 1,
                &mut readfds,
                ptr::null_mut(),
                ptr::null_mut(),
                &mut tv,
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        return Ok(n > 0);
    }
}

/// True when nothing becomes readable on `fd` within `timeout`. A failed
/// wait is logged and reported as "input pending" so the caller falls
/// through to an ordinary read instead of misreading a lone escape.
pub fn would_block(fd: RawFd, timeout: Duration) -> bool {
    match wait_readable(fd, timeout) {
        Ok(ready) => !ready,
        Err(err) => {
            tracing::warn!(target: "term.poll", %err, fd, "select_error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdio::test_support::PipePair;
    use crate::fdio::write_str;

    #[test]
    fn empty_pipe_times_out() {
        let p = PipePair::new();
        assert!(!wait_readable(p.read_fd, Duration::from_millis(10)).unwrap());
        assert!(would_block(p.read_fd, Duration::from_millis(10)));
    }

    #[test]
    fn pending_byte_is_ready() {
        let p = PipePair::new();
        write_str(p.write_fd, "x").unwrap();
        assert!(wait_readable(p.read_fd, Duration::from_millis(10)).unwrap());
        assert!(!would_block(p.read_fd, Duration::from_millis(10)));
    }
}
