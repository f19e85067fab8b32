//! Thin wrappers over the Linux `futex(2)` syscall.
//!
//! The watched word is an `AtomicU32`; the kernel re-validates its value
//! atomically at wait entry, which is the only ordering guarantee this
//! crate relies on.

use std::io;
use std::ptr;
use std::sync::atomic::AtomicU32;
use std::time::Duration;

use thiserror::Error;

/// How a bounded futex wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The kernel woke us, or the wait returned spuriously.
    Notified,
    /// The timeout elapsed with no wake.
    TimedOut,
    /// The word no longer held the expected value at call entry (EAGAIN);
    /// the wait never blocked.
    ValueMismatch,
}

/// Unclassified futex failure. Timeouts and value mismatches are normal
/// outcomes, not errors; anything else lands here and is fatal to a probe
/// run.
#[derive(Debug, Error)]
pub enum FutexError {
    #[error("futex wait failed: {0}")]
    Wait(#[source] io::Error),
    #[error("futex wake failed: {0}")]
    Wake(#[source] io::Error),
}

/// `FUTEX_WAIT` on `flag` with a relative timeout, expecting `expected`.
pub fn wait(flag: &AtomicU32, expected: u32, timeout: Duration) -> Result<WaitOutcome, FutexError> {
    let ts = libc::timespec {
        tv_sec: timeout.as_secs() as libc::time_t,
        tv_nsec: timeout.subsec_nanos() as libc::c_long,
    };
    let rc = unsafe {
        libc::syscall(
            libc::SYS_futex,
            flag as *const AtomicU32,
            libc::FUTEX_WAIT,
            expected,
            &ts as *const libc::timespec,
            ptr::null::<u32>(),
            0,
        )
    };
    if rc == 0 {
        return Ok(WaitOutcome::Notified);
    }
    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ETIMEDOUT) => Ok(WaitOutcome::TimedOut),
        Some(libc::EAGAIN) => Ok(WaitOutcome::ValueMismatch),
        _ => Err(FutexError::Wait(err)),
    }
}

/// `FUTEX_WAKE` one waiter blocked on `flag`. Returns how many were woken;
/// a wake with nobody blocked wakes zero and is not queued.
pub fn wake_one(flag: &AtomicU32) -> Result<u32, FutexError> {
    let rc = unsafe {
        libc::syscall(
            libc::SYS_futex,
            flag as *const AtomicU32,
            libc::FUTEX_WAKE,
            1,
            ptr::null::<libc::timespec>(),
            ptr::null::<u32>(),
            0,
        )
    };
    if rc < 0 {
        return Err(FutexError::Wake(io::Error::last_os_error()));
    }
    Ok(rc as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wake_with_no_waiter_wakes_zero() {
        let flag = AtomicU32::new(0);
        assert_eq!(wake_one(&flag).unwrap(), 0);
    }

    #[test]
    fn wait_times_out_when_nobody_wakes() {
        let flag = AtomicU32::new(0);
        let outcome = wait(&flag, 0, Duration::from_millis(1)).unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[test]
    fn wait_reports_mismatch_when_value_already_changed() {
        let flag = AtomicU32::new(1);
        let outcome = wait(&flag, 0, Duration::from_millis(1)).unwrap();
        assert_eq!(outcome, WaitOutcome::ValueMismatch);
    }

    #[test]
    fn wait_returns_after_store_and_wake() {
        let flag = Arc::new(AtomicU32::new(0));
        let waker = {
            let flag = Arc::clone(&flag);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                flag.store(1, Ordering::Relaxed);
                wake_one(&flag).unwrap();
            })
        };
        let outcome = wait(&flag, 0, Duration::from_secs(5)).unwrap();
        // If the store lands before we enter the wait, the kernel reports
        // EAGAIN instead of a wake; both mean the flag flipped in time.
        assert_ne!(outcome, WaitOutcome::TimedOut);
        waker.join().unwrap();
    }
}
