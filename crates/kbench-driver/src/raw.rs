//! Raw clock access.
//!
//! `std::time::Instant` reads `CLOCK_MONOTONIC`, which NTP may slew.
//! Timed repetitions read `CLOCK_MONOTONIC_RAW` instead, through
//! `clock_gettime`. This is the only `unsafe` in the crate.

#![allow(unsafe_code)]

use std::io;
use std::mem::MaybeUninit;
use std::time::Duration;

/// Current `CLOCK_MONOTONIC_RAW` reading.
pub(crate) fn monotonic_raw() -> io::Result<Duration> {
    let mut ts = MaybeUninit::<libc::timespec>::uninit();
    // SAFETY: `ts` points to writable storage for one `timespec` that
    // outlives the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC_RAW, ts.as_mut_ptr()) };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: `clock_gettime` returned 0, so it filled in `ts`.
    let ts = unsafe { ts.assume_init() };
    Ok(Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32))
}
