//! Aggregate timing of the repetition loop.
//!
//! Each timed repetition contributes one start/end pair; only their sum
//! and count are kept. The reported figure is an aggregate rate, not a
//! per-iteration distribution.
//!
//! On Linux the driver times with `MonotonicRawClock`, which is immune
//! to NTP slewing; elsewhere it falls back to [`InstantClock`].

use std::io;
use std::time::{Duration, Instant};

/// Bytes in one GiB, the unit bandwidth is reported in.
pub const GIB: f64 = (1u64 << 30) as f64;

/// A monotonic time source.
///
/// Readings are offsets from an arbitrary fixed origin; only differences
/// between two readings are meaningful.
pub trait Clock {
    /// Current reading.
    fn now(&mut self) -> Duration;
}

/// [`Clock`] backed by [`Instant`], the platform's monotonic clock.
#[derive(Clone, Copy, Debug)]
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// [`Clock`] reading `CLOCK_MONOTONIC_RAW`.
///
/// Readings never decrease. A failed read after construction repeats the
/// previous reading.
#[cfg(target_os = "linux")]
#[derive(Clone, Copy, Debug)]
pub struct MonotonicRawClock {
    last: Duration,
}

#[cfg(target_os = "linux")]
impl MonotonicRawClock {
    /// Create the clock, checking that the raw clock can be read.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            last: crate::raw::monotonic_raw()?,
        })
    }
}

#[cfg(target_os = "linux")]
impl Clock for MonotonicRawClock {
    fn now(&mut self) -> Duration {
        match crate::raw::monotonic_raw() {
            Ok(reading) => self.last = self.last.max(reading),
            Err(err) => tracing::warn!(%err, "raw clock read failed"),
        }
        self.last
    }
}

/// The clock [`Driver::new`](crate::Driver::new) times with.
#[cfg(target_os = "linux")]
pub type DefaultClock = MonotonicRawClock;

/// The clock [`Driver::new`](crate::Driver::new) times with.
#[cfg(not(target_os = "linux"))]
pub type DefaultClock = InstantClock;

pub(crate) fn default_clock() -> io::Result<DefaultClock> {
    #[cfg(target_os = "linux")]
    {
        MonotonicRawClock::new()
    }
    #[cfg(not(target_os = "linux"))]
    {
        Ok(InstantClock::new())
    }
}

/// Running total of timed repetitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingAccumulator {
    total: Duration,
    samples: u32,
}

impl TimingAccumulator {
    /// Add the interval between two clock readings.
    ///
    /// A reading pair that goes backwards counts as zero.
    pub fn record(&mut self, start: Duration, end: Duration) {
        self.total += end.saturating_sub(start);
        self.samples += 1;
    }

    /// Sum of all recorded intervals.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of recorded intervals.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Freeze into a [`Measurement`] for a kernel touching
    /// `bytes_per_repetition` bytes per call.
    pub fn finish(self, bytes_per_repetition: usize) -> Measurement {
        Measurement {
            bytes_per_repetition,
            repetitions: self.samples,
            elapsed: self.total,
        }
    }
}

/// Result of a timed run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// `N * 4`.
    pub bytes_per_repetition: usize,
    /// Timed repetitions that contributed to `elapsed`.
    pub repetitions: u32,
    /// Accumulated time across all timed repetitions.
    pub elapsed: Duration,
}

impl Measurement {
    /// Achieved bandwidth in GiB/s:
    /// `bytes_per_repetition * repetitions / elapsed / 2^30`.
    ///
    /// Infinite if `elapsed` is zero.
    pub fn bandwidth_gib_s(&self) -> f64 {
        let bytes = self.bytes_per_repetition as f64 * f64::from(self.repetitions);
        bytes / self.elapsed.as_secs_f64() / GIB
    }
}
