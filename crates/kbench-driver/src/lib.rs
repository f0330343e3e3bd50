//! Benchmark driver for kbench kernels.
//!
//! The [`Driver`] owns one run of one kernel: it maps the arena, fills it
//! (synthetic ramp, or an input fixture in testing mode), runs the warmup
//! and timed repetitions, then either verifies the arena against an output
//! fixture or reports the achieved bandwidth.
//!
//! ```text
//! INIT ──▶ WARMUP ──▶ TIMED_RUN ──┬──▶ VERIFY ──┬──▶ DONE
//!                                 └──▶ REPORT ──┘
//! ```
//!
//! Nothing in this crate exits the process. Failures are [`HarnessError`]
//! values and [`ExitStatus`] maps a finished run to a process exit code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod kernel;
#[cfg(target_os = "linux")]
mod raw;
pub mod status;
pub mod timing;

pub use config::{ConfigError, HarnessConfig, RunMode};
pub use driver::{Driver, Phase, RunOutcome, TestFiles};
pub use error::HarnessError;
pub use kernel::Kernel;
pub use status::ExitStatus;
#[cfg(target_os = "linux")]
pub use timing::MonotonicRawClock;
pub use timing::{Clock, DefaultClock, InstantClock, Measurement, TimingAccumulator};
