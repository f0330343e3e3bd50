//! kbench: a micro-benchmark harness for numeric kernels working on one
//! large flat `f32` buffer.
//!
//! This is the facade crate. It re-exports the sub-crates and provides
//! [`cli::launch`], the entry point every kernel binary calls from `main`.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::process::ExitCode;
//!
//! use kbench::prelude::*;
//!
//! fn main() -> ExitCode {
//!     // Two arrays of 1024 floats, packed end to end.
//!     let n = 1024;
//!     let kernel = move |buf: &mut [f32]| {
//!         let (a, b) = buf[..2 * n].split_at_mut(n);
//!         for (x, y) in a.iter_mut().zip(b.iter()) {
//!             *x += y;
//!         }
//!     };
//!     kbench::cli::launch(kernel, HarnessConfig::new(2 * n))
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `kbench-arena` | Huge-page arena mapping and release |
//! | [`fixture`] | `kbench-fixture` | Reference file loading, verification, generation |
//! | [`driver`] | `kbench-driver` | Run state machine, timing, exit codes |
//! | [`cli`] | this crate | Command line, logging, launcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The benchmark arena (`kbench-arena`).
pub use kbench_arena as arena;

/// Reference fixtures and the tolerance rule (`kbench-fixture`).
pub use kbench_fixture as fixture;

/// The run driver (`kbench-driver`).
///
/// [`driver::Driver`] is the main type; [`driver::Kernel`] is the trait a
/// workload implements (closures over `&mut [f32]` already do).
pub use kbench_driver as driver;

pub mod cli;

/// Common imports for kernel binaries.
pub mod prelude {
    pub use kbench_arena::{ArenaConfig, HugePages};
    pub use kbench_driver::{
        Driver, ExitStatus, HarnessConfig, HarnessError, Kernel, RunMode, RunOutcome, TestFiles,
    };
    pub use kbench_fixture::{Tolerance, Verdict};
}
