//! Matrix-vector product under the harness.
//!
//! ```text
//! cargo run --release --example mxv                                  # GiB/s
//! cargo run --release --example mxv_fixtures -- /tmp/mxv
//! cargo run --release --example mxv -- --mode testing /tmp/mxv/input.bin /tmp/mxv/output.bin
//! ```
//!
//! `MXV_P` sets the matrix dimension (default 1024) and must match the
//! one the fixtures were generated with.

use std::process::ExitCode;

use kbench::prelude::*;
use kbench_bench::Mxv;

fn main() -> ExitCode {
    let p = std::env::var("MXV_P")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1024);
    let kernel = Mxv::new(p);

    let mut defaults = HarnessConfig::new(kernel.element_count());
    defaults.warmup = 1;
    kbench::cli::launch(kernel, defaults)
}
