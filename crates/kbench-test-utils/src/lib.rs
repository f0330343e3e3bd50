//! Test utilities and mock kernels for kbench development.
//!
//! Provides mock [`Kernel`] implementations, a deterministic [`Clock`],
//! and [`FixturePair`] for writing input/output fixtures into a temporary
//! directory. On Linux, [`maps`] inspects the process address space.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
#[cfg(target_os = "linux")]
pub mod maps;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kbench_driver::{Clock, Kernel};

pub use fixtures::{random_values, FixturePair};

/// Does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopKernel;

impl Kernel for NoopKernel {
    fn experiment(&mut self, _buffer: &mut [f32]) {}

    fn name(&self) -> &str {
        "noop"
    }
}

/// Counts invocations through a shared counter.
///
/// Clone the handle from [`calls`](CountingKernel::calls) before moving
/// the kernel into a driver.
#[derive(Clone, Debug, Default)]
pub struct CountingKernel {
    calls: Arc<AtomicUsize>,
}

impl CountingKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared invocation counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Kernel for CountingKernel {
    fn experiment(&mut self, _buffer: &mut [f32]) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Multiplies the first `len` elements by `factor` on every call.
#[derive(Clone, Copy, Debug)]
pub struct ScaleKernel {
    pub factor: f32,
    pub len: usize,
}

impl ScaleKernel {
    pub fn new(factor: f32, len: usize) -> Self {
        Self { factor, len }
    }
}

impl Kernel for ScaleKernel {
    fn experiment(&mut self, buffer: &mut [f32]) {
        for v in &mut buffer[..self.len] {
            *v *= self.factor;
        }
    }

    fn name(&self) -> &str {
        "scale"
    }
}

/// Advances by a fixed step on every reading and counts readings.
#[derive(Clone, Debug)]
pub struct StepClock {
    step: Duration,
    now: Duration,
    reads: Arc<AtomicUsize>,
}

impl StepClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared reading counter.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl Clock for StepClock {
    fn now(&mut self) -> Duration {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.now += self.step;
        self.now
    }
}
