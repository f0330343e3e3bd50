//! The benchmark driver state machine.
//!
//! [`Driver::run`] walks `Init → Warmup → TimedRun → (Verify | Report) →
//! Done` exactly once. The arena is released on every path once it has
//! been mapped, including when loading or verification fails.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use kbench_arena::Arena;
use kbench_fixture::{Tolerance, Verdict};

use crate::config::{ConfigError, HarnessConfig, RunMode};
use crate::error::HarnessError;
use crate::kernel::Kernel;
use crate::timing::{default_clock, Clock, DefaultClock, Measurement, TimingAccumulator};

/// Driver state. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Arena acquisition and data initialisation.
    Init,
    /// Untimed repetitions.
    Warmup,
    /// Timed repetitions.
    TimedRun,
    /// Comparison against the output fixture (testing mode).
    Verify,
    /// Bandwidth report (timing mode).
    Report,
    /// Arena released; the driver cannot run again.
    Done,
}

/// Fixture paths for a testing run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFiles {
    /// Loaded into the arena before the kernel runs.
    pub input: PathBuf,
    /// Expected arena contents after the timed repetitions.
    pub output: PathBuf,
}

impl TestFiles {
    /// Take the first two positional arguments as input and output paths.
    ///
    /// Extra arguments are ignored. Fewer than two is
    /// [`HarnessError::MissingArguments`].
    pub fn from_args<I, S>(args: I) -> Result<Self, HarnessError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        match (args.next(), args.next()) {
            (Some(input), Some(output)) => Ok(Self {
                input: input.into(),
                output: output.into(),
            }),
            (Some(_), None) => Err(HarnessError::MissingArguments { found: 1 }),
            _ => Err(HarnessError::MissingArguments { found: 0 }),
        }
    }
}

/// How a run ended, when it did not end in an error.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// Functional run: kernel executed, nothing measured or checked.
    Completed,
    /// Testing run: every element within tolerance.
    Passed(Verdict),
    /// Testing run: at least one element outside tolerance.
    Failed(Verdict),
    /// Timing run: accumulated time over the timed repetitions.
    Measured(Measurement),
}

/// Runs one kernel once under one [`HarnessConfig`].
///
/// Generic over the kernel, so the timed loop calls it without dynamic
/// dispatch, and over the [`Clock`], so tests can drive timing
/// deterministically.
pub struct Driver<K: Kernel, C: Clock = DefaultClock> {
    config: HarnessConfig,
    kernel: K,
    clock: C,
    tolerance: Tolerance,
    phase: Phase,
}

impl<K: Kernel> Driver<K> {
    /// Create a driver timing with the platform's [`DefaultClock`].
    pub fn new(config: HarnessConfig, kernel: K) -> Result<Self, HarnessError> {
        let clock = default_clock().map_err(HarnessError::Clock)?;
        Self::with_clock(config, kernel, clock)
    }
}

impl<K: Kernel, C: Clock> Driver<K, C> {
    /// Create a driver with an explicit clock.
    ///
    /// The config is validated here, before anything is mapped.
    pub fn with_clock(config: HarnessConfig, kernel: K, clock: C) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            config,
            kernel,
            clock,
            tolerance: Tolerance::DEFAULT,
            phase: Phase::Init,
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The configuration this driver runs with.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The kernel under test.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Execute the run.
    ///
    /// `files` is required in [`RunMode::Testing`] and ignored otherwise.
    /// Mismatch lines and the `PASS`/`FAIL` verdict, or the bandwidth
    /// figure, are written to `out`.
    pub fn run<W: Write>(
        &mut self,
        files: Option<&TestFiles>,
        out: &mut W,
    ) -> Result<RunOutcome, HarnessError> {
        if self.phase != Phase::Init {
            return Err(HarnessError::AlreadyRun);
        }

        let files = match self.config.mode {
            RunMode::Testing => Some(files.ok_or(HarnessError::MissingArguments { found: 0 })?),
            RunMode::Functional | RunMode::Timing => None,
        };

        let byte_size = self
            .config
            .byte_size()
            .ok_or(ConfigError::ElementCountOverflow {
                element_count: self.config.element_count,
            })?;

        tracing::info!(
            kernel = self.kernel.name(),
            mode = %self.config.mode,
            elements = self.config.element_count,
            repetitions = self.config.repetitions,
            "starting run"
        );

        let mut arena = Arena::acquire(&self.config.arena, byte_size)?;
        let result = self.execute(&mut arena, files, out);
        let released = arena.release();
        self.advance(Phase::Done);

        match (result, released) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(release_err)) => {
                tracing::error!(%release_err, "arena release failed after run error");
                Err(err)
            }
        }
    }

    fn execute<W: Write>(
        &mut self,
        arena: &mut Arena,
        files: Option<&TestFiles>,
        out: &mut W,
    ) -> Result<RunOutcome, HarnessError> {
        match files {
            Some(files) => {
                tracing::info!(input = %files.input.display(), "initializing data");
                kbench_fixture::load(
                    &files.input,
                    arena.as_mut_slice(),
                    self.config.expected_count(),
                )?;
            }
            None => arena.fill_ramp(),
        }

        self.advance(Phase::Warmup);
        if self.config.mode != RunMode::Testing {
            for _ in 0..self.config.warmup {
                self.kernel.experiment(arena.as_mut_slice());
            }
        }

        self.advance(Phase::TimedRun);
        let mut timing = TimingAccumulator::default();
        for _ in 0..self.config.repetitions {
            let buffer = arena.as_mut_slice();
            if self.config.mode == RunMode::Timing {
                let start = self.clock.now();
                self.kernel.experiment(buffer);
                let end = self.clock.now();
                timing.record(start, end);
            } else {
                self.kernel.experiment(buffer);
            }
        }

        if let Some(files) = files {
            self.advance(Phase::Verify);
            return self.verify(arena, files, out);
        }

        if self.config.mode == RunMode::Timing {
            self.advance(Phase::Report);
            // byte_size() was checked in run().
            let bytes = self.config.element_count * std::mem::size_of::<f32>();
            let measurement = timing.finish(bytes);
            writeln!(out, "{:.6}", measurement.bandwidth_gib_s())?;
            tracing::info!(
                elapsed_s = measurement.elapsed.as_secs_f64(),
                repetitions = measurement.repetitions,
                "timed run complete"
            );
            return Ok(RunOutcome::Measured(measurement));
        }

        Ok(RunOutcome::Completed)
    }

    fn verify<W: Write>(
        &mut self,
        arena: &Arena,
        files: &TestFiles,
        out: &mut W,
    ) -> Result<RunOutcome, HarnessError> {
        tracing::info!(output = %files.output.display(), "comparing result");

        let mut write_err = None;
        let verdict = kbench_fixture::verify(
            &files.output,
            arena.as_slice(),
            self.config.expected_count(),
            &self.tolerance,
            |mismatch| {
                if write_err.is_none() {
                    if let Err(e) = writeln!(out, "{mismatch}") {
                        write_err = Some(e);
                    }
                }
            },
        )?;
        if let Some(e) = write_err {
            return Err(e.into());
        }

        if verdict.passed() {
            writeln!(out, "PASS")?;
            Ok(RunOutcome::Passed(verdict))
        } else {
            writeln!(out, "FAIL")?;
            Ok(RunOutcome::Failed(verdict))
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase {:?} -> {next:?}", self.phase);
        tracing::debug!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_args_make_test_files() {
        let files = TestFiles::from_args(["in.bin", "out.bin", "ignored"]).unwrap();
        assert_eq!(files.input, PathBuf::from("in.bin"));
        assert_eq!(files.output, PathBuf::from("out.bin"));
    }

    #[test]
    fn fewer_than_two_args_is_missing_arguments() {
        assert!(matches!(
            TestFiles::from_args(Vec::<String>::new()),
            Err(HarnessError::MissingArguments { found: 0 })
        ));
        assert!(matches!(
            TestFiles::from_args(["in.bin"]),
            Err(HarnessError::MissingArguments { found: 1 })
        ));
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Init < Phase::Warmup);
        assert!(Phase::Warmup < Phase::TimedRun);
        assert!(Phase::TimedRun < Phase::Verify);
        assert!(Phase::Verify < Phase::Report);
        assert!(Phase::Report < Phase::Done);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = HarnessConfig::new(0);
        let result = Driver::new(config, |_: &mut [f32]| {});
        assert!(matches!(
            result,
            Err(HarnessError::Config(ConfigError::ZeroElementCount))
        ));
    }
}
