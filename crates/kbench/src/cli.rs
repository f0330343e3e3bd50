//! Command line front end shared by all kernel binaries.
//!
//! ```text
//! harness [OPTIONS] [INPUT] [OUTPUT]
//! ```
//!
//! Every option falls back to a `KBENCH_*` environment variable and then
//! to the [`HarnessConfig`] the kernel binary passes to [`launch`]. Only
//! the report goes to stdout; logging goes to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kbench_arena::HugePages;
use kbench_driver::{
    Driver, ExitStatus, HarnessConfig, HarnessError, Kernel, RunMode, RunOutcome, TestFiles,
};

/// Run a kernel under the harness.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "harness", version, about, long_about = None)]
pub struct Cli {
    /// What to do besides running the kernel.
    #[arg(long, value_enum, env = "KBENCH_MODE")]
    pub mode: Option<ModeArg>,

    /// Untimed repetitions before the timed loop (ignored in testing mode).
    #[arg(long, env = "KBENCH_WARMUP")]
    pub warmup: Option<u32>,

    /// Timed repetitions.
    #[arg(long, env = "KBENCH_REPETITIONS")]
    pub repetitions: Option<u32>,

    /// Huge-page backing policy for the arena.
    #[arg(long, value_enum, env = "KBENCH_HUGEPAGES")]
    pub hugepages: Option<HugePagesArg>,

    /// Arena granularity in bytes; a power of two.
    #[arg(long, env = "KBENCH_HUGEPAGE_SIZE")]
    pub hugepage_size: Option<usize>,

    /// Element count of the fixture files, when it differs from the
    /// kernel's element count.
    #[arg(long, env = "KBENCH_TEST_ELEMENTS")]
    pub test_elements: Option<usize>,

    /// Debug-level logging (overridden by `RUST_LOG`).
    #[arg(short, long)]
    pub verbose: bool,

    /// Input fixture, loaded into the arena in testing mode.
    pub input: Option<PathBuf>,

    /// Output fixture, compared against the arena in testing mode.
    pub output: Option<PathBuf>,
}

/// `--mode` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Run the kernel only.
    Functional,
    /// Time the repetitions and print GiB/s.
    Timing,
    /// Load INPUT, run, compare against OUTPUT and print PASS or FAIL.
    Testing,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Functional => RunMode::Functional,
            ModeArg::Timing => RunMode::Timing,
            ModeArg::Testing => RunMode::Testing,
        }
    }
}

/// `--hugepages` values.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HugePagesArg {
    /// Ordinary pages.
    Off,
    /// Huge pages or fail.
    Required,
    /// Huge pages, falling back to ordinary pages.
    Preferred,
}

impl From<HugePagesArg> for HugePages {
    fn from(arg: HugePagesArg) -> Self {
        match arg {
            HugePagesArg::Off => HugePages::Off,
            HugePagesArg::Required => HugePages::Required,
            HugePagesArg::Preferred => HugePages::Preferred,
        }
    }
}

impl Cli {
    /// Apply the options given to `defaults`.
    pub fn configure(&self, defaults: HarnessConfig) -> HarnessConfig {
        let mut config = defaults;
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(warmup) = self.warmup {
            config.warmup = warmup;
        }
        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
        }
        if let Some(hugepages) = self.hugepages {
            config.arena.hugepages = hugepages.into();
        }
        if let Some(size) = self.hugepage_size {
            config.arena.hugepage_size = size;
        }
        if self.test_elements.is_some() {
            config.test_element_count = self.test_elements;
        }
        config
    }

    /// Fixture paths for `mode`.
    ///
    /// `None` outside testing mode. In testing mode both paths are
    /// required.
    pub fn test_files(&self, mode: RunMode) -> Result<Option<TestFiles>, HarnessError> {
        if mode != RunMode::Testing {
            return Ok(None);
        }
        let paths = self.input.iter().chain(self.output.iter());
        TestFiles::from_args(paths.map(|p| p.as_os_str().to_owned())).map(Some)
    }
}

/// Install the stderr logger.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
/// A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Configure and run `kernel` once, writing the report to `out`.
///
/// Fixture paths are checked before the driver is built, so a testing run
/// with missing paths never maps memory.
pub fn execute<K: Kernel, W: Write>(
    cli: &Cli,
    kernel: K,
    defaults: HarnessConfig,
    out: &mut W,
) -> Result<RunOutcome, HarnessError> {
    let config = cli.configure(defaults);
    let files = cli.test_files(config.mode)?;
    let mut driver = Driver::new(config, kernel)?;
    driver.run(files.as_ref(), out)
}

/// Flush the report sink.
///
/// A run that succeeded but whose report could not be flushed fails with
/// [`HarnessError::Output`]. An earlier error takes precedence.
pub fn finish_report<W: Write>(
    result: Result<RunOutcome, HarnessError>,
    out: &mut W,
) -> Result<RunOutcome, HarnessError> {
    let flushed = out.flush();
    match (result, flushed) {
        (Ok(_), Err(e)) => Err(HarnessError::Output(e)),
        (result, _) => result,
    }
}

/// Parse the process arguments, run `kernel`, and return its exit code.
///
/// Call this from the kernel binary's `main`:
///
/// ```rust,no_run
/// # use std::process::ExitCode;
/// fn main() -> ExitCode {
///     kbench::cli::launch(|_: &mut [f32]| {}, kbench::driver::HarnessConfig::new(1024))
/// }
/// ```
pub fn launch<K: Kernel>(kernel: K, defaults: HarnessConfig) -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = finish_report(execute(&cli, kernel, defaults, &mut out), &mut out);

    match &result {
        Ok(outcome) => tracing::debug!(?outcome, "run finished"),
        Err(err @ HarnessError::MissingArguments { .. }) => {
            tracing::error!("{err}");
            eprintln!("{}", Cli::command().render_usage());
        }
        Err(err) => tracing::error!("{err}"),
    }
    ExitStatus::from_result(&result).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("harness").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_options_keeps_defaults() {
        let defaults = HarnessConfig::new(4096);
        let cli = parse(&[]);
        assert_eq!(cli.configure(defaults.clone()), defaults);
        assert!(!cli.verbose);
    }

    #[test]
    fn options_override_defaults() {
        let cli = parse(&[
            "--mode",
            "testing",
            "--warmup",
            "2",
            "--repetitions",
            "9",
            "--hugepages",
            "preferred",
            "--hugepage-size",
            "2097152",
            "--test-elements",
            "640",
            "-v",
            "in.bin",
            "out.bin",
        ]);
        let config = cli.configure(HarnessConfig::new(1000));
        assert_eq!(config.mode, RunMode::Testing);
        assert_eq!(config.warmup, 2);
        assert_eq!(config.repetitions, 9);
        assert_eq!(config.arena.hugepages, HugePages::Preferred);
        assert_eq!(config.arena.hugepage_size, 2 << 20);
        assert_eq!(config.expected_count(), 640);
        assert!(cli.verbose);

        let files = cli.test_files(config.mode).unwrap().unwrap();
        assert_eq!(files.input, PathBuf::from("in.bin"));
        assert_eq!(files.output, PathBuf::from("out.bin"));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["harness", "--mode", "fast"]).is_err());
    }

    #[test]
    fn paths_ignored_outside_testing() {
        let cli = parse(&["only-input.bin"]);
        assert_eq!(cli.test_files(RunMode::Timing).unwrap(), None);
        assert_eq!(cli.test_files(RunMode::Functional).unwrap(), None);
    }

    #[test]
    fn testing_needs_both_paths() {
        let cli = parse(&["only-input.bin"]);
        assert!(matches!(
            cli.test_files(RunMode::Testing),
            Err(HarnessError::MissingArguments { found: 1 })
        ));
        let cli = parse(&[]);
        assert!(matches!(
            cli.test_files(RunMode::Testing),
            Err(HarnessError::MissingArguments { found: 0 })
        ));
    }

    struct UnflushableSink;

    impl Write for UnflushableSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn flush_failure_after_success_exits_74() {
        let result = finish_report(Ok(RunOutcome::Completed), &mut UnflushableSink);
        assert!(matches!(result, Err(HarnessError::Output(_))));
        assert_eq!(ExitStatus::from_result(&result).code(), 74);
    }

    #[test]
    fn flush_failure_keeps_earlier_error() {
        let result = finish_report(
            Err(HarnessError::MissingArguments { found: 1 }),
            &mut UnflushableSink,
        );
        assert!(matches!(
            result,
            Err(HarnessError::MissingArguments { found: 1 })
        ));
    }

    #[test]
    fn successful_flush_keeps_outcome() {
        let result = finish_report(Ok(RunOutcome::Completed), &mut Vec::new());
        assert!(matches!(result, Ok(RunOutcome::Completed)));
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
