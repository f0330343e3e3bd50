//! Top-level harness error type.

use std::error::Error;
use std::fmt;
use std::io;

use kbench_arena::ArenaError;
use kbench_fixture::FixtureError;

use crate::config::ConfigError;

/// Errors that end a harness run.
///
/// A verification mismatch is not an error; it is a
/// [`RunOutcome::Failed`](crate::RunOutcome::Failed).
#[derive(Debug)]
pub enum HarnessError {
    /// Configuration failed validation.
    Config(ConfigError),
    /// Testing mode was started without both fixture paths.
    MissingArguments {
        /// Paths actually supplied.
        found: usize,
    },
    /// The arena could not be mapped or unmapped.
    Arena(ArenaError),
    /// A fixture could not be opened, had the wrong shape, or could not be read.
    Fixture(FixtureError),
    /// The timing clock could not be read.
    Clock(io::Error),
    /// Writing the report to the output sink failed.
    Output(io::Error),
    /// [`Driver::run`](crate::Driver::run) was called on a driver that has
    /// already run.
    AlreadyRun,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::MissingArguments { found } => write!(
                f,
                "expected input file and output file for check, got {found} path(s)"
            ),
            Self::Arena(e) => write!(f, "{e}"),
            Self::Fixture(e) => write!(f, "{e}"),
            Self::Clock(e) => write!(f, "cannot read the monotonic clock: {e}"),
            Self::Output(e) => write!(f, "cannot write report: {e}"),
            Self::AlreadyRun => write!(f, "driver has already run"),
        }
    }
}

impl Error for HarnessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Arena(e) => Some(e),
            Self::Fixture(e) => Some(e),
            Self::Clock(e) | Self::Output(e) => Some(e),
            Self::MissingArguments { .. } | Self::AlreadyRun => None,
        }
    }
}

impl From<ConfigError> for HarnessError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ArenaError> for HarnessError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

impl From<FixtureError> for HarnessError {
    fn from(e: FixtureError) -> Self {
        Self::Fixture(e)
    }
}

impl From<io::Error> for HarnessError {
    fn from(e: io::Error) -> Self {
        Self::Output(e)
    }
}
