//! Process exit codes.
//!
//! [`ExitStatus`] is a `repr(u8)` enum with one code per failure class so
//! calling scripts can tell them apart. Conversions from [`RunOutcome`]
//! and [`HarnessError`] are provided.

use kbench_arena::ArenaError;
use kbench_fixture::FixtureError;

use crate::driver::RunOutcome;
use crate::error::HarnessError;

/// Exit code of a harness process.
///
/// `Success` = 0, all failures are non-zero. Values are stable.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Run completed, verification passed, or bandwidth was reported.
    Success = 0,
    /// Verification found at least one mismatching element.
    VerificationFailed = 3,
    /// The arena mapping could not be created.
    MapFailed = 10,
    /// The arena could not be unmapped.
    UnmapFailed = 11,
    /// The timing clock could not be read.
    ClockFailed = 12,
    /// A fixture file could not be opened.
    FileOpen = 20,
    /// A fixture file does not hold the expected number of elements.
    FileShape = 21,
    /// Reading a fixture file failed or came up short.
    FileRead = 22,
    /// Configuration failed validation.
    InvalidConfig = 30,
    /// Testing mode was started without both fixture paths.
    MissingArguments = 64,
    /// The driver was misused (run twice).
    Internal = 70,
    /// The report could not be written to stdout.
    OutputFailed = 74,
}

impl ExitStatus {
    /// Numeric exit code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Exit status for the result of [`Driver::run`](crate::Driver::run).
    pub fn from_result(result: &Result<RunOutcome, HarnessError>) -> Self {
        match result {
            Ok(outcome) => Self::from(outcome),
            Err(err) => Self::from(err),
        }
    }
}

impl From<&RunOutcome> for ExitStatus {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Failed(_) => ExitStatus::VerificationFailed,
            RunOutcome::Completed | RunOutcome::Passed(_) | RunOutcome::Measured(_) => {
                ExitStatus::Success
            }
        }
    }
}

impl From<&ArenaError> for ExitStatus {
    fn from(e: &ArenaError) -> Self {
        match e {
            ArenaError::EmptyRequest
            | ArenaError::SizeOverflow { .. }
            | ArenaError::MapFailed { .. } => ExitStatus::MapFailed,
            ArenaError::InvalidHugePageSize { .. } => ExitStatus::InvalidConfig,
            ArenaError::UnmapFailed { .. } => ExitStatus::UnmapFailed,
        }
    }
}

impl From<&FixtureError> for ExitStatus {
    fn from(e: &FixtureError) -> Self {
        match e {
            FixtureError::Open { .. } => ExitStatus::FileOpen,
            FixtureError::ShapeMismatch { .. } | FixtureError::BufferTooSmall { .. } => {
                ExitStatus::FileShape
            }
            FixtureError::ShortRead { .. } | FixtureError::Io { .. } => ExitStatus::FileRead,
        }
    }
}

impl From<&HarnessError> for ExitStatus {
    fn from(e: &HarnessError) -> Self {
        match e {
            HarnessError::Config(_) => ExitStatus::InvalidConfig,
            HarnessError::MissingArguments { .. } => ExitStatus::MissingArguments,
            HarnessError::Arena(e) => ExitStatus::from(e),
            HarnessError::Fixture(e) => ExitStatus::from(e),
            HarnessError::Clock(_) => ExitStatus::ClockFailed,
            HarnessError::Output(_) => ExitStatus::OutputFailed,
            HarnessError::AlreadyRun => ExitStatus::Internal,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}
