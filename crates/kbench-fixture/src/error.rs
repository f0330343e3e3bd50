//! Error types for fixture loading, verification and writing.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while reading or writing a fixture file.
#[derive(Debug)]
pub enum FixtureError {
    /// The file could not be opened (or created) or its metadata read.
    Open {
        /// The fixture path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The file does not hold exactly the expected number of elements.
    ShapeMismatch {
        /// The fixture path.
        path: PathBuf,
        /// Element count the kernel expects.
        expected: usize,
        /// Whole elements present in the file.
        found: u64,
        /// Raw file length in bytes.
        byte_len: u64,
    },
    /// The destination or comparison buffer is shorter than the fixture.
    BufferTooSmall {
        /// Elements required.
        needed: usize,
        /// Elements available.
        available: usize,
    },
    /// The file ended before all expected elements were read.
    ShortRead {
        /// The fixture path.
        path: PathBuf,
        /// Elements expected.
        expected: usize,
        /// Whole elements actually read.
        read: usize,
    },
    /// Any other I/O error while reading or writing.
    Io {
        /// The fixture path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open fixture {}: {source}", path.display())
            }
            Self::ShapeMismatch {
                path,
                expected,
                found,
                byte_len,
            } => {
                write!(
                    f,
                    "wrong number of values in fixture {}: expected {expected}, got {found} ({byte_len} bytes)",
                    path.display()
                )
            }
            Self::BufferTooSmall { needed, available } => {
                write!(
                    f,
                    "buffer too small for fixture: need {needed} elements, have {available}"
                )
            }
            Self::ShortRead {
                path,
                expected,
                read,
            } => {
                write!(
                    f,
                    "short read from fixture {}: expected {expected} elements, read {read}",
                    path.display()
                )
            }
            Self::Io { path, source } => {
                write!(f, "I/O error on fixture {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
