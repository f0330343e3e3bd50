//! Arena-specific error types.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors that can occur while mapping or unmapping the arena.
#[derive(Debug)]
pub enum ArenaError {
    /// A zero-byte arena was requested.
    EmptyRequest,
    /// Rounding the request up to the page granularity overflowed.
    SizeOverflow {
        /// Number of bytes requested.
        requested: usize,
        /// Page granularity the request was rounded to.
        granularity: usize,
    },
    /// The configured huge-page size is not a power of two of at least 4 KiB.
    InvalidHugePageSize {
        /// The rejected size in bytes.
        size: usize,
    },
    /// The OS refused the anonymous mapping.
    MapFailed {
        /// Size of the mapping that was refused, in bytes.
        size: usize,
        /// Whether huge-page backing was requested.
        huge: bool,
        /// The underlying OS error.
        source: io::Error,
    },
    /// `munmap` reported an error for a region this arena mapped.
    UnmapFailed {
        /// Size of the region, in bytes.
        size: usize,
        /// The underlying OS error.
        source: io::Error,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRequest => write!(f, "arena request of zero bytes"),
            Self::SizeOverflow {
                requested,
                granularity,
            } => {
                write!(
                    f,
                    "arena size overflow: {requested} bytes cannot be rounded to a multiple of {granularity}"
                )
            }
            Self::InvalidHugePageSize { size } => {
                write!(
                    f,
                    "invalid huge-page size {size}: must be a power of two of at least 4096 bytes"
                )
            }
            Self::MapFailed { size, huge, source } => {
                let backing = if *huge { "huge-page" } else { "anonymous" };
                write!(f, "{backing} mmap of {size} bytes failed: {source}")
            }
            Self::UnmapFailed { size, source } => {
                write!(f, "munmap of {size} bytes failed: {source}")
            }
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MapFailed { source, .. } | Self::UnmapFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl PartialEq for ArenaError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmptyRequest, Self::EmptyRequest) => true,
            (
                Self::SizeOverflow {
                    requested: a,
                    granularity: b,
                },
                Self::SizeOverflow {
                    requested: c,
                    granularity: d,
                },
            ) => a == c && b == d,
            (Self::InvalidHugePageSize { size: a }, Self::InvalidHugePageSize { size: b }) => {
                a == b
            }
            (
                Self::MapFailed {
                    size: a, huge: b, ..
                },
                Self::MapFailed {
                    size: c, huge: d, ..
                },
            ) => a == c && b == d,
            (Self::UnmapFailed { size: a, .. }, Self::UnmapFailed { size: b, .. }) => a == b,
            _ => false,
        }
    }
}
