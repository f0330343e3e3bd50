//! Arena configuration parameters.

use crate::error::ArenaError;

/// Huge-page backing policy for the arena mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HugePages {
    /// Ordinary pages.
    #[default]
    Off,
    /// Huge pages or nothing: a failed huge-page mapping is an error.
    Required,
    /// Huge pages if the OS can provide them, ordinary pages otherwise.
    Preferred,
}

/// Configuration for the arena allocator.
///
/// Validated before the first mapping; all values are immutable after
/// creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Mapping granularity in bytes.
    ///
    /// The arena is always a whole number of these, whether or not huge
    /// pages are in use. Default: 1 GiB. Must be a power of two and at
    /// least [`MIN_HUGEPAGE_SIZE`](Self::MIN_HUGEPAGE_SIZE).
    pub hugepage_size: usize,

    /// Huge-page backing policy. Default: [`HugePages::Off`].
    pub hugepages: HugePages,
}

impl ArenaConfig {
    /// Default huge-page size: 1 GiB.
    pub const DEFAULT_HUGEPAGE_SIZE: usize = 1 << 30;

    /// Smallest accepted granularity (one ordinary 4 KiB page).
    pub const MIN_HUGEPAGE_SIZE: usize = 4096;

    /// Create a config with the given granularity and backing policy.
    pub fn new(hugepage_size: usize, hugepages: HugePages) -> Self {
        Self {
            hugepage_size,
            hugepages,
        }
    }

    /// Check the structural invariants of this config.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if !self.hugepage_size.is_power_of_two() || self.hugepage_size < Self::MIN_HUGEPAGE_SIZE {
            return Err(ArenaError::InvalidHugePageSize {
                size: self.hugepage_size,
            });
        }
        Ok(())
    }

    /// `log2(hugepage_size)`, the page-size encoding `MAP_HUGETLB` expects.
    pub fn page_bits(&self) -> u8 {
        self.hugepage_size.trailing_zeros() as u8
    }

    /// Size of the mapping needed to hold `byte_size` bytes.
    pub fn aligned_size(&self, byte_size: usize) -> Result<usize, ArenaError> {
        aligned_size(byte_size, self.hugepage_size)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HUGEPAGE_SIZE, HugePages::Off)
    }
}

/// Round `byte_size` up to the next multiple of `granularity`.
///
/// Returns the smallest multiple of `granularity` that is `>= byte_size`.
/// A zero-byte request and a zero granularity are rejected, as is any size
/// whose rounding would overflow `usize`.
pub fn aligned_size(byte_size: usize, granularity: usize) -> Result<usize, ArenaError> {
    if byte_size == 0 {
        return Err(ArenaError::EmptyRequest);
    }
    if granularity == 0 {
        return Err(ArenaError::InvalidHugePageSize { size: 0 });
    }
    let pages = byte_size.div_ceil(granularity);
    pages
        .checked_mul(granularity)
        .ok_or(ArenaError::SizeOverflow {
            requested: byte_size,
            granularity,
        })
}
