//! The kernel data arena.
//!
//! An [`Arena`] is one anonymous mapping viewed as a flat `[f32]`. It is
//! acquired once per run, handed mutably to the kernel for every
//! invocation, and released exactly once via [`Arena::release`].

use memmap2::{MmapMut, MmapOptions};

use crate::config::{ArenaConfig, HugePages};
use crate::error::ArenaError;
use crate::raw;

/// A page-aligned region of `f32` values backing one kernel run.
///
/// The region is `aligned_size` bytes long, a whole multiple of the
/// configured huge-page size, and at least as large as the request.
/// Dropping an arena without calling [`release`](Arena::release) still
/// unmaps it, but any `munmap` error is only logged.
pub struct Arena {
    /// `None` once the mapping has been released.
    map: Option<MmapMut>,
    requested_size: usize,
    aligned_size: usize,
    huge_page_backed: bool,
}

impl Arena {
    /// Map an arena able to hold `byte_size` bytes.
    ///
    /// The mapping is anonymous, private and read/write. With
    /// [`HugePages::Required`] a refused huge-page mapping is an error; with
    /// [`HugePages::Preferred`] it is retried with ordinary pages.
    pub fn acquire(config: &ArenaConfig, byte_size: usize) -> Result<Self, ArenaError> {
        config.validate()?;
        let aligned_size = config.aligned_size(byte_size)?;

        let (map, huge_page_backed) = match config.hugepages {
            HugePages::Off => (map_anon(aligned_size, None)?, false),
            HugePages::Required => (map_anon(aligned_size, Some(config.page_bits()))?, true),
            HugePages::Preferred => match map_anon(aligned_size, Some(config.page_bits())) {
                Ok(map) => (map, true),
                Err(err) => {
                    tracing::warn!(%err, "huge pages unavailable, falling back to ordinary pages");
                    (map_anon(aligned_size, None)?, false)
                }
            },
        };

        tracing::info!(
            requested = byte_size,
            aligned = aligned_size,
            huge = huge_page_backed,
            "arena mapped"
        );

        Ok(Self {
            map: Some(map),
            requested_size: byte_size,
            aligned_size,
            huge_page_backed,
        })
    }

    /// Unmap the arena.
    ///
    /// Consumes the arena, so a region can only be released once.
    pub fn release(mut self) -> Result<(), ArenaError> {
        let size = self.aligned_size;
        match self.map.take() {
            Some(map) => {
                raw::unmap(map).map_err(|source| ArenaError::UnmapFailed { size, source })?;
                tracing::debug!(size, "arena released");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Bytes the caller asked for.
    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    /// Bytes actually mapped.
    pub fn aligned_size(&self) -> usize {
        self.aligned_size
    }

    /// Number of `f32` values the whole mapping holds.
    pub fn element_capacity(&self) -> usize {
        self.aligned_size / std::mem::size_of::<f32>()
    }

    /// Whether the mapping ended up backed by huge pages.
    pub fn is_huge_page_backed(&self) -> bool {
        self.huge_page_backed
    }

    /// Base address of the mapping.
    pub fn as_ptr(&self) -> *const f32 {
        self.as_slice().as_ptr()
    }

    /// The whole mapping as `f32` values.
    pub fn as_slice(&self) -> &[f32] {
        match &self.map {
            Some(map) => bytemuck::cast_slice(&map[..]),
            None => &[],
        }
    }

    /// The whole mapping as mutable `f32` values.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        match &mut self.map {
            Some(map) => bytemuck::cast_slice_mut(&mut map[..]),
            None => &mut [],
        }
    }

    /// Fill the whole mapping with the ramp `element[i] = i`.
    pub fn fill_ramp(&mut self) {
        for (i, v) in self.as_mut_slice().iter_mut().enumerate() {
            *v = i as f32;
        }
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        if let Some(map) = self.map.take() {
            tracing::warn!(size = self.aligned_size, "arena dropped without release");
            if let Err(err) = raw::unmap(map) {
                tracing::error!(%err, size = self.aligned_size, "munmap failed during drop");
            }
        }
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("requested_size", &self.requested_size)
            .field("aligned_size", &self.aligned_size)
            .field("huge_page_backed", &self.huge_page_backed)
            .field("released", &self.map.is_none())
            .finish()
    }
}

fn map_anon(size: usize, page_bits: Option<u8>) -> Result<MmapMut, ArenaError> {
    let mut options = MmapOptions::new();
    options.len(size);
    if page_bits.is_some() {
        options.huge(page_bits);
    }
    options.map_anon().map_err(|source| ArenaError::MapFailed {
        size,
        huge: page_bits.is_some(),
        source,
    })
}
