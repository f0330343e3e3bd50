//! Huge-page-aligned memory arenas for kbench kernel runs.
//!
//! A kernel run needs exactly one large, contiguous, page-aligned region
//! of `f32` values. This crate obtains it as an anonymous private mapping,
//! optionally backed by huge pages, and gives it back to the OS exactly
//! once. It is the only kbench crate that contains `unsafe` code, all of
//! it confined to the private `raw` module.
//!
//! # Architecture
//!
//! ```text
//! Arena (one per run, owned by the driver)
//! ├── MmapMut (anonymous, private, read/write, aligned_size bytes)
//! ├── requested_size  (N * 4 bytes, what the kernel asked for)
//! └── aligned_size    (requested_size rounded up to the huge-page size)
//! ```
//!
//! # Huge pages
//!
//! - **Off:** ordinary pages; the region is still sized in huge-page units.
//! - **Required:** `MAP_HUGETLB` with the configured page size; failure is
//!   a [`ArenaError::MapFailed`].
//! - **Preferred:** try huge pages, fall back to ordinary pages with a
//!   warning.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
mod raw;
pub mod region;

pub use config::{aligned_size, ArenaConfig, HugePages};
pub use error::ArenaError;
pub use region::Arena;
