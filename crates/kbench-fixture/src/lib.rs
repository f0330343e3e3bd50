//! Raw f32 reference fixtures for kbench kernel runs.
//!
//! A fixture is a headerless file of native-endian IEEE-754 `f32` values
//! whose length must match the element count the kernel was built for.
//! Testing runs use two of them: an *input* fixture loaded into the arena
//! before the kernel runs, and an *output* fixture the arena is compared
//! against afterwards.
//!
//! # Architecture
//!
//! - [`load`] copies an input fixture into a mutable `f32` slice
//! - [`verify`] streams an output fixture against a slice under a
//!   [`Tolerance`] and reports every [`Mismatch`]
//! - [`store_arrays`] and [`write_values`] produce fixtures, packing
//!   several logical arrays end to end
//!
//! Every file handle is opened, consumed and closed inside a single call.
//! Shape checks (open, byte length) happen before any data is copied or
//! compared.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compare;
pub mod error;
pub mod reader;
pub mod writer;

pub use compare::{verify, Mismatch, Tolerance, Verdict};
pub use error::FixtureError;
pub use reader::{element_count, load};
pub use writer::{store_arrays, write_values};

/// Size of one fixture element in bytes.
pub const ELEMENT_BYTES: usize = std::mem::size_of::<f32>();
