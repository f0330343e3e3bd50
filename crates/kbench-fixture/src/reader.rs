//! Fixture loading.
//!
//! [`load`] copies an input fixture byte-for-byte into an `f32` slice
//! after checking that the file holds exactly the expected number of
//! elements.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::FixtureError;
use crate::ELEMENT_BYTES;

/// Number of whole `f32` elements in the fixture at `path`.
pub fn element_count(path: &Path) -> Result<u64, FixtureError> {
    let metadata = std::fs::metadata(path).map_err(|source| FixtureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(metadata.len() / ELEMENT_BYTES as u64)
}

/// Open `path` and check it holds exactly `expected` elements.
///
/// A trailing partial element counts as a shape mismatch.
pub(crate) fn open_exact(path: &Path, expected: usize) -> Result<File, FixtureError> {
    let file = File::open(path).map_err(|source| FixtureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let byte_len = file
        .metadata()
        .map_err(|source| FixtureError::Open {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let expected_bytes = (expected as u64).checked_mul(ELEMENT_BYTES as u64);
    if expected_bytes != Some(byte_len) {
        return Err(FixtureError::ShapeMismatch {
            path: path.to_path_buf(),
            expected,
            found: byte_len / ELEMENT_BYTES as u64,
            byte_len,
        });
    }
    Ok(file)
}

/// Read into `buf` until it is full or the source is exhausted.
///
/// Returns the number of bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Load the fixture at `path` into the first `expected` elements of `dst`.
///
/// Fails without touching `dst` if the file cannot be opened, does not
/// hold exactly `expected` elements, or `dst` is too short. A file that
/// shrinks while being read fails with [`FixtureError::ShortRead`].
pub fn load(path: &Path, dst: &mut [f32], expected: usize) -> Result<(), FixtureError> {
    let mut file = open_exact(path, expected)?;
    if dst.len() < expected {
        return Err(FixtureError::BufferTooSmall {
            needed: expected,
            available: dst.len(),
        });
    }

    let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut dst[..expected]);
    let read = read_full(&mut file, bytes).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if read < bytes.len() {
        return Err(FixtureError::ShortRead {
            path: path.to_path_buf(),
            expected,
            read: read / ELEMENT_BYTES,
        });
    }

    tracing::info!(path = %path.display(), elements = expected, "fixture loaded");
    Ok(())
}
