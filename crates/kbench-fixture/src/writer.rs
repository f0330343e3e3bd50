//! Fixture writing.
//!
//! Kernels pack several logical arrays end to end inside one arena, so a
//! fixture is usually the concatenation of those arrays in layout order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::FixtureError;

/// Write `values` to `writer` as raw native-endian `f32`.
pub fn write_values<W: Write>(writer: &mut W, values: &[f32]) -> std::io::Result<()> {
    writer.write_all(bytemuck::cast_slice(values))
}

/// Write `arrays` end to end into a fixture at `path`.
///
/// An existing file is replaced. Returns the total number of elements
/// written.
pub fn store_arrays(path: &Path, arrays: &[&[f32]]) -> Result<usize, FixtureError> {
    let file = File::create(path).map_err(|source| FixtureError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let io_err = |source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(file);
    let mut written = 0;
    for array in arrays {
        write_values(&mut writer, array).map_err(io_err)?;
        written += array.len();
    }
    writer.flush().map_err(io_err)?;

    tracing::debug!(path = %path.display(), elements = written, "fixture written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::element_count;

    #[test]
    fn write_values_is_native_endian() {
        let mut buf = Vec::new();
        write_values(&mut buf, &[1.0, -2.5]).unwrap();
        let mut expected = 1.0f32.to_ne_bytes().to_vec();
        expected.extend_from_slice(&(-2.5f32).to_ne_bytes());
        assert_eq!(buf, expected);
    }

    #[test]
    fn arrays_are_concatenated_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packed.bin");
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [5.0f32, 6.0];
        let c = [7.0f32];

        let written = store_arrays(&path, &[&a, &b, &c]).unwrap();
        assert_eq!(written, 7);

        let bytes = std::fs::read(&path).unwrap();
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn existing_fixture_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.bin");
        store_arrays(&path, &[&[0.0; 100]]).unwrap();
        store_arrays(&path, &[&[1.0; 3]]).unwrap();
        assert_eq!(element_count(&path).unwrap(), 3);
    }

    #[test]
    fn unwritable_path_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("fixture.bin");
        let err = store_arrays(&path, &[&[1.0]]).unwrap_err();
        assert!(matches!(err, FixtureError::Open { .. }));
    }
}
