//! Tolerance-based comparison of kernel output against a reference fixture.
//!
//! The reference file is streamed in chunks and compared element by
//! element. Every mismatch is reported; the scan never stops early.

use std::fmt;
use std::io::BufReader;
use std::path::Path;

use crate::error::FixtureError;
use crate::reader::{open_exact, read_full};
use crate::ELEMENT_BYTES;

/// Elements compared per read from the reference file.
const CHUNK_ELEMENTS: usize = 16 * 1024;

/// Acceptance rule for one `(expected, actual)` pair.
///
/// Both values are first snapped to zero when their magnitude is below
/// `zero_snap`. The pair is accepted when the values are equal, when they
/// differ by at most `relative * |expected|`, or when they differ by at
/// most `absolute`. All arithmetic is done in `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Magnitudes below this are treated as exactly zero.
    pub zero_snap: f64,
    /// Relative band as a fraction of `|expected|`.
    pub relative: f64,
    /// Absolute band.
    pub absolute: f64,
}

impl Tolerance {
    /// The rule kernels are validated against: snap below `1e-5`, accept
    /// within 1% or within 1.0.
    pub const DEFAULT: Tolerance = Tolerance {
        zero_snap: 1e-5,
        relative: 0.01,
        absolute: 1.0,
    };

    /// `value` as f64, or `0.0` if its magnitude is below `zero_snap`.
    pub fn snap(&self, value: f32) -> f64 {
        let value = f64::from(value);
        if value.abs() < self.zero_snap {
            0.0
        } else {
            value
        }
    }

    /// Whether `actual` is an acceptable stand-in for `expected`.
    ///
    /// Non-finite values only match an identical value, and NaN matches
    /// nothing.
    pub fn accepts(&self, expected: f32, actual: f32) -> bool {
        let f = self.snap(expected);
        let d = self.snap(actual);
        if d == f {
            return true;
        }
        if !f.is_finite() || !d.is_finite() {
            return false;
        }
        let diff = (d - f).abs();
        diff <= self.relative * f.abs() || diff <= self.absolute
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One element that failed the tolerance rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mismatch {
    /// Element index within the fixture.
    pub index: usize,
    /// Reference value.
    pub expected: f32,
    /// Value found in the arena.
    pub actual: f32,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expected {:.6} is not equal to actual {:.6}",
            self.index, self.expected, self.actual
        )
    }
}

/// Summary of a completed comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Verdict {
    /// Elements compared.
    pub checked: usize,
    /// Elements that failed the tolerance rule.
    pub mismatches: usize,
}

impl Verdict {
    /// `true` iff every element passed.
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

/// Compare the first `expected` elements of `actual` against the fixture at
/// `path`.
///
/// Shape errors (open failure, wrong length, short buffer) are returned
/// before any element is compared. Each failing element is passed to
/// `on_mismatch` in index order.
pub fn verify<F>(
    path: &Path,
    actual: &[f32],
    expected: usize,
    tolerance: &Tolerance,
    mut on_mismatch: F,
) -> Result<Verdict, FixtureError>
where
    F: FnMut(Mismatch),
{
    let file = open_exact(path, expected)?;
    if actual.len() < expected {
        return Err(FixtureError::BufferTooSmall {
            needed: expected,
            available: actual.len(),
        });
    }

    let mut reader = BufReader::new(file);
    let mut chunk = vec![0.0f32; CHUNK_ELEMENTS.min(expected.max(1))];
    let mut verdict = Verdict::default();

    while verdict.checked < expected {
        let want = (expected - verdict.checked).min(chunk.len());
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut chunk[..want]);
        let read = read_full(&mut reader, bytes).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if read < bytes.len() {
            return Err(FixtureError::ShortRead {
                path: path.to_path_buf(),
                expected,
                read: verdict.checked + read / ELEMENT_BYTES,
            });
        }

        let base = verdict.checked;
        for (offset, (&f, &d)) in chunk[..want]
            .iter()
            .zip(&actual[base..base + want])
            .enumerate()
        {
            if !tolerance.accepts(f, d) {
                verdict.mismatches += 1;
                on_mismatch(Mismatch {
                    index: base + offset,
                    expected: f,
                    actual: d,
                });
            }
        }
        verdict.checked += want;
    }

    tracing::info!(
        path = %path.display(),
        checked = verdict.checked,
        mismatches = verdict.mismatches,
        "fixture compared"
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::store_arrays;
    use proptest::prelude::*;

    const T: Tolerance = Tolerance::DEFAULT;

    #[test]
    fn within_relative_band_passes() {
        assert!(T.accepts(100.0, 100.9));
        assert!(T.accepts(-100.0, -100.9));
        assert!(T.accepts(1000.0, 1009.0));
    }

    #[test]
    fn outside_both_bands_fails() {
        assert!(!T.accepts(100.0, 102.5));
        assert!(!T.accepts(1000.0, 1011.0));
        assert!(!T.accepts(0.0, 1.5));
    }

    #[test]
    fn sub_epsilon_values_snap_to_zero() {
        assert!(T.accepts(0.000003, 0.0));
        assert!(T.accepts(0.0, -0.000009));
        assert!(T.accepts(-0.0, 0.0));
        assert_eq!(T.snap(0.000003), 0.0);
        assert_eq!(T.snap(0.5), 0.5);
    }

    #[test]
    fn absolute_band_covers_small_values() {
        assert!(T.accepts(0.5, 1.4));
        assert!(T.accepts(1.5, 0.6));
        assert!(!T.accepts(0.5, 1.6));
    }

    #[test]
    fn nan_is_never_accepted() {
        assert!(!T.accepts(1.0, f32::NAN));
        assert!(!T.accepts(f32::NAN, 1.0));
        assert!(!T.accepts(f32::NAN, f32::NAN));
    }

    #[test]
    fn infinities_match_only_themselves() {
        assert!(T.accepts(f32::INFINITY, f32::INFINITY));
        assert!(!T.accepts(f32::INFINITY, f32::NEG_INFINITY));
        assert!(!T.accepts(f32::INFINITY, 1.0e30));
    }

    #[test]
    fn mismatch_line_format() {
        let m = Mismatch {
            index: 7,
            expected: 2.0,
            actual: 9.5,
        };
        assert_eq!(
            m.to_string(),
            "7 expected 2.000000 is not equal to actual 9.500000"
        );
    }

    #[test]
    fn verify_reports_every_mismatch_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        let reference: Vec<f32> = (0..1000).map(|i| i as f32 * 10.0).collect();
        store_arrays(&path, &[&reference]).unwrap();

        let mut actual = reference.clone();
        actual[3] += 500.0;
        actual[400] = -1.0;
        actual[999] = f32::NAN;

        let mut seen = Vec::new();
        let verdict = verify(&path, &actual, reference.len(), &T, |m| seen.push(m)).unwrap();

        assert!(!verdict.passed());
        assert_eq!(verdict.checked, 1000);
        assert_eq!(verdict.mismatches, 3);
        let indices: Vec<usize> = seen.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![3, 400, 999]);
        assert_eq!(seen[1].expected, 4000.0);
        assert_eq!(seen[1].actual, -1.0);
    }

    #[test]
    fn verify_spans_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        let n = CHUNK_ELEMENTS * 2 + 17;
        let reference = vec![3.0f32; n];
        store_arrays(&path, &[&reference]).unwrap();

        let mut actual = reference.clone();
        actual[CHUNK_ELEMENTS] = 50.0;
        actual[n - 1] = 50.0;

        let mut seen = Vec::new();
        let verdict = verify(&path, &actual, n, &T, |m| seen.push(m.index)).unwrap();
        assert_eq!(verdict.checked, n);
        assert_eq!(seen, vec![CHUNK_ELEMENTS, n - 1]);
    }

    #[test]
    fn verify_ignores_data_past_expected_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        store_arrays(&path, &[&[1.0, 2.0]]).unwrap();

        let actual = [1.0, 2.0, 99.0, 99.0];
        let verdict = verify(&path, &actual, 2, &T, |_| panic!("no mismatch expected")).unwrap();
        assert!(verdict.passed());
    }

    #[test]
    fn shape_mismatch_aborts_before_comparing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        store_arrays(&path, &[&[0.0; 9]]).unwrap();

        let actual = vec![1000.0f32; 10];
        let mut called = false;
        let err = verify(&path, &actual, 10, &T, |_| called = true).unwrap_err();
        assert!(matches!(err, FixtureError::ShapeMismatch { found: 9, .. }));
        assert!(!called);
    }

    #[test]
    fn short_actual_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.bin");
        store_arrays(&path, &[&[0.0; 4]]).unwrap();

        let err = verify(&path, &[0.0; 2], 4, &T, |_| {}).unwrap_err();
        assert!(matches!(err, FixtureError::BufferTooSmall { .. }));
    }

    proptest! {
        #[test]
        fn identical_finite_values_always_pass(v in proptest::num::f32::NORMAL) {
            prop_assert!(T.accepts(v, v));
        }

        #[test]
        fn drift_within_one_percent_passes(
            v in 100.0f32..1.0e6,
            frac in -0.009f64..0.009,
        ) {
            let actual = (f64::from(v) * (1.0 + frac)) as f32;
            prop_assert!(T.accepts(v, actual));
        }

        #[test]
        fn small_values_within_absolute_band_pass(
            v in -50.0f32..50.0,
            delta in -0.99f32..0.99,
        ) {
            prop_assert!(T.accepts(v, v + delta));
        }
    }
}
