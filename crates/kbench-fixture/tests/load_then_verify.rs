//! Integration test: a packed input/output fixture pair round trip.
//!
//! Mirrors how a kernel author prepares a testing run: several logical
//! arrays are packed end to end, loaded into a buffer, transformed, and
//! compared against the packed expected output.

use kbench_fixture::{load, store_arrays, verify, FixtureError, Tolerance};

#[test]
fn packed_arrays_load_and_verify() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let output = dir.path().join("output.bin");

    let a: Vec<f32> = (0..64).map(|i| i as f32 * 0.5).collect();
    let b: Vec<f32> = (0..8).map(|i| -(i as f32)).collect();
    let n = store_arrays(&input, &[&a, &b]).unwrap();
    assert_eq!(n, 72);

    // Expected: every value doubled.
    let a2: Vec<f32> = a.iter().map(|v| v * 2.0).collect();
    let b2: Vec<f32> = b.iter().map(|v| v * 2.0).collect();
    store_arrays(&output, &[&a2, &b2]).unwrap();

    let mut buffer = vec![0.0f32; 128];
    load(&input, &mut buffer, n).unwrap();
    for v in &mut buffer[..n] {
        *v *= 2.0;
    }

    let mut lines = Vec::new();
    let verdict = verify(&output, &buffer, n, &Tolerance::DEFAULT, |m| {
        lines.push(m.to_string())
    })
    .unwrap();
    assert!(verdict.passed(), "unexpected mismatches: {lines:?}");
    assert_eq!(verdict.checked, 72);
}

#[test]
fn override_count_must_match_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.bin");
    store_arrays(&input, &[&[1.0; 16]]).unwrap();

    let mut buffer = vec![0.0f32; 32];
    load(&input, &mut buffer, 16).unwrap();
    let err = load(&input, &mut buffer, 32).unwrap_err();
    assert!(matches!(
        err,
        FixtureError::ShapeMismatch {
            expected: 32,
            found: 16,
            ..
        }
    ));
}
