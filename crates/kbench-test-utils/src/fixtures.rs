//! Fixture generation helpers.
//!
//! [`FixturePair`] owns a temporary directory holding an `input.bin` /
//! `output.bin` pair, the layout a testing run expects.

use std::path::PathBuf;

use kbench_driver::TestFiles;
use kbench_fixture::store_arrays;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

/// Deterministic pseudo-random values in `[-5.0, 4.9]` with one decimal,
/// the range kbench fixtures are drawn from.
pub fn random_values(seed: u64, len: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| (rng.next_u32() % 100) as f32 / 10.0 - 5.0)
        .collect()
}

/// An input/output fixture pair in its own temporary directory.
pub struct FixturePair {
    dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl FixturePair {
    /// Write `input` and `output` as single-array fixtures.
    pub fn new(input: &[f32], output: &[f32]) -> Self {
        Self::packed(&[input], &[output])
    }

    /// Write fixtures whose arrays are packed end to end.
    pub fn packed(input: &[&[f32]], output: &[&[f32]]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create fixture dir");
        let input_path = dir.path().join("input.bin");
        let output_path = dir.path().join("output.bin");
        store_arrays(&input_path, input).expect("failed to write input fixture");
        store_arrays(&output_path, output).expect("failed to write output fixture");
        Self {
            dir,
            input: input_path,
            output: output_path,
        }
    }

    /// A path inside the fixture directory that does not exist.
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Paths as the driver takes them.
    pub fn test_files(&self) -> TestFiles {
        TestFiles {
            input: self.input.clone(),
            output: self.output.clone(),
        }
    }
}
