//! Demonstration kernels for the kbench harness.
//!
//! - [`Mxv`]: textbook matrix-vector product, the harness's reference
//!   workload
//! - [`Triad`]: STREAM-style triad, a pure bandwidth probe
//!
//! Both document the arena layout their fixtures use.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use kbench::driver::Kernel;

/// `C = beta * C + alpha * A * B` for a `P x P` matrix `A`.
///
/// Arena layout, packed end to end: `A[P*P] | B[P] | C[P]`, so the kernel
/// needs `P*P + 2P` elements.
#[derive(Clone, Copy, Debug)]
pub struct Mxv {
    /// Matrix dimension.
    pub p: usize,
    pub alpha: f32,
    pub beta: f32,
}

impl Mxv {
    /// Coefficients used by the reference fixtures.
    pub const ALPHA: f32 = 4.5;
    pub const BETA: f32 = -1.1;

    pub fn new(p: usize) -> Self {
        Self {
            p,
            alpha: Self::ALPHA,
            beta: Self::BETA,
        }
    }

    /// Elements the layout occupies.
    pub fn element_count(&self) -> usize {
        self.p * self.p + 2 * self.p
    }

    /// Apply one repetition to a host-side copy of the layout.
    pub fn apply(&self, buffer: &mut [f32]) {
        let p = self.p;
        let (a, rest) = buffer.split_at_mut(p * p);
        let (b, rest) = rest.split_at_mut(p);
        let c = &mut rest[..p];
        for (i, ci) in c.iter_mut().enumerate() {
            let row = &a[i * p..(i + 1) * p];
            let dot: f32 = row.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
            *ci = self.beta * *ci + self.alpha * dot;
        }
    }
}

impl Kernel for Mxv {
    fn experiment(&mut self, buffer: &mut [f32]) {
        self.apply(buffer);
    }

    fn name(&self) -> &str {
        "mxv"
    }
}

/// `A = B + s * C` over three arrays of `len` elements.
///
/// Arena layout: `A[len] | B[len] | C[len]`.
#[derive(Clone, Copy, Debug)]
pub struct Triad {
    pub len: usize,
    pub scalar: f32,
}

impl Triad {
    pub fn new(len: usize) -> Self {
        Self { len, scalar: 3.0 }
    }

    pub fn element_count(&self) -> usize {
        3 * self.len
    }
}

impl Kernel for Triad {
    fn experiment(&mut self, buffer: &mut [f32]) {
        let (a, rest) = buffer.split_at_mut(self.len);
        let (b, c) = rest.split_at(self.len);
        for ((x, y), z) in a.iter_mut().zip(b).zip(&c[..self.len]) {
            *x = y + self.scalar * z;
        }
    }

    fn name(&self) -> &str {
        "triad"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mxv_matches_hand_computation() {
        // A = [[1, 2], [3, 4]], B = [1, 1], C = [10, 20]
        let mut buf = [1.0, 2.0, 3.0, 4.0, 1.0, 1.0, 10.0, 20.0];
        let mut k = Mxv {
            p: 2,
            alpha: 2.0,
            beta: 0.5,
        };
        assert_eq!(k.element_count(), 8);
        k.experiment(&mut buf);
        assert_eq!(&buf[6..], &[0.5 * 10.0 + 2.0 * 3.0, 0.5 * 20.0 + 2.0 * 7.0]);
        assert_eq!(&buf[..6], &[1.0, 2.0, 3.0, 4.0, 1.0, 1.0]);
    }

    #[test]
    fn triad_writes_only_first_array() {
        let mut buf = [0.0, 0.0, 1.0, 2.0, 10.0, 20.0];
        Triad::new(2).experiment(&mut buf);
        assert_eq!(buf, [31.0, 62.0, 1.0, 2.0, 10.0, 20.0]);
    }
}
