//! The kernel contract.

/// An opaque numeric workload run by the [`Driver`](crate::Driver).
///
/// The kernel gets the whole arena on every call and may read or write
/// anywhere inside it. How it lays out its arrays inside the buffer is
/// between the kernel and whoever produced its fixtures; the driver never
/// looks. The driver is generic over the kernel type, so each call is
/// statically dispatched.
pub trait Kernel {
    /// Run one repetition of the workload in place.
    fn experiment(&mut self, buffer: &mut [f32]);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Kernel for F
where
    F: FnMut(&mut [f32]),
{
    fn experiment(&mut self, buffer: &mut [f32]) {
        self(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_kernels() {
        let mut calls = 0;
        let mut kernel = |buf: &mut [f32]| {
            calls += 1;
            buf[0] += 1.0;
        };
        let mut data = [0.0f32; 4];
        kernel.experiment(&mut data);
        kernel.experiment(&mut data);
        assert_eq!(data[0], 2.0);
        assert_eq!(calls, 2);
    }

    #[test]
    fn default_name_is_type_name() {
        struct Stencil;
        impl Kernel for Stencil {
            fn experiment(&mut self, _buffer: &mut [f32]) {}
        }
        assert!(Stencil.name().ends_with("Stencil"));
    }
}
