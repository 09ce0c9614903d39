//! Boundary to the accelerator BLAS library and its runtime
//!
//! Backends own the whole device round trip for a single SCAL call:
//!
//! 1. create a library handle
//! 2. allocate a device buffer and copy the host vector into it
//! 3. run SCAL with `alpha` passed from host memory
//! 4. copy the result back, which blocks until the device has finished
//! 5. destroy the handle and release device memory
//!
//! Every failing library or runtime call is turned into
//! [ScalError::Status](../error/enum.ScalError.html) tagged with its [Step].

use std::mem;

use crate::error::*;
use crate::real::Real;
use crate::reference::{blas_int, check_args};

pub trait Accelerator {
    /// Human readable device description
    fn name(&self) -> String;

    /// `x[i * incx] = alpha * x[i * incx]` for `i` in `0..n`, computed on the device.
    /// `x` is overwritten by the device result.
    fn scal<T: Real>(&mut self, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()>;
}

/// Host and device buffers of a copy must hold the same number of elements
pub(crate) fn check_copy_len(step: Step, host: usize, device: usize) -> Result<()> {
    if host != device {
        return Err(err_msg(
            step,
            &format!("host buffer has {} elements, device buffer {}", host, device),
        ));
    }
    Ok(())
}

/// Device memory of [Emulated], kept apart from host memory
#[derive(Debug)]
struct DeviceBuffer<T> {
    data: Vec<T>,
}

/// Accelerator emulated in host memory
///
/// Mirrors the allocate / copy / compute / copy back sequence of a real
/// device, with an optional memory limit and an injectable failure so callers
/// can exercise the error path without hardware.
#[derive(Debug, Clone, Default)]
pub struct Emulated {
    memory_limit: Option<usize>,
    fail_at: Option<Step>,
    allocated: usize,
    calls: usize,
}

impl Emulated {
    pub fn new() -> Self {
        Emulated::default()
    }

    /// Refuse allocations larger than `bytes`
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    /// Make the device call at `step` report a failure status
    pub fn fail_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Number of SCAL calls that reached the device
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Bytes of device memory currently allocated
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    fn check(&self, step: Step) -> Result<()> {
        if self.fail_at == Some(step) {
            return Err(ScalError::status(
                step,
                Status::Runtime(1),
                "injected failure",
            ));
        }
        Ok(())
    }

    fn malloc<T: Real>(&mut self, len: usize) -> Result<DeviceBuffer<T>> {
        self.check(Step::Allocate)?;
        let bytes = len * mem::size_of::<T>();
        if let Some(limit) = self.memory_limit {
            if self.allocated + bytes > limit {
                return Err(ScalError::status(
                    Step::Allocate,
                    Status::OutOfMemory,
                    &format!("{} bytes requested, {} bytes available", bytes, limit - self.allocated),
                ));
            }
        }
        self.allocated += bytes;
        trace!("Allocate {} bytes on emulated device", bytes);
        Ok(DeviceBuffer {
            data: vec![T::default(); len],
        })
    }

    fn free<T: Real>(&mut self, buf: DeviceBuffer<T>) -> Result<()> {
        self.allocated -= buf.data.len() * mem::size_of::<T>();
        self.check(Step::Free)
    }

    fn round_trip<T: Real>(
        &mut self,
        d_x: &mut DeviceBuffer<T>,
        n: usize,
        alpha: T,
        x: &mut [T],
        incx: usize,
    ) -> Result<()> {
        self.check(Step::CopyToDevice)?;
        check_copy_len(Step::CopyToDevice, x.len(), d_x.data.len())?;
        d_x.data.copy_from_slice(x);
        self.check(Step::PointerMode)?;
        self.check(Step::Scal)?;
        self.calls += 1;
        for i in 0..n {
            let idx = i * incx;
            d_x.data[idx] = alpha * d_x.data[idx];
        }
        self.check(Step::CopyToHost)?;
        check_copy_len(Step::CopyToHost, x.len(), d_x.data.len())?;
        x.copy_from_slice(&d_x.data);
        self.check(Step::DestroyHandle)
    }
}

impl Accelerator for Emulated {
    fn name(&self) -> String {
        "emulated device (host memory)".into()
    }

    fn scal<T: Real>(&mut self, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
        check_args(n, x, incx)?;
        blas_int("n", n)?;
        blas_int("x", incx)?;
        self.check(Step::CreateHandle)?;
        let mut d_x = self.malloc::<T>(x.len())?;
        let result = self.round_trip(&mut d_x, n, alpha, x, incx);
        // release device memory even when a step in between failed
        let freed = self.free(d_x);
        result.and(freed)
    }
}
