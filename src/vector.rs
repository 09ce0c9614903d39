use std::fmt::Display;

use crate::error::*;
use crate::real::Real;

/// Host vector of `n` logical elements spaced `incx` apart
///
/// The backing buffer holds `n * incx` values so every participating element
/// `i * incx` is addressable.
#[derive(Debug, Clone, PartialEq)]
pub struct StridedVector<T> {
    data: Vec<T>,
    n: usize,
    incx: usize,
}

impl<T: Real> StridedVector<T> {
    /// Counting sequence 0, 1, 2, ... over the whole backing buffer
    ///
    /// Fails instead of aborting when the host cannot hold `n * incx` values.
    pub fn iota(n: usize, incx: usize) -> Result<Self> {
        let len = n.checked_mul(incx).ok_or_else(|| {
            err_msg(
                Step::HostBuffer,
                &format!("n * incx = {} * {} overflows", n, incx),
            )
        })?;
        let mut data: Vec<T> = Vec::new();
        data.try_reserve_exact(len).log(
            Step::HostBuffer,
            &format!("Cannot allocate host vector of {} elements", len),
        )?;
        data.extend((0..len).map(T::from_index));
        Ok(StridedVector { data, n, incx })
    }

    /// Length of the backing buffer
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Indices touched by SCAL
    pub fn participating(&self) -> impl Iterator<Item = usize> {
        let incx = self.incx;
        (0..self.n).map(move |i| i * incx)
    }
}

/// Render a slice as `[a, b, c]`
pub fn format_range<T: Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}
