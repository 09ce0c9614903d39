//! Host-side SCAL used as the gold standard

use std::convert::TryFrom;

use crate::error::*;
use crate::real::Real;

/// Narrow a count or stride to the 32-bit int taken by BLAS entry points
pub fn blas_int(name: &'static str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| ScalError::TooLarge {
        name,
        value: value as u64,
    })
}

/// Check `n`, `incx` and the buffer length the way the BLAS call would
pub fn check_args<T>(n: usize, x: &[T], incx: usize) -> Result<()> {
    if incx == 0 {
        return Err(ScalError::InvalidParameter {
            name: "x",
            value: 0,
        });
    }
    if n == 0 {
        return Err(ScalError::InvalidParameter {
            name: "n",
            value: 0,
        });
    }
    let needed = (n - 1).checked_mul(incx).and_then(|last| last.checked_add(1));
    match needed {
        Some(needed) if x.len() >= needed => Ok(()),
        _ => Err(ScalError::ShortBuffer {
            len: x.len(),
            n,
            incx,
        }),
    }
}

/// `x[i * incx] = alpha * x[i * incx]` for `i` in `0..n`
pub fn scal<T: Real>(n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
    check_args(n, x, incx)?;
    for v in x.iter_mut().step_by(incx).take(n) {
        *v = alpha * *v;
    }
    Ok(())
}
