use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::*;
use crate::real::Precision;
use crate::reference::blas_int;

/// Where the accelerated SCAL runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Host-memory stand-in for a device
    Emulated,
    /// rocBLAS on a HIP device
    Rocblas,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Emulated
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        match s {
            "emulated" => Ok(Backend::Emulated),
            "rocblas" => Ok(Backend::Rocblas),
            _ => Err(format!("Unknown backend '{}' (emulated, rocblas)", s)),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Backend::Emulated => write!(f, "emulated"),
            Backend::Rocblas => write!(f, "rocblas"),
        }
    }
}

/// Unchecked run parameters as given by the user
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub alpha: f64,
    pub incx: i64,
    pub n: i64,
    pub precision: Precision,
    pub backend: Backend,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            alpha: 3.0,
            incx: 1,
            n: 5,
            precision: Precision::Single,
            backend: Backend::Emulated,
        }
    }
}

/// Parameters which passed [Params::validate]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidParams {
    pub alpha: f64,
    pub incx: usize,
    pub n: usize,
    pub precision: Precision,
    pub backend: Backend,
}

impl ValidParams {
    /// Length of the backing host buffer
    pub fn size(&self) -> usize {
        self.n * self.incx
    }
}

fn to_usize(name: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| ScalError::TooLarge {
        name,
        value: value as u64,
    })
}

impl Params {
    /// Reject non-positive stride or count before any work is done
    pub fn validate(&self) -> Result<ValidParams> {
        if self.incx <= 0 {
            return Err(ScalError::InvalidParameter {
                name: "x",
                value: self.incx,
            });
        }
        if self.n <= 0 {
            return Err(ScalError::InvalidParameter {
                name: "n",
                value: self.n,
            });
        }
        let incx = to_usize("x", self.incx)?;
        let n = to_usize("n", self.n)?;
        blas_int("x", incx)?;
        blas_int("n", n)?;
        // host buffer of n * incx elements must be addressable
        let bytes = n
            .checked_mul(incx)
            .and_then(|len| len.checked_mul(self.precision.element_size()));
        match bytes {
            Some(bytes) if bytes <= isize::max_value() as usize => {}
            _ => {
                return Err(err_msg(
                    Step::Validate,
                    &format!(
                        "host buffer of n * incx = {} * {} {} values is too large",
                        n, incx, self.precision
                    ),
                ))
            }
        }
        Ok(ValidParams {
            alpha: self.alpha,
            incx,
            n,
            precision: self.precision,
            backend: self.backend,
        })
    }
}
