//! Scale a strided vector with an accelerator BLAS and validate it on the host

#[macro_use]
extern crate log;

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod params;
pub mod real;
pub mod reference;
pub mod validate;
pub mod vector;

#[cfg(feature = "rocblas")]
pub mod rocblas;

pub use crate::device::{Accelerator, Emulated};
pub use crate::driver::{Driver, Report};
pub use crate::params::{Backend, Params, ValidParams};
pub use crate::real::{Precision, Real};
