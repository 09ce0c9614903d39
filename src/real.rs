//! Floating-point element types accepted by SCAL

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::ops::{Mul, Sub};
use std::str::FromStr;

/// Width of the vector elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// `f32`, dispatched to `sscal`
    Single,
    /// `f64`, dispatched to `dscal`
    Double,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Single
    }
}

impl Precision {
    /// Bytes per vector element
    pub fn element_size(&self) -> usize {
        match self {
            Precision::Single => std::mem::size_of::<f32>(),
            Precision::Double => std::mem::size_of::<f64>(),
        }
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" | "s" | "f32" => Ok(Precision::Single),
            "double" | "d" | "f64" => Ok(Precision::Double),
            _ => Err(format!("Unknown precision '{}' (single, double)", s)),
        }
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Precision::Single => write!(f, "single"),
            Precision::Double => write!(f, "double"),
        }
    }
}

pub trait Real:
    Copy
    + Debug
    + Display
    + PartialOrd
    + Default
    + Mul<Output = Self>
    + Sub<Output = Self>
    + Serialize
    + 'static
{
    const PRECISION: Precision;
    const EPSILON: Self;

    fn from_f64(v: f64) -> Self;
    fn from_index(i: usize) -> Self;
    fn abs(self) -> Self;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::Single;
    const EPSILON: Self = std::f32::EPSILON;

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn from_index(i: usize) -> Self {
        i as f32
    }

    fn abs(self) -> Self {
        f32::abs(self)
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::Double;
    const EPSILON: Self = std::f64::EPSILON;

    fn from_f64(v: f64) -> Self {
        v
    }

    fn from_index(i: usize) -> Self {
        i as f64
    }

    fn abs(self) -> Self {
        f64::abs(self)
    }
}
