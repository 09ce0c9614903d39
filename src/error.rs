use failure::Fail;
use serde::Serialize;
use std::fmt;

/// Stage of the SCAL flow where an error happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    Config,
    Validate,
    HostBuffer,
    CreateHandle,
    Allocate,
    CopyToDevice,
    PointerMode,
    Scal,
    CopyToHost,
    DestroyHandle,
    Free,
}

/// Status code reported by the accelerator library or runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `rocblas_status` returned by a BLAS call
    Blas(i32),
    /// `hipError_t` returned by a runtime call
    Runtime(i32),
    /// The device could not satisfy an allocation
    OutOfMemory,
    /// The backend is not available in this build
    Unavailable,
}

impl Status {
    pub fn code(&self) -> i32 {
        match *self {
            Status::Blas(code) | Status::Runtime(code) => code,
            Status::OutOfMemory => 2,
            Status::Unavailable => -1,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Status::Blas(code) => write!(f, "BLAS status {}", code),
            Status::Runtime(code) => write!(f, "runtime error {}", code),
            Status::OutOfMemory => write!(f, "out of device memory"),
            Status::Unavailable => write!(f, "backend unavailable"),
        }
    }
}

#[derive(Fail, Debug)]
pub enum ScalError {
    #[fail(display = "Value of '{}' should be greater than 0", name)]
    InvalidParameter { name: &'static str, value: i64 },

    #[fail(
        display = "Vector of {} elements is too short for n = {}, incx = {}",
        len, n, incx
    )]
    ShortBuffer { len: usize, n: usize, incx: usize },

    #[fail(display = "Value of '{}' does not fit in a BLAS int: {}", name, value)]
    TooLarge { name: &'static str, value: u64 },

    #[fail(
        display = "Accelerator call failed during {:?} step: {} ({})",
        step, status, message
    )]
    Status {
        step: Step,
        status: Status,
        message: String,
    },

    #[fail(display = "Error during {:?} step: {}", step, comment)]
    OtherError {
        step: Step,
        comment: String,
        #[fail(cause)]
        error: failure::Error,
    },
}

impl ScalError {
    pub fn status(step: Step, status: Status, message: &str) -> Self {
        ScalError::Status {
            step,
            status,
            message: message.to_owned(),
        }
    }

    /// Invalid user input, reported without doing any work
    pub fn is_invalid_parameter(&self) -> bool {
        match self {
            ScalError::InvalidParameter { .. } => true,
            _ => false,
        }
    }
}

pub fn err_msg(step: Step, comment: &str) -> ScalError {
    ScalError::OtherError {
        step,
        comment: comment.to_owned(),
        error: failure::err_msg(comment.to_owned()),
    }
}

pub type Result<T> = ::std::result::Result<T, ScalError>;

pub trait Logging {
    type T;
    fn log(self, step: Step, comment: &str) -> Result<Self::T>;
}

impl<T, E: Into<failure::Error>> Logging for ::std::result::Result<T, E> {
    type T = T;

    fn log(self, step: Step, comment: &str) -> Result<Self::T> {
        self.map_err(|e| ScalError::OtherError {
            step,
            comment: comment.to_owned(),
            error: e.into(),
        })
    }
}
