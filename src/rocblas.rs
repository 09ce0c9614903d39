//! rocBLAS backend on a HIP device
//!
//! Enabled with the `rocblas` cargo feature; links `librocblas` and
//! `libamdhip64`.

use std::ffi::CStr;
use std::mem;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use crate::device::{check_copy_len, Accelerator};
use crate::error::*;
use crate::real::{Precision, Real};
use crate::reference::{blas_int, check_args};

#[allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]
mod ffi {
    use std::os::raw::{c_char, c_int, c_void};

    pub enum _rocblas_handle {}
    pub type rocblas_handle = *mut _rocblas_handle;
    pub type rocblas_int = i32;
    pub type rocblas_status = c_int;
    pub type rocblas_pointer_mode = c_int;
    pub type hipError_t = c_int;
    pub type hipMemcpyKind = c_int;

    pub const rocblas_status_success: rocblas_status = 0;
    pub const rocblas_pointer_mode_host: rocblas_pointer_mode = 0;
    pub const hipSuccess: hipError_t = 0;
    pub const hipErrorOutOfMemory: hipError_t = 2;
    pub const hipMemcpyHostToDevice: hipMemcpyKind = 1;
    pub const hipMemcpyDeviceToHost: hipMemcpyKind = 2;

    #[link(name = "rocblas")]
    extern "C" {
        pub fn rocblas_create_handle(handle: *mut rocblas_handle) -> rocblas_status;
        pub fn rocblas_destroy_handle(handle: rocblas_handle) -> rocblas_status;
        pub fn rocblas_set_pointer_mode(
            handle: rocblas_handle,
            mode: rocblas_pointer_mode,
        ) -> rocblas_status;
        pub fn rocblas_sscal(
            handle: rocblas_handle,
            n: rocblas_int,
            alpha: *const f32,
            x: *mut f32,
            incx: rocblas_int,
        ) -> rocblas_status;
        pub fn rocblas_dscal(
            handle: rocblas_handle,
            n: rocblas_int,
            alpha: *const f64,
            x: *mut f64,
            incx: rocblas_int,
        ) -> rocblas_status;
        pub fn rocblas_status_to_string(status: rocblas_status) -> *const c_char;
    }

    #[link(name = "amdhip64")]
    extern "C" {
        pub fn hipGetDevice(device: *mut c_int) -> hipError_t;
        pub fn hipMalloc(ptr: *mut *mut c_void, size: usize) -> hipError_t;
        pub fn hipMemcpy(
            dst: *mut c_void,
            src: *const c_void,
            size: usize,
            kind: hipMemcpyKind,
        ) -> hipError_t;
        pub fn hipFree(ptr: *mut c_void) -> hipError_t;
        pub fn hipGetErrorString(error: hipError_t) -> *const c_char;
    }
}

fn message(s: *const c_char) -> String {
    if s.is_null() {
        return "unknown".into();
    }
    unsafe { CStr::from_ptr(s) }.to_string_lossy().into_owned()
}

fn check_blas(step: Step, status: ffi::rocblas_status) -> Result<()> {
    if status == ffi::rocblas_status_success {
        return Ok(());
    }
    let msg = message(unsafe { ffi::rocblas_status_to_string(status) });
    Err(ScalError::status(step, Status::Blas(status), &msg))
}

fn check_hip(step: Step, error: ffi::hipError_t) -> Result<()> {
    if error == ffi::hipSuccess {
        return Ok(());
    }
    let msg = message(unsafe { ffi::hipGetErrorString(error) });
    let status = if error == ffi::hipErrorOutOfMemory {
        Status::OutOfMemory
    } else {
        Status::Runtime(error)
    };
    Err(ScalError::status(step, status, &msg))
}

/// rocBLAS library handle
struct Handle {
    raw: ffi::rocblas_handle,
}

impl Handle {
    fn new() -> Result<Self> {
        let mut raw = ptr::null_mut();
        check_blas(Step::CreateHandle, unsafe {
            ffi::rocblas_create_handle(&mut raw)
        })?;
        Ok(Handle { raw })
    }

    fn destroy(self) -> Result<()> {
        let raw = self.raw;
        mem::forget(self);
        check_blas(Step::DestroyHandle, unsafe {
            ffi::rocblas_destroy_handle(raw)
        })
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        let st = unsafe { ffi::rocblas_destroy_handle(self.raw) };
        if st != ffi::rocblas_status_success {
            warn!("rocblas_destroy_handle failed: {}", st);
        }
    }
}

/// Device allocation holding `len` elements of `T`
struct DeviceMemory<T> {
    ptr: *mut T,
    len: usize,
}

impl<T: Real> DeviceMemory<T> {
    fn new(len: usize) -> Result<Self> {
        let mut ptr: *mut c_void = ptr::null_mut();
        check_hip(Step::Allocate, unsafe {
            ffi::hipMalloc(&mut ptr, len * mem::size_of::<T>())
        })?;
        Ok(DeviceMemory {
            ptr: ptr as *mut T,
            len,
        })
    }

    fn bytes(&self) -> usize {
        self.len * mem::size_of::<T>()
    }

    fn copy_from_host(&mut self, src: &[T]) -> Result<()> {
        check_copy_len(Step::CopyToDevice, src.len(), self.len)?;
        check_hip(Step::CopyToDevice, unsafe {
            ffi::hipMemcpy(
                self.ptr as *mut c_void,
                src.as_ptr() as *const c_void,
                self.bytes(),
                ffi::hipMemcpyHostToDevice,
            )
        })
    }

    /// Blocks until all preceding device work is done
    fn copy_to_host(&self, dst: &mut [T]) -> Result<()> {
        check_copy_len(Step::CopyToHost, dst.len(), self.len)?;
        check_hip(Step::CopyToHost, unsafe {
            ffi::hipMemcpy(
                dst.as_mut_ptr() as *mut c_void,
                self.ptr as *const c_void,
                self.bytes(),
                ffi::hipMemcpyDeviceToHost,
            )
        })
    }

    fn free(self) -> Result<()> {
        let ptr = self.ptr;
        mem::forget(self);
        check_hip(Step::Free, unsafe { ffi::hipFree(ptr as *mut c_void) })
    }
}

impl<T> Drop for DeviceMemory<T> {
    fn drop(&mut self) {
        let e = unsafe { ffi::hipFree(self.ptr as *mut c_void) };
        if e != ffi::hipSuccess {
            warn!("hipFree failed: {}", e);
        }
    }
}

/// SCAL through rocBLAS on the current HIP device
#[derive(Debug, Default)]
pub struct Rocblas {}

impl Rocblas {
    pub fn new() -> Self {
        Rocblas {}
    }
}

impl Accelerator for Rocblas {
    fn name(&self) -> String {
        let mut device: c_int = 0;
        match check_hip(Step::CreateHandle, unsafe { ffi::hipGetDevice(&mut device) }) {
            Ok(()) => format!("rocBLAS on HIP device {}", device),
            Err(_) => "rocBLAS (no HIP device)".into(),
        }
    }

    fn scal<T: Real>(&mut self, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
        check_args(n, x, incx)?;
        let n = blas_int("n", n)?;
        let incx = blas_int("x", incx)?;
        let handle = Handle::new()?;
        let mut d_x = DeviceMemory::<T>::new(x.len())?;
        d_x.copy_from_host(x)?;
        check_blas(Step::PointerMode, unsafe {
            ffi::rocblas_set_pointer_mode(handle.raw, ffi::rocblas_pointer_mode_host)
        })?;
        // `T` is `f32` or `f64` as selected by PRECISION
        let st = unsafe {
            match T::PRECISION {
                Precision::Single => ffi::rocblas_sscal(
                    handle.raw,
                    n,
                    &alpha as *const T as *const f32,
                    d_x.ptr as *mut f32,
                    incx,
                ),
                Precision::Double => ffi::rocblas_dscal(
                    handle.raw,
                    n,
                    &alpha as *const T as *const f64,
                    d_x.ptr as *mut f64,
                    incx,
                ),
            }
        };
        check_blas(Step::Scal, st)?;
        d_x.copy_to_host(x)?;
        handle.destroy()?;
        d_x.free()
    }
}
