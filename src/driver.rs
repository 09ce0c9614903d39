use colored::*;
use serde::Serialize;

use crate::device::Accelerator;
use crate::error::*;
use crate::params::{Backend, ValidParams};
use crate::real::{Precision, Real};
use crate::reference;
use crate::validate::{count_mismatches, exit_code, tolerance};
use crate::vector::{format_range, StridedVector};

/// Outcome of one SCAL run
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub device: String,
    pub backend: Backend,
    pub precision: Precision,
    pub n: usize,
    pub incx: usize,
    pub alpha: T,
    pub tolerance: T,
    pub input: Vec<T>,
    /// Device result
    pub output: Vec<T>,
    /// Host reference result
    pub expected: Vec<T>,
    pub errors: usize,
}

impl<T: Real> Report<T> {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(self.errors)
    }
}

/// Runs SCAL on a counting vector and checks the device against the host
pub struct Driver {
    params: ValidParams,
    quiet: bool,
}

impl Driver {
    pub fn new(params: ValidParams) -> Self {
        Driver {
            params,
            quiet: false,
        }
    }

    /// Do not print progress to stdout / stderr
    pub fn quiet(&mut self) {
        self.quiet = true;
    }

    pub fn params(&self) -> &ValidParams {
        &self.params
    }

    fn status(&self, verb: &str, msg: &str) {
        if !self.quiet {
            eprintln!("{:>12} {}", verb.bright_green(), msg);
        }
    }

    pub fn run_with<T: Real, A: Accelerator>(&self, device: &mut A) -> Result<Report<T>> {
        let ValidParams { n, incx, .. } = self.params;
        let alpha = T::from_f64(self.params.alpha);

        let mut x = StridedVector::<T>::iota(n, incx)?;
        let input = x.as_slice().to_vec();
        if !self.quiet {
            println!("Input Vector x: {}", format_range(&input));
        }

        // gold standard computed on the host
        let mut gold = x.clone();
        reference::scal(n, alpha, gold.as_mut_slice(), incx)?;
        debug!("Host reference: {}", format_range(gold.as_slice()));

        let name = device.name();
        self.status(
            "Scaling",
            &format!("n = {}, incx = {}, alpha = {} on {}", n, incx, alpha, name),
        );
        device.scal(n, alpha, x.as_mut_slice(), incx)?;
        if !self.quiet {
            println!("Output Vector x: {}", format_range(x.as_slice()));
        }

        let tol = tolerance::<T>();
        let errors = count_mismatches(x.as_slice(), gold.as_slice(), tol);
        self.status(
            "Validated",
            &format!("{} elements, {} mismatches (tolerance {})", x.size(), errors, tol),
        );
        if errors > 0 {
            info!("Device result differs from host reference at {} positions", errors);
        }

        Ok(Report {
            device: name,
            backend: self.params.backend,
            precision: T::PRECISION,
            n,
            incx,
            alpha,
            tolerance: tol,
            input,
            output: x.into_vec(),
            expected: gold.into_vec(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Emulated;
    use crate::params::Params;

    fn driver(n: i64, incx: i64, alpha: f64) -> Driver {
        let params = Params {
            n,
            incx,
            alpha,
            ..Params::default()
        };
        let mut d = Driver::new(params.validate().unwrap());
        d.quiet();
        d
    }

    #[test]
    fn default_run() {
        let mut dev = Emulated::new();
        let report = driver(5, 1, 3.0).run_with::<f32, _>(&mut dev).unwrap();
        assert_eq!(report.input, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(report.output, vec![0.0, 3.0, 6.0, 9.0, 12.0]);
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn strided_double() {
        let mut dev = Emulated::new();
        let report = driver(5, 2, 3.0).run_with::<f64, _>(&mut dev).unwrap();
        assert_eq!(
            report.output,
            vec![0.0, 1.0, 6.0, 3.0, 12.0, 5.0, 18.0, 7.0, 24.0, 9.0]
        );
        assert_eq!(report.precision, Precision::Double);
        assert_eq!(report.errors, 0);
    }

    #[test]
    fn oversized_host_buffer_fails_before_device() {
        let params = ValidParams {
            n: i32::max_value() as usize,
            incx: i32::max_value() as usize,
            ..Params::default().validate().unwrap()
        };
        let mut d = Driver::new(params);
        d.quiet();
        let mut dev = Emulated::new();
        match d.run_with::<f32, _>(&mut dev) {
            Err(ScalError::OtherError {
                step: Step::HostBuffer,
                ..
            }) => {}
            r => panic!("unexpected {:?}", r.map(|r| r.errors)),
        }
        assert_eq!(dev.calls(), 0);
    }

    #[test]
    fn device_failure_propagates() {
        let mut dev = Emulated::new().fail_at(Step::Scal);
        match driver(4, 1, 2.0).run_with::<f32, _>(&mut dev) {
            Err(ScalError::Status {
                step: Step::Scal, ..
            }) => {}
            r => panic!("unexpected {:?}", r.map(|r| r.errors)),
        }
    }
}
