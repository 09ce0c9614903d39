use accel_scal::error::{Result, ScalError, Status, Step};
use accel_scal::*;

/// Device that counts how often it was asked to run
#[derive(Default)]
struct Recording {
    calls: usize,
}

impl Accelerator for Recording {
    fn name(&self) -> String {
        "recording".into()
    }

    fn scal<T: Real>(&mut self, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
        self.calls += 1;
        accel_scal::reference::scal(n, alpha, x, incx)
    }
}

/// Device that forgets to scale the last participating element
struct DropsLast;

impl Accelerator for DropsLast {
    fn name(&self) -> String {
        "drops-last".into()
    }

    fn scal<T: Real>(&mut self, n: usize, alpha: T, x: &mut [T], incx: usize) -> Result<()> {
        accel_scal::reference::scal(n - 1, alpha, x, incx)
    }
}

/// Device whose kernel writes NaN into every element
struct WritesNan;

impl Accelerator for WritesNan {
    fn name(&self) -> String {
        "writes-nan".into()
    }

    fn scal<T: Real>(&mut self, _n: usize, _alpha: T, x: &mut [T], _incx: usize) -> Result<()> {
        let nan = T::from_f64(std::f64::NAN);
        for v in x.iter_mut() {
            *v = nan;
        }
        Ok(())
    }
}

fn driver(n: i64, incx: i64, alpha: f64) -> Result<Driver> {
    let params = Params {
        n,
        incx,
        alpha,
        ..Params::default()
    };
    let mut driver = Driver::new(params.validate()?);
    driver.quiet();
    Ok(driver)
}

#[test]
fn default_parameters() {
    let mut dev = Emulated::new();
    let report = driver(5, 1, 3.0)
        .unwrap()
        .run_with::<f32, _>(&mut dev)
        .unwrap();
    assert_eq!(report.input, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(report.output, vec![0.0, 3.0, 6.0, 9.0, 12.0]);
    assert_eq!(report.errors, 0);
    assert_eq!(dev.calls(), 1);
}

#[test]
fn stride_two_touches_even_indices() {
    let mut dev = Emulated::new();
    let report = driver(5, 2, 3.0)
        .unwrap()
        .run_with::<f32, _>(&mut dev)
        .unwrap();
    assert_eq!(
        report.output,
        vec![0.0, 1.0, 6.0, 3.0, 12.0, 5.0, 18.0, 7.0, 24.0, 9.0]
    );
    assert!(report.passed());
}

#[test]
fn grid_of_parameters_validates() {
    for &alpha in &[0.0, 1.0, -2.5, 3.0, 1e-3] {
        for incx in 1..5 {
            for n in 1..9 {
                let d = driver(n, incx, alpha).unwrap();
                let r32 = d.run_with::<f32, _>(&mut Emulated::new()).unwrap();
                let r64 = d.run_with::<f64, _>(&mut Emulated::new()).unwrap();
                assert_eq!(r32.errors, 0, "f32 n={} incx={} alpha={}", n, incx, alpha);
                assert_eq!(r64.errors, 0, "f64 n={} incx={} alpha={}", n, incx, alpha);
                for (i, (out, inp)) in r64.output.iter().zip(r64.input.iter()).enumerate() {
                    if i % incx as usize != 0 {
                        assert_eq!(out, inp);
                    }
                }
            }
        }
    }
}

#[test]
fn invalid_parameters_never_reach_device() {
    for &(n, incx) in &[(0, 1), (5, 0), (-1, 1), (5, -2)] {
        let mut dev = Recording::default();
        match driver(n, incx, 3.0).and_then(|d| d.run_with::<f32, _>(&mut dev)) {
            Err(ref e) if e.is_invalid_parameter() => {}
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("n={} incx={} accepted", n, incx),
        }
        assert_eq!(dev.calls, 0);
    }
}

#[test]
fn mismatches_are_counted() {
    let report = driver(5, 1, 3.0)
        .unwrap()
        .run_with::<f32, _>(&mut DropsLast)
        .unwrap();
    assert_eq!(report.errors, 1);
    assert!(!report.passed());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn nan_output_fails_validation() {
    let report = driver(5, 1, 3.0)
        .unwrap()
        .run_with::<f32, _>(&mut WritesNan)
        .unwrap();
    assert_eq!(report.errors, 5);
    assert!(!report.passed());
    assert_eq!(report.exit_code(), 5);
}

#[test]
fn unit_alpha_on_last_element_is_not_a_mismatch() {
    let report = driver(4, 3, 1.0)
        .unwrap()
        .run_with::<f64, _>(&mut DropsLast)
        .unwrap();
    assert_eq!(report.errors, 0);
}

#[test]
fn allocation_failure_is_a_status() {
    let mut dev = Emulated::new().with_memory_limit(8);
    match driver(5, 1, 3.0).unwrap().run_with::<f32, _>(&mut dev) {
        Err(ScalError::Status {
            step: Step::Allocate,
            status: Status::OutOfMemory,
            ..
        }) => {}
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("allocation should fail"),
    }
}

#[test]
fn report_serializes() {
    let report = driver(2, 1, 3.0)
        .unwrap()
        .run_with::<f32, _>(&mut Emulated::new())
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
    assert_eq!(json["errors"], 0);
    assert_eq!(json["precision"], "single");
    assert_eq!(json["backend"], "emulated");
    assert_eq!(json["output"][1], 3.0);
}
