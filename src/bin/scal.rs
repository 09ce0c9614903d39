use accel_scal::config::ScalTOML;
use accel_scal::error::{Logging, Result, ScalError, Status, Step};
use accel_scal::validate::report_validation_result;
use accel_scal::*;

use colored::*;
use failure::Fail;
use log::debug;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;

/// Scale a vector with SCAL on an accelerator and validate it against the host
#[derive(StructOpt, Debug)]
#[structopt(
    name = "scal",
    raw(
        settings = "&[structopt::clap::AppSettings::ColoredHelp, structopt::clap::AppSettings::AllowNegativeNumbers]"
    )
)]
struct Opt {
    /// Alpha scalar [default: 3.0]
    #[structopt(short = "a", long = "alpha")]
    alpha: Option<f64>,
    /// Increment for x vector [default: 1]
    #[structopt(short = "x", long = "incx")]
    incx: Option<i64>,
    /// Size of vector [default: 5]
    #[structopt(short = "n", long = "n")]
    n: Option<i64>,
    /// single or double [default: single]
    #[structopt(long = "precision")]
    precision: Option<Precision>,
    /// emulated or rocblas [default: emulated]
    #[structopt(long = "backend")]
    backend: Option<Backend>,
    /// TOML file with default parameters
    #[structopt(long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Print the report as JSON
    #[structopt(long = "json")]
    json: bool,
    /// Show debug logs
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

impl Opt {
    /// Flags given on the command line win over the config file
    fn apply(&self, base: Params) -> Params {
        Params {
            alpha: self.alpha.unwrap_or(base.alpha),
            incx: self.incx.unwrap_or(base.incx),
            n: self.n.unwrap_or(base.n),
            precision: self.precision.unwrap_or(base.precision),
            backend: self.backend.unwrap_or(base.backend),
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn finish<T: Real>(report: Report<T>, json: bool) -> Result<i32> {
    if json {
        let text = serde_json::to_string_pretty(&report).log(Step::Validate, "Cannot render report")?;
        println!("{}", text);
        Ok(report.exit_code())
    } else {
        Ok(report_validation_result(report.errors))
    }
}

fn dispatch<A: Accelerator>(driver: &Driver, device: &mut A, json: bool) -> Result<i32> {
    match driver.params().precision {
        Precision::Single => finish(driver.run_with::<f32, A>(device)?, json),
        Precision::Double => finish(driver.run_with::<f64, A>(device)?, json),
    }
}

#[cfg(feature = "rocblas")]
fn dispatch_rocblas(driver: &Driver, json: bool) -> Result<i32> {
    dispatch(driver, &mut accel_scal::rocblas::Rocblas::new(), json)
}

#[cfg(not(feature = "rocblas"))]
fn dispatch_rocblas(_driver: &Driver, _json: bool) -> Result<i32> {
    Err(ScalError::status(
        Step::CreateHandle,
        Status::Unavailable,
        "scal was built without the `rocblas` feature",
    ))
}

fn execute(opt: &Opt) -> Result<i32> {
    let config = ScalTOML::discover(opt.config.as_ref().map(|p| p.as_path()))?;
    let params = opt.apply(config.params());
    debug!("Parameters: {:?}", params);

    let valid = match params.validate() {
        Ok(valid) => valid,
        Err(e) => {
            if e.is_invalid_parameter() {
                println!("{}", e);
                return Ok(0);
            }
            return Err(e);
        }
    };

    let mut driver = Driver::new(valid);
    if opt.json {
        driver.quiet();
    }
    match valid.backend {
        Backend::Emulated => dispatch(&driver, &mut Emulated::new(), opt.json),
        Backend::Rocblas => dispatch_rocblas(&driver, opt.json),
    }
}

fn main() {
    let opt = Opt::from_args();
    init_logger(opt.verbose);

    let code = match execute(&opt) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".bright_red(), e);
            let fail: &dyn Fail = &e;
            for cause in fail.iter_chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            1
        }
    };
    process::exit(code);
}
