use colored::*;

use crate::real::Real;

/// Absolute tolerance used to compare device output against the gold vector
pub fn tolerance<T: Real>() -> T {
    T::from_f64(10.0) * T::EPSILON
}

/// Number of positions where `actual` and `expected` differ by more than `tol`
///
/// Positions present in only one of the slices count as mismatches, and so
/// does any position holding NaN. Equal infinities match.
pub fn count_mismatches<T: Real>(actual: &[T], expected: &[T], tol: T) -> usize {
    let differing = actual
        .iter()
        .zip(expected.iter())
        .filter(|(a, e)| !(**a == **e || (**a - **e).abs() <= tol))
        .count();
    let missing = if actual.len() > expected.len() {
        actual.len() - expected.len()
    } else {
        expected.len() - actual.len()
    };
    differing + missing
}

/// Process exit code for a mismatch count
///
/// Exit codes are truncated to 8 bits by the OS, so any failure is clamped
/// into `1..=255`.
pub fn exit_code(errors: usize) -> i32 {
    if errors == 0 {
        0
    } else if errors > 255 {
        255
    } else {
        errors as i32
    }
}

/// Print the validation verdict and return the exit code
pub fn report_validation_result(errors: usize) -> i32 {
    if errors == 0 {
        println!("{}", "Validation passed.".bright_green());
    } else {
        println!("{} Errors: {}", "Validation failed.".bright_red(), errors);
    }
    exit_code(errors)
}
