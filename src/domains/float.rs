//! Floating-point tolerances shared by every stage of the pipeline.
//!
//! All coefficients are `f64`. Every near-zero decision in the crate goes
//! through [EPS] so that classification, solving and integration agree on
//! what counts as zero.

/// The absolute tolerance below which a value is treated as zero.
pub const EPS: f64 = 1e-10;

/// Returns `true` iff `|a| < EPS`.
#[inline(always)]
pub fn is_zero(a: f64) -> bool {
    a.abs() < EPS
}

/// Returns `true` iff `a` and `b` differ by less than [EPS].
#[inline(always)]
pub fn approx_eq(a: f64, b: f64) -> bool {
    is_zero(a - b)
}

/// Clean up values that are zero up to rounding, so that `-0` or `1e-17`
/// never reach the printer.
#[inline]
pub fn chop(a: f64) -> f64 {
    if is_zero(a) {
        0.
    } else {
        a
    }
}

/// The real roots of `a*t^2 + b*t + c`, ordered as `(-b + sqrt(d)) / 2a`,
/// `(-b - sqrt(d)) / 2a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadraticRoots {
    Distinct(f64, f64),
    Double(f64),
    /// The discriminant is negative.
    Complex,
}

/// Solve `a*t^2 + b*t + c = 0` with the quadratic formula. The discriminant
/// is compared against [EPS], so a discriminant of `1e-12` yields a double root.
///
/// `a` must not be zero.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> QuadraticRoots {
    debug_assert!(!is_zero(a));
    let d = discriminant(a, b, c);

    if d > EPS {
        let s = d.sqrt();
        QuadraticRoots::Distinct((-b + s) / (2. * a), (-b - s) / (2. * a))
    } else if d.abs() <= EPS {
        QuadraticRoots::Double(-b / (2. * a))
    } else {
        QuadraticRoots::Complex
    }
}

/// `b^2 - 4ac`.
#[inline]
pub fn discriminant(a: f64, b: f64, c: f64) -> f64 {
    b * b - 4. * a * c
}
