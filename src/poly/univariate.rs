use std::{
    fmt,
    ops::{Index, Mul},
};

use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    domains::float::{approx_eq, is_zero},
    printer::{NumberPrinter, PrintOptions},
};

/// Coefficient storage: degree four and below never allocate.
pub type Coefficients = SmallVec<[f64; 5]>;

/// A dense univariate polynomial in `x` with real coefficients.
///
/// `coefficients[i]` is the coefficient of `x^i`. Trailing coefficients
/// below [EPS](crate::domains::float::EPS) are removed on construction, so the
/// zero polynomial is `[0]` and the degree is `len - 1`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polynomial {
    coefficients: Coefficients,
}

impl Polynomial {
    /// Create a polynomial from its coefficients in increasing order of power.
    pub fn new<I: IntoIterator<Item = f64>>(coefficients: I) -> Polynomial {
        let mut coefficients: Coefficients = coefficients.into_iter().collect();
        while coefficients.len() > 1 && coefficients.last().is_some_and(|c| is_zero(*c)) {
            coefficients.pop();
        }
        if coefficients.is_empty() {
            coefficients.push(0.);
        }
        Polynomial { coefficients }
    }

    pub fn zero() -> Polynomial {
        Polynomial::new([0.])
    }

    pub fn one() -> Polynomial {
        Polynomial::new([1.])
    }

    /// `a*x + b`.
    pub fn linear(a: f64, b: f64) -> Polynomial {
        Polynomial::new([b, a])
    }

    /// `a*x^2 + b*x + c`.
    pub fn quadratic(a: f64, b: f64, c: f64) -> Polynomial {
        Polynomial::new([c, b, a])
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    #[inline]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The coefficient of `x^power`, zero beyond the degree.
    #[inline]
    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.)
    }

    #[inline]
    pub fn leading_coefficient(&self) -> f64 {
        self.coefficients[self.degree()]
    }

    /// Returns `true` iff the polynomial is `[c]` with `|c| < EPS`.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && is_zero(self.coefficients[0])
    }

    /// Evaluate at `x` with Horner's scheme.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0., |acc, c| acc * x + c)
    }

    pub fn derivative(&self) -> Polynomial {
        if self.degree() == 0 {
            return Polynomial::zero();
        }

        Polynomial::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| i as f64 * c),
        )
    }

    /// Coefficient-wise comparison with tolerance [EPS](crate::domains::float::EPS).
    pub fn approx_eq(&self, other: &Polynomial) -> bool {
        let n = self.coefficients.len().max(other.coefficients.len());
        (0..n).all(|i| approx_eq(self.coefficient(i), other.coefficient(i)))
    }

    /// Render with explicit print options.
    pub fn format(&self, opts: PrintOptions) -> String {
        let mut out = String::new();
        let mut first = true;

        for (i, &c) in self.coefficients.iter().enumerate().rev() {
            if is_zero(c) {
                continue;
            }

            if c < 0. {
                out.push('-');
            } else if !first {
                out.push('+');
            }
            first = false;

            let v = c.abs();
            if i == 0 || !approx_eq(v, 1.) {
                out.push_str(&NumberPrinter::new(v, opts).to_string());
            }

            match i {
                0 => {}
                1 => out.push('x'),
                _ => {
                    out.push_str("x^");
                    out.push_str(&i.to_string());
                }
            }
        }

        if first {
            out.push('0');
        }
        out
    }
}

impl Index<usize> for Polynomial {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.coefficients[index]
    }
}

impl<'a> Mul<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'a Polynomial) -> Polynomial {
        let mut res: Coefficients = SmallVec::from_elem(0., self.degree() + rhs.degree() + 1);

        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                res[i + j] += a * b;
            }
        }

        Polynomial::new(res)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        &self * &rhs
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(value: Vec<f64>) -> Self {
        Polynomial::new(value)
    }
}

impl fmt::Display for Polynomial {
    /// Prints in descending powers, e.g. `3x^2-x+0.5`. The formatter
    /// precision sets the number of significant digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PrintOptions::from_formatter(f)))
    }
}
