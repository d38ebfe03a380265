//! Structural classification of supported denominators.
//!
//! A denominator of degree two is split by the sign of its discriminant,
//! a denominator of degree four is only recognized in the biquadratic
//! shape `a*x^4 + b*x^2 + c`. Denominators that were entered as a product
//! of two factors keep those factors.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::{expression::Expression, univariate::Polynomial};
use crate::{
    domains::float::{approx_eq, is_zero, solve_quadratic, QuadraticRoots, EPS},
    printer::{NumberPrinter, PrintOptions},
};

/// The tag of a [Factorization].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FactorizationKind {
    #[serde(rename = "linear_fatorado")]
    FactoredLinear,
    #[serde(rename = "linear")]
    DistinctRoots,
    #[serde(rename = "linear_dupla")]
    DoubleRoot,
    #[serde(rename = "quadratico_complexo")]
    IrreducibleQuadratic,
    #[serde(rename = "misto")]
    Biquadratic,
    #[serde(rename = "misto_fatorado")]
    FactoredQuadratics,
    #[serde(rename = "complexo")]
    Quartic,
    #[serde(rename = "desconhecido")]
    Unknown,
}

impl FactorizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorizationKind::FactoredLinear => "linear_fatorado",
            FactorizationKind::DistinctRoots => "linear",
            FactorizationKind::DoubleRoot => "linear_dupla",
            FactorizationKind::IrreducibleQuadratic => "quadratico_complexo",
            FactorizationKind::Biquadratic => "misto",
            FactorizationKind::FactoredQuadratics => "misto_fatorado",
            FactorizationKind::Quartic => "complexo",
            FactorizationKind::Unknown => "desconhecido",
        }
    }
}

impl fmt::Display for FactorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structure of a denominator, with the data the decomposition needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Factorization {
    /// `(a1*x + b1)(a2*x + b2)` as entered, with the root of each factor.
    #[serde(rename = "linear_fatorado")]
    FactoredLinear {
        factors: [Polynomial; 2],
        roots: [f64; 2],
    },
    /// `leading*(x - x1)(x - x2)` with `x1 != x2`.
    #[serde(rename = "linear")]
    DistinctRoots { leading: f64, roots: [f64; 2] },
    /// `leading*(x - x0)^2`.
    #[serde(rename = "linear_dupla")]
    DoubleRoot { leading: f64, root: f64 },
    /// `a*x^2 + b*x + c` with a negative discriminant.
    #[serde(rename = "quadratico_complexo")]
    IrreducibleQuadratic { quadratic: Polynomial },
    /// `leading*(x^2 + p1)(x^2 + p2)` with `p1, p2 > 0`.
    #[serde(rename = "misto")]
    Biquadratic { leading: f64, shifts: [f64; 2] },
    /// Two quadratic factors as entered.
    #[serde(rename = "misto_fatorado")]
    FactoredQuadratics { factors: [Polynomial; 2] },
    /// Any other quartic.
    #[serde(rename = "complexo")]
    Quartic { polynomial: Polynomial },
    #[serde(rename = "desconhecido")]
    Unknown { degree: usize },
}

impl Factorization {
    pub fn kind(&self) -> FactorizationKind {
        match self {
            Factorization::FactoredLinear { .. } => FactorizationKind::FactoredLinear,
            Factorization::DistinctRoots { .. } => FactorizationKind::DistinctRoots,
            Factorization::DoubleRoot { .. } => FactorizationKind::DoubleRoot,
            Factorization::IrreducibleQuadratic { .. } => FactorizationKind::IrreducibleQuadratic,
            Factorization::Biquadratic { .. } => FactorizationKind::Biquadratic,
            Factorization::FactoredQuadratics { .. } => FactorizationKind::FactoredQuadratics,
            Factorization::Quartic { .. } => FactorizationKind::Quartic,
            Factorization::Unknown { .. } => FactorizationKind::Unknown,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Factorization::FactoredLinear { .. } => "Product of linear factors (kept factored)",
            Factorization::DistinctRoots { .. } => "Product of linear factors (x - x1)(x - x2)",
            Factorization::DoubleRoot { .. } => "Repeated linear factor (x - x1)^2",
            Factorization::IrreducibleQuadratic { .. } => {
                "Irreducible quadratic (complex roots)"
            }
            Factorization::Biquadratic { .. } => "Product of quadratics (x^2 + p1)(x^2 + p2)",
            Factorization::FactoredQuadratics { .. } => {
                "Product of quadratic factors (kept factored)"
            }
            Factorization::Quartic { .. } => "Degree 4 factorization without a supported shape",
            Factorization::Unknown { .. } => "Unidentified type",
        }
    }

    /// The roots of the linear factors, if any.
    pub fn roots(&self) -> Vec<f64> {
        match self {
            Factorization::FactoredLinear { roots, .. }
            | Factorization::DistinctRoots { roots, .. } => roots.to_vec(),
            Factorization::DoubleRoot { root, .. } => vec![*root],
            _ => vec![],
        }
    }

    /// Render the factors, e.g. `(x-1)(x-2)` or `(3x-2) × (x+5)`.
    pub fn format_factors(&self, opts: PrintOptions) -> String {
        let num = |v: f64| NumberPrinter::new(v, opts).to_string();
        let lead = |v: f64| {
            if approx_eq(v, 1.) {
                String::new()
            } else {
                format!("{}·", num(v))
            }
        };

        match self {
            Factorization::FactoredLinear { factors, .. }
            | Factorization::FactoredQuadratics { factors } => factors
                .iter()
                .map(|p| format!("({})", p.format(opts)))
                .collect::<Vec<_>>()
                .join(" × "),
            Factorization::DistinctRoots { leading, roots } => format!(
                "{}({})({})",
                lead(*leading),
                Polynomial::linear(1., -roots[0]).format(opts),
                Polynomial::linear(1., -roots[1]).format(opts)
            ),
            Factorization::DoubleRoot { leading, root } => format!(
                "{}({})^2",
                lead(*leading),
                Polynomial::linear(1., -root).format(opts)
            ),
            Factorization::IrreducibleQuadratic { quadratic } => quadratic.format(opts),
            Factorization::Biquadratic { leading, shifts } => format!(
                "{}({})({})",
                lead(*leading),
                Polynomial::quadratic(1., 0., shifts[0]).format(opts),
                Polynomial::quadratic(1., 0., shifts[1]).format(opts)
            ),
            Factorization::Quartic { polynomial } => polynomial.format(opts),
            Factorization::Unknown { degree } => format!("degree {}", degree),
        }
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_factors(PrintOptions::from_formatter(f)))
    }
}

/// Classify a denominator. A natively factored denominator keeps its
/// factors when it is a product of two linear or two quadratic factors,
/// everything else is classified on the expanded polynomial.
pub fn classify(denominator: &Expression) -> Factorization {
    let f = match denominator.factors() {
        Some([f1, f2]) if f1.degree() == 1 && f2.degree() == 1 => classify_linear_factors(f1, f2),
        Some([f1, f2]) if f1.degree() == 2 && f2.degree() == 2 => {
            Factorization::FactoredQuadratics {
                factors: [f1.clone(), f2.clone()],
            }
        }
        _ => classify_expanded(&denominator.expand()),
    };

    debug!(kind = %f.kind(), factors = %f, "classified denominator");
    f
}

fn classify_linear_factors(f1: &Polynomial, f2: &Polynomial) -> Factorization {
    // the degree guarantees a non-zero leading coefficient
    let r1 = -f1[0] / f1[1];
    let r2 = -f2[0] / f2[1];

    if approx_eq(r1, r2) {
        Factorization::DoubleRoot {
            leading: f1[1] * f2[1],
            root: r1,
        }
    } else {
        Factorization::FactoredLinear {
            factors: [f1.clone(), f2.clone()],
            roots: [r1, r2],
        }
    }
}

/// Classify an expanded denominator.
pub fn classify_expanded(den: &Polynomial) -> Factorization {
    match den.degree() {
        2 => {
            let (a, b, c) = (den[2], den[1], den[0]);
            match solve_quadratic(a, b, c) {
                QuadraticRoots::Distinct(x1, x2) => Factorization::DistinctRoots {
                    leading: a,
                    roots: [x1, x2],
                },
                QuadraticRoots::Double(x0) => Factorization::DoubleRoot {
                    leading: a,
                    root: x0,
                },
                QuadraticRoots::Complex => Factorization::IrreducibleQuadratic {
                    quadratic: den.clone(),
                },
            }
        }
        4 => classify_biquadratic(den).unwrap_or_else(|| Factorization::Quartic {
            polynomial: den.clone(),
        }),
        degree => Factorization::Unknown { degree },
    }
}

/// Write `a*x^4 + b*x^2 + c` as `a*(x^2 + p1)(x^2 + p2)` where `-p1, -p2` are
/// the roots of `a*t^2 + b*t + c`. Only succeeds if both `p` are positive.
fn classify_biquadratic(den: &Polynomial) -> Option<Factorization> {
    if !is_zero(den[1]) || !is_zero(den[3]) {
        return None;
    }

    let (a, b, c) = (den[4], den[2], den[0]);
    match solve_quadratic(a, b, c) {
        QuadraticRoots::Distinct(t1, t2) if -t1 > EPS && -t2 > EPS => {
            Some(Factorization::Biquadratic {
                leading: a,
                shifts: [-t1, -t2],
            })
        }
        _ => None,
    }
}
