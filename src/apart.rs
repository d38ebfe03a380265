//! Partial fraction decomposition of `(A*x + B) / Q(x)` for the denominator
//! shapes recognized by [classify](crate::poly::factor::classify).
//!
//! Every case is solved by equating coefficients: the unknown numerators of
//! the partial fractions are the solution of a small dense linear system.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{
    domains::{
        float::{discriminant, is_zero, EPS},
        linear_system::Matrix,
    },
    error::{Error, Result},
    poly::{Expression, Factorization, Polynomial},
    printer::{NumberPrinter, PrintOptions},
};

/// A single term of a decomposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartialFraction {
    /// `coefficient / (x - root)`
    Linear { coefficient: f64, root: f64 },
    /// `coefficient / (a*x + b)`
    GeneralLinear { coefficient: f64, factor: Polynomial },
    /// `coefficient / (x - root)^2`
    RepeatedLinear { coefficient: f64, root: f64 },
    /// `(linear*x + constant) / (a*x^2 + b*x + c)`
    Quadratic {
        linear: f64,
        constant: f64,
        denominator: Polynomial,
    },
}

impl PartialFraction {
    /// Evaluate the term at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            PartialFraction::Linear { coefficient, root } => coefficient / (x - root),
            PartialFraction::GeneralLinear {
                coefficient,
                factor,
            } => coefficient / factor.evaluate(x),
            PartialFraction::RepeatedLinear { coefficient, root } => {
                coefficient / ((x - root) * (x - root))
            }
            PartialFraction::Quadratic {
                linear,
                constant,
                denominator,
            } => (linear * x + constant) / denominator.evaluate(x),
        }
    }

    pub fn format(&self, opts: PrintOptions) -> String {
        let num = |v: f64| NumberPrinter::new(v, opts);
        match self {
            PartialFraction::Linear { coefficient, root } => format!(
                "{} / ({})",
                num(*coefficient),
                Polynomial::linear(1., -root).format(opts)
            ),
            PartialFraction::GeneralLinear {
                coefficient,
                factor,
            } => format!("{} / ({})", num(*coefficient), factor.format(opts)),
            PartialFraction::RepeatedLinear { coefficient, root } => format!(
                "{} / ({})^2",
                num(*coefficient),
                Polynomial::linear(1., -root).format(opts)
            ),
            PartialFraction::Quadratic {
                linear,
                constant,
                denominator,
            } => format!(
                "({}) / ({})",
                Polynomial::linear(*linear, *constant).format(opts),
                denominator.format(opts)
            ),
        }
    }
}

impl fmt::Display for PartialFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PrintOptions::from_formatter(f)))
    }
}

fn solve_system<const N: usize>(rows: &[[f64; N]; N], rhs: &[f64; N]) -> Result<Vec<f64>> {
    let m = Matrix::from_rows(rows)?;
    let x = m.solve(rhs)?;
    debug!(matrix = %m, rhs = ?rhs, solution = ?x, "solved coefficient system");
    Ok(x)
}

/// Decompose `numerator / denominator`, where the denominator has been
/// classified as `factorization`. The numerator must have degree at most one.
///
/// The terms are ordered like the factors or roots of the classification.
///
/// A biquadratic `a x^4 + b x^2 + c` is written as `a (x^2 + p1)(x^2 + p2)`
/// with `p_i = -t_i` for the roots `t_i` of `a t^2 + b t + c`, so the shifts
/// are positive rather than the roots themselves. Its coefficient system
/// equates the `x^3, x^2, x, 1` coefficients, which makes the right-hand side
/// `[0, 0, A/a, B/a]`; the ordering `[0, A, 0, B]` would only hold for `A = 0`.
/// Every system divides by the leading coefficient `a`, so non-monic
/// denominators decompose correctly.
pub fn decompose(
    numerator: &Expression,
    factorization: &Factorization,
) -> Result<Vec<PartialFraction>> {
    let num = numerator.expand();
    if num.degree() > 1 {
        return Err(Error::Unsupported {
            kind: factorization.kind(),
            reason: format!("numerator {} is not of the form Ax + B", num),
        });
    }

    let (a, b) = (num.coefficient(1), num.coefficient(0));

    let terms = match factorization {
        Factorization::FactoredLinear { factors, .. } => {
            let [f1, f2] = factors;
            let (b1, a1) = (f1[0], f1[1]);
            let (b2, a2) = (f2[0], f2[1]);

            // A x + B = A1 (a2 x + b2) + A2 (a1 x + b1)
            let s = solve_system(&[[a2, a1], [b2, b1]], &[a, b])?;

            vec![
                PartialFraction::GeneralLinear {
                    coefficient: s[0],
                    factor: f1.clone(),
                },
                PartialFraction::GeneralLinear {
                    coefficient: s[1],
                    factor: f2.clone(),
                },
            ]
        }
        Factorization::DistinctRoots { leading, roots } => {
            let [x1, x2] = *roots;

            // A x + B = leading (A1 (x - x2) + A2 (x - x1))
            let s = solve_system(&[[1., 1.], [-x2, -x1]], &[a / leading, b / leading])?;

            vec![
                PartialFraction::Linear {
                    coefficient: s[0],
                    root: x1,
                },
                PartialFraction::Linear {
                    coefficient: s[1],
                    root: x2,
                },
            ]
        }
        Factorization::DoubleRoot { leading, root } => {
            let x0 = *root;

            // A x + B = leading (A1 (x - x0) + A2)
            let s = solve_system(&[[1., 0.], [-x0, 1.]], &[a / leading, b / leading])?;

            vec![
                PartialFraction::Linear {
                    coefficient: s[0],
                    root: x0,
                },
                PartialFraction::RepeatedLinear {
                    coefficient: s[1],
                    root: x0,
                },
            ]
        }
        Factorization::IrreducibleQuadratic { quadratic } => {
            vec![PartialFraction::Quadratic {
                linear: a,
                constant: b,
                denominator: quadratic.clone(),
            }]
        }
        Factorization::Biquadratic { leading, shifts } => {
            let [p1, p2] = *shifts;

            // A x + B = leading ((C1 x + D1)(x^2 + p2) + (C2 x + D2)(x^2 + p1))
            let s = solve_system(
                &[
                    [1., 0., 1., 0.],
                    [0., 1., 0., 1.],
                    [p2, 0., p1, 0.],
                    [0., p2, 0., p1],
                ],
                &[0., 0., a / leading, b / leading],
            )?;

            vec![
                PartialFraction::Quadratic {
                    linear: s[0],
                    constant: s[1],
                    denominator: Polynomial::quadratic(1., 0., p1),
                },
                PartialFraction::Quadratic {
                    linear: s[2],
                    constant: s[3],
                    denominator: Polynomial::quadratic(1., 0., p2),
                },
            ]
        }
        Factorization::FactoredQuadratics { factors } => {
            for q in factors {
                if discriminant(q[2], q[1], q[0]) > -EPS {
                    return Err(Error::Unsupported {
                        kind: factorization.kind(),
                        reason: format!("quadratic factor {} has real roots", q),
                    });
                }
            }

            let [q1, q2] = factors;
            let (a1, b1, c1) = (q1[2], q1[1], q1[0]);
            let (a2, b2, c2) = (q2[2], q2[1], q2[0]);

            // proportional factors form a repeated quadratic and a singular system
            if is_zero(a1 * b2 - a2 * b1)
                && is_zero(a1 * c2 - a2 * c1)
                && is_zero(b1 * c2 - b2 * c1)
            {
                return Err(Error::Unsupported {
                    kind: factorization.kind(),
                    reason: format!("{} and {} form a repeated quadratic factor", q1, q2),
                });
            }

            // A x + B = (C1 x + D1) q2 + (C2 x + D2) q1, per power of x
            let s = solve_system(
                &[
                    [a2, 0., a1, 0.],
                    [b2, a2, b1, a1],
                    [c2, b2, c1, b1],
                    [0., c2, 0., c1],
                ],
                &[0., 0., a, b],
            )?;

            vec![
                PartialFraction::Quadratic {
                    linear: s[0],
                    constant: s[1],
                    denominator: q1.clone(),
                },
                PartialFraction::Quadratic {
                    linear: s[2],
                    constant: s[3],
                    denominator: q2.clone(),
                },
            ]
        }
        Factorization::Quartic { polynomial } => {
            return Err(Error::Unsupported {
                kind: factorization.kind(),
                reason: format!(
                    "{} is not a product of two irreducible quadratics x^2 + p",
                    polynomial
                ),
            })
        }
        Factorization::Unknown { degree } => {
            return Err(Error::Unsupported {
                kind: factorization.kind(),
                reason: format!("denominators of degree {} cannot be decomposed", degree),
            })
        }
    };

    Ok(terms)
}
