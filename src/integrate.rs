//! Closed-form integration of partial fractions and the complete
//! validate → classify → decompose → integrate pipeline.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::{
    apart::{decompose, PartialFraction},
    domains::float::{approx_eq, chop, discriminant, is_zero, EPS},
    error::{Error, Result},
    parser::parse,
    poly::{classify, Expression, Factorization, FactorizationKind, Polynomial},
    printer::{NumberPrinter, PrintOptions},
    validate::validate,
};

/// One summand of an antiderivative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegralPart {
    /// `coefficient * ln|argument|`
    Log {
        coefficient: f64,
        argument: Polynomial,
    },
    /// `coefficient * arctan((x + shift) / scale)`
    Arctan {
        coefficient: f64,
        shift: f64,
        scale: f64,
    },
    /// `coefficient / argument`
    Reciprocal {
        coefficient: f64,
        argument: Polynomial,
    },
}

impl IntegralPart {
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            IntegralPart::Log {
                coefficient,
                argument,
            } => coefficient * argument.evaluate(x).abs().ln(),
            IntegralPart::Arctan {
                coefficient,
                shift,
                scale,
            } => coefficient * ((x + shift) / scale).atan(),
            IntegralPart::Reciprocal {
                coefficient,
                argument,
            } => coefficient / argument.evaluate(x),
        }
    }

    pub fn format(&self, opts: PrintOptions) -> String {
        let num = |v: f64| NumberPrinter::new(chop(v), opts);

        match self {
            IntegralPart::Log {
                coefficient,
                argument,
            } => format!("{}·ln|{}|", num(*coefficient), argument.format(opts)),
            IntegralPart::Arctan {
                coefficient,
                shift,
                scale,
            } => {
                let arg = Polynomial::linear(1., *shift).format(opts);
                if approx_eq(*scale, 1.) {
                    format!("{}·arctan({})", num(*coefficient), arg)
                } else if is_zero(*shift) {
                    format!("{}·arctan({} / {})", num(*coefficient), arg, num(*scale))
                } else {
                    format!("{}·arctan(({}) / {})", num(*coefficient), arg, num(*scale))
                }
            }
            IntegralPart::Reciprocal {
                coefficient,
                argument,
            } => format!("{} / ({})", num(*coefficient), argument.format(opts)),
        }
    }
}

impl fmt::Display for IntegralPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PrintOptions::from_formatter(f)))
    }
}

/// The antiderivative of a single partial fraction, as a sum of parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Antiderivative {
    pub parts: Vec<IntegralPart>,
}

impl Antiderivative {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.parts.iter().map(|p| p.evaluate(x)).sum()
    }

    /// The parts joined by ` + `, or `0` if there are none.
    pub fn format(&self, opts: PrintOptions) -> String {
        if self.parts.is_empty() {
            return "0".to_owned();
        }

        self.parts
            .iter()
            .map(|p| p.format(opts))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl fmt::Display for Antiderivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(PrintOptions::from_formatter(f)))
    }
}

/// Integrate a single partial fraction.
pub fn integrate_term(term: &PartialFraction) -> Result<Antiderivative> {
    let parts = match term {
        PartialFraction::Linear { coefficient, root } => vec![IntegralPart::Log {
            coefficient: *coefficient,
            argument: Polynomial::linear(1., -root),
        }],
        PartialFraction::GeneralLinear {
            coefficient,
            factor,
        } => {
            let a = factor.coefficient(1);
            if is_zero(a) {
                return Err(Error::DivisionByZero {
                    context: format!("linear factor {} has no x term", factor),
                });
            }

            vec![IntegralPart::Log {
                coefficient: coefficient / a,
                argument: factor.clone(),
            }]
        }
        PartialFraction::RepeatedLinear { coefficient, root } => {
            vec![IntegralPart::Reciprocal {
                coefficient: -coefficient,
                argument: Polynomial::linear(1., -root),
            }]
        }
        PartialFraction::Quadratic {
            linear,
            constant,
            denominator,
        } => integrate_quadratic(*linear, *constant, denominator)?,
    };

    Ok(Antiderivative { parts })
}

/// `∫ (C x + D) / (a x^2 + b x + c) dx`. The numerator is split as
/// `C/(2a) * (2a x + b) + D_adj`, where the first part integrates to a
/// logarithm and the residual constant to an arctangent.
fn integrate_quadratic(c_lin: f64, d: f64, q: &Polynomial) -> Result<Vec<IntegralPart>> {
    let (a, b, c) = (q.coefficient(2), q.coefficient(1), q.coefficient(0));
    if is_zero(a) {
        return Err(Error::DivisionByZero {
            context: format!("quadratic {} has no x^2 term", q),
        });
    }

    let mut parts = vec![];

    if c_lin.abs() >= EPS {
        parts.push(IntegralPart::Log {
            coefficient: c_lin / (2. * a),
            argument: q.clone(),
        });
    }

    let d_adj = d - c_lin * b / (2. * a);
    if discriminant(a, b, c) < -EPS {
        // a (x + h)^2 + k
        let h = b / (2. * a);
        let k = (4. * a * c - b * b) / (4. * a);

        if d_adj.abs() >= EPS && k.abs() >= EPS {
            let scale = (k / a).sqrt();
            parts.push(IntegralPart::Arctan {
                coefficient: d_adj / (a * scale),
                shift: h,
                scale,
            });
        }
    } else if d_adj.abs() >= EPS {
        return Err(Error::ReducibleQuadratic(q.to_string()));
    }

    Ok(parts)
}

/// Settings of the pipeline that only affect the rendered strings.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationOptions {
    pub print: PrintOptions,
    /// The marker appended for the constant of integration.
    pub constant: String,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        IntegrationOptions {
            print: PrintOptions::default(),
            constant: "C".to_owned(),
        }
    }
}

/// Every intermediate step of an integration.
///
/// An invalid fraction yields `valid == false` with the validation message
/// and all later steps empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Integration {
    pub valid: bool,
    pub message: String,
    pub numerator: Polynomial,
    pub denominator: Polynomial,
    pub kind: Option<FactorizationKind>,
    pub factorization: Option<Factorization>,
    pub terms: Vec<PartialFraction>,
    pub antiderivatives: Vec<Antiderivative>,
    pub integrals: Vec<String>,
    pub result: String,
}

/// Integrate `numerator / denominator` with default options.
pub fn integrate(numerator: &Expression, denominator: &Expression) -> Result<Integration> {
    integrate_with(numerator, denominator, &IntegrationOptions::default())
}

/// Parse both operands and integrate with default options.
pub fn integrate_str(numerator: &str, denominator: &str) -> Result<Integration> {
    integrate(&parse(numerator)?, &parse(denominator)?)
}

/// Integrate `numerator / denominator`.
///
/// Validation failures are reported in the returned record. Parse failures,
/// unsupported denominator shapes and divisions by zero are errors.
pub fn integrate_with(
    numerator: &Expression,
    denominator: &Expression,
    opts: &IntegrationOptions,
) -> Result<Integration> {
    let validation = validate(numerator, denominator);
    let message = validation.message(opts.print);

    let mut res = Integration {
        valid: validation.is_valid(),
        message,
        numerator: validation.numerator,
        denominator: validation.denominator,
        kind: None,
        factorization: None,
        terms: vec![],
        antiderivatives: vec![],
        integrals: vec![],
        result: String::new(),
    };

    if !res.valid {
        debug!(message = %res.message, "fraction rejected");
        return Ok(res);
    }

    // classify the original input so that given factors are kept
    let factorization = classify(denominator);
    let terms = decompose(numerator, &factorization)?;

    let mut antiderivatives = Vec::with_capacity(terms.len());
    for t in &terms {
        let a = integrate_term(t)?;
        debug!(term = %t, antiderivative = %a, "integrated term");
        antiderivatives.push(a);
    }

    res.integrals = antiderivatives
        .iter()
        .map(|a| a.format(opts.print))
        .collect();
    res.result = if res.integrals.is_empty() {
        opts.constant.clone()
    } else {
        format!("{} + {}", res.integrals.join(" + "), opts.constant)
    };

    res.kind = Some(factorization.kind());
    res.factorization = Some(factorization);
    res.terms = terms;
    res.antiderivatives = antiderivatives;

    Ok(res)
}
