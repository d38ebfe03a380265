//! Structural checks on a fraction before it is decomposed.

use serde::Serialize;
use tracing::debug;

use crate::{
    error::ValidationError,
    poly::{Expression, Polynomial},
    printer::PrintOptions,
};

/// The outcome of [validate]. Both operands are kept in expanded form for
/// reporting and for the degree checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub error: Option<ValidationError>,
    pub numerator: Polynomial,
    pub denominator: Polynomial,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// A human-readable verdict.
    pub fn message(&self, opts: PrintOptions) -> String {
        match &self.error {
            Some(e) => e.to_string(),
            None => format!(
                "Valid fraction: ({}) / ({})",
                self.numerator.format(opts),
                self.denominator.format(opts)
            ),
        }
    }
}

/// Check that `numerator / denominator` is a proper fraction with a
/// denominator of degree 2 or 4 and a numerator of degree at most 1.
///
/// Factored operands are expanded for the checks only.
pub fn validate(numerator: &Expression, denominator: &Expression) -> Validation {
    let num = numerator.expand();
    let den = denominator.expand();

    let error = check(&num, &den);
    debug!(numerator = %num, denominator = %den, error = ?error, "validated fraction");

    Validation {
        error,
        numerator: num,
        denominator: den,
    }
}

fn check(num: &Polynomial, den: &Polynomial) -> Option<ValidationError> {
    if den.is_zero() {
        return Some(ValidationError::ZeroDenominator);
    }

    if num.degree() >= den.degree() {
        return Some(ValidationError::ImproperFraction {
            numerator: num.degree(),
            denominator: den.degree(),
        });
    }

    if den.degree() != 2 && den.degree() != 4 {
        return Some(ValidationError::UnsupportedDenominatorDegree(den.degree()));
    }

    if num.degree() > 1 {
        return Some(ValidationError::NumeratorDegreeTooHigh(num.degree()));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn validate_str(num: &str, den: &str) -> Validation {
        validate(&parse(num).unwrap(), &parse(den).unwrap())
    }

    #[test]
    fn valid_fractions() {
        let v = validate_str("1", "x^2+2");
        assert!(v.is_valid());
        assert_eq!(v.denominator.degree(), 2);
        assert_eq!(v.numerator.degree(), 0);
        assert_eq!(
            v.message(PrintOptions::default()),
            "Valid fraction: (1) / (x^2+2)"
        );

        assert!(validate_str("x", "x^2").is_valid());
        assert!(validate_str("3x+5", "(x-1)(x-2)").is_valid());
        assert!(validate_str("1", "x^4+5x^2+6").is_valid());
        assert!(validate_str("x+1", "x(x+1)").is_valid());
    }

    #[test]
    fn zero_denominator() {
        let v = validate_str("1", "0");
        assert_eq!(v.error, Some(ValidationError::ZeroDenominator));
        assert_eq!(
            v.message(PrintOptions::default()),
            "Error: denominator cannot be zero"
        );
        assert_eq!(
            validate_str("x", "").error,
            Some(ValidationError::ZeroDenominator)
        );
    }

    #[test]
    fn improper_fraction() {
        let v = validate_str("x^4+9x-1", "x+1");
        assert_eq!(
            v.error,
            Some(ValidationError::ImproperFraction {
                numerator: 4,
                denominator: 1
            })
        );
        assert!(v.message(PrintOptions::default()).contains("improper"));

        // the factored denominator is expanded for the degree check
        assert_eq!(
            validate_str("x^4+9x-1", "(x+1)(x^2+x+1)").error,
            Some(ValidationError::ImproperFraction {
                numerator: 4,
                denominator: 3
            })
        );
        assert!(matches!(
            validate_str("x^2+1", "x(x+1)").error,
            Some(ValidationError::ImproperFraction { .. })
        ));
    }

    #[test]
    fn unsupported_degree() {
        let v = validate_str("1", "(x+2)(x-3)(x-3)");
        assert_eq!(
            v.error,
            Some(ValidationError::UnsupportedDenominatorDegree(3))
        );
        assert_eq!(
            v.message(PrintOptions::default()),
            "Error: denominator degree (3) not supported. Must be 2 or 4."
        );
    }

    #[test]
    fn numerator_degree_too_high() {
        assert_eq!(
            validate_str("x^2", "x^4+1").error,
            Some(ValidationError::NumeratorDegreeTooHigh(2))
        );
    }

    #[test]
    fn factored_numerator_is_expanded() {
        let v = validate_str("(x+1)(x-1)", "x^4+1");
        assert_eq!(v.numerator.coefficients(), &[-1., 0., 1.]);
        assert_eq!(v.error, Some(ValidationError::NumeratorDegreeTooHigh(2)));
    }
}
