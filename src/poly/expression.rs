use std::fmt;

use serde::Serialize;

use super::univariate::Polynomial;

/// A parsed polynomial, either as a single coefficient list or as a
/// product of factors that is kept unexpanded.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "form", content = "value", rename_all = "snake_case")]
pub enum Expression {
    Expanded(Polynomial),
    /// Factors in source order, implicitly multiplied.
    Factored(Vec<Polynomial>),
}

impl Expression {
    /// Multiply out the factors. An expanded expression is returned as is.
    pub fn expand(&self) -> Polynomial {
        match self {
            Expression::Expanded(p) => p.clone(),
            Expression::Factored(factors) => {
                let mut iter = factors.iter();
                let Some(first) = iter.next() else {
                    return Polynomial::one();
                };

                iter.fold(first.clone(), |acc, f| &acc * f)
            }
        }
    }

    pub fn is_factored(&self) -> bool {
        matches!(self, Expression::Factored(_))
    }

    /// The factors of a factored expression.
    pub fn factors(&self) -> Option<&[Polynomial]> {
        match self {
            Expression::Expanded(_) => None,
            Expression::Factored(f) => Some(f),
        }
    }
}

impl From<Polynomial> for Expression {
    fn from(value: Polynomial) -> Self {
        Expression::Expanded(value)
    }
}

impl From<Vec<f64>> for Expression {
    fn from(value: Vec<f64>) -> Self {
        Expression::Expanded(Polynomial::new(value))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Expanded(p) => fmt::Display::fmt(p, f),
            Expression::Factored(factors) => {
                for p in factors {
                    f.write_str("(")?;
                    fmt::Display::fmt(p, f)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_factored() {
        let e = Expression::Factored(vec![
            Polynomial::linear(1., -1.),
            Polynomial::linear(1., -2.),
        ]);
        assert!(e.is_factored());
        assert_eq!(e.expand().coefficients(), &[2., -3., 1.]);
        assert_eq!(e.to_string(), "(x-1)(x-2)");
    }

    #[test]
    fn expand_three_factors() {
        let e = Expression::Factored(vec![
            Polynomial::linear(1., 2.),
            Polynomial::linear(1., -3.),
            Polynomial::linear(1., -3.),
        ]);
        // (x+2)(x-3)^2 = x^3 - 4x^2 - 3x + 18
        assert_eq!(e.expand().coefficients(), &[18., -3., -4., 1.]);
    }

    #[test]
    fn expanded_is_identity() {
        let e: Expression = vec![1., 0., 1.].into();
        assert_eq!(e.expand().coefficients(), &[1., 0., 1.]);
        assert!(e.factors().is_none());
    }
}
