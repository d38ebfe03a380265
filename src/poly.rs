//! Dense univariate polynomials, their factored forms and the
//! classification of denominators.

pub mod expression;
pub mod factor;
pub mod univariate;

pub use expression::Expression;
pub use factor::{classify, Factorization, FactorizationKind};
pub use univariate::Polynomial;
