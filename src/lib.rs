//! Apartint integrates proper rational functions by partial fractions.
//!
//! A fraction `(A*x + B) / Q(x)` with a denominator of degree 2 or 4 is
//! validated, the denominator is classified by its factorization, the
//! fraction is split into partial fractions and each of those is integrated
//! in closed form.
//!
//! For example:
//!
//! ```
//! use apartint::integrate::integrate_str;
//!
//! fn main() {
//!     let r = integrate_str("3x + 5", "(x-1)(x-2)").unwrap();
//!     assert_eq!(r.result, "-8·ln|x-1| + 11·ln|x-2| + C");
//!
//!     for (term, integral) in r.terms.iter().zip(&r.integrals) {
//!         println!("∫ {} dx = {}", term, integral);
//!     }
//! }
//! ```
//!
//! Operands can be given expanded, `x^2-3x+2`, or as a product of
//! parenthesized factors, `(x-1)(x-2)`. Factored denominators are classified
//! as given, so a factorization supplied by the caller is never recomputed.

pub mod apart;
pub mod domains;
pub mod error;
pub mod integrate;
pub mod parser;
pub mod poly;
pub mod printer;
pub mod validate;

pub use error::{Error, Result};
pub use integrate::{integrate, integrate_str, integrate_with, Integration, IntegrationOptions};
pub use poly::{Expression, Polynomial};
