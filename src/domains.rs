//! Numeric building blocks: floating-point tolerances and a dense linear
//! solver.
pub mod float;
pub mod linear_system;
