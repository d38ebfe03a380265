use thiserror::Error;

use crate::poly::factor::FactorizationKind;

/// Malformed polynomial text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid number `{literal}` at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("unexpected character `{character}` at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("invalid exponent `{literal}` at position {position}")]
    InvalidExponent { literal: String, position: usize },

    #[error("exponent without variable at position {position}")]
    ExponentWithoutVariable { position: usize },

    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },

    #[error("nested parentheses are not supported (position {position})")]
    NestedParenthesis { position: usize },

    #[error("empty factor at position {position}")]
    EmptyFactor { position: usize },

    #[error("degree {degree} exceeds the maximum of {max}")]
    DegreeTooLarge { degree: u32, max: u32 },
}

/// A fraction that is structurally outside the supported class.
/// Validation errors are returned as data, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
pub enum ValidationError {
    #[error("Error: denominator cannot be zero")]
    ZeroDenominator,

    #[error(
        "Error: improper fraction (numerator degree {numerator} >= denominator degree {denominator}). Use polynomial division first."
    )]
    ImproperFraction { numerator: usize, denominator: usize },

    #[error("Error: denominator degree ({0}) not supported. Must be 2 or 4.")]
    UnsupportedDenominatorDegree(usize),

    #[error("Error: numerator degree ({0}) must be at most 1 (form Ax + B).")]
    NumeratorDegreeTooHigh(usize),
}

/// Shape errors of the dense solver. Singular systems are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinearSolverError {
    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },

    #[error("right-hand side has {rhs} entries, expected {rows}")]
    DimensionMismatch { rows: usize, rhs: usize },

    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("linear solver error: {0}")]
    LinearSolver(#[from] LinearSolverError),

    #[error("unsupported case `{kind}`: {reason}")]
    Unsupported {
        kind: FactorizationKind,
        reason: String,
    },

    #[error("division by zero: {context}")]
    DivisionByZero { context: String },

    #[error("quadratic `{0}` has real roots, its residual part has no arctangent form")]
    ReducibleQuadratic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
