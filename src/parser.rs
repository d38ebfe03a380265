//! Parser for polynomials in `x`.
//!
//! Two input shapes are accepted:
//! - a sum of terms such as `3x^2 - 2x + 5`, where every term is an optional
//!   sign, an optional number, an optional `x` and an optional exponent;
//! - a product of parenthesized factors such as `(x-1)(x+2)`, `x(x+1)` or
//!   `(x-3)^2`, which is kept factored.
//!
//! Numbers may carry a scientific exponent, `1.234e+04`, as printed by
//! [Polynomial]'s `Display`. Whitespace is ignored and `**` is accepted for `^`. Positions in errors
//! refer to the input with whitespace removed.

use ahash::AHashMap;
use tracing::trace;

use crate::{
    error::ParseError,
    poly::{expression::Expression, univariate::Polynomial},
};

/// The largest exponent accepted by the parser.
pub const MAX_DEGREE: u32 = 64;

/// Parse a polynomial that may be given as a product of factors.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let s = normalize(input);

    if let Some((position, character)) = s.char_indices().find(|(_, c)| !c.is_ascii()) {
        return Err(ParseError::UnexpectedCharacter {
            character,
            position,
        });
    }

    let expr = if s.contains(['(', ')']) {
        let mut factors = parse_factors(&s)?;
        if factors.len() == 1 {
            Expression::Expanded(factors.remove(0))
        } else {
            Expression::Factored(factors)
        }
    } else {
        Expression::Expanded(parse_terms(&s, 0)?)
    };

    trace!(input, expression = %expr, "parsed");
    Ok(expr)
}

/// Parse a sum of terms without parentheses.
pub fn parse_polynomial(input: &str) -> Result<Polynomial, ParseError> {
    let s = normalize(input);
    parse_terms(&s, 0)
}

fn normalize(input: &str) -> String {
    let s: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    s.replace("**", "^")
}

fn parse_factors(s: &str) -> Result<Vec<Polynomial>, ParseError> {
    let b = s.as_bytes();
    let mut factors = vec![];
    let mut bare_start = 0;
    let mut i = 0;

    while i < b.len() {
        match b[i] {
            b'(' => {
                push_bare_factor(&s[bare_start..i], bare_start, &mut factors)?;

                let open = i;
                let mut close = None;
                for (k, c) in b.iter().enumerate().skip(open + 1) {
                    match c {
                        b'(' => return Err(ParseError::NestedParenthesis { position: k }),
                        b')' => {
                            close = Some(k);
                            break;
                        }
                        _ => {}
                    }
                }
                let Some(close) = close else {
                    return Err(ParseError::UnbalancedParenthesis { position: open });
                };

                if close == open + 1 {
                    return Err(ParseError::EmptyFactor { position: open });
                }

                let factor = parse_terms(&s[open + 1..close], open + 1)?;
                i = close + 1;

                // `(x-3)^2` repeats the factor
                let mut times = 1;
                if i < b.len() && b[i] == b'^' {
                    let (power, end) = read_integer(s, i + 1)?;
                    times = power;
                    i = end;
                }

                if times == 0 {
                    factors.push(Polynomial::one());
                }
                for _ in 0..times {
                    factors.push(factor.clone());
                }

                bare_start = i;
            }
            b')' => return Err(ParseError::UnbalancedParenthesis { position: i }),
            _ => i += 1,
        }
    }

    push_bare_factor(&s[bare_start..], bare_start, &mut factors)?;

    Ok(factors)
}

/// A factor outside parentheses, such as the `x` in `x(x+1)`. It must be a
/// single term: a sign is only allowed at the very start of the input.
fn push_bare_factor(
    text: &str,
    offset: usize,
    factors: &mut Vec<Polynomial>,
) -> Result<(), ParseError> {
    let (text, offset) = match text.strip_prefix('*') {
        Some(t) if offset > 0 => (t, offset + 1),
        _ => (text, offset),
    };
    let text = text.strip_suffix('*').unwrap_or(text);

    for (k, c) in text.char_indices() {
        if (c == '+' || c == '-') && offset + k > 0 {
            return Err(ParseError::UnexpectedCharacter {
                character: c,
                position: offset + k,
            });
        }
    }

    match text {
        "" | "+" => {}
        "-" => factors.push(Polynomial::new([-1.])),
        _ => factors.push(parse_terms(text, offset)?),
    }

    Ok(())
}

/// Read an unsigned exponent starting at `start`. Returns the value and the
/// position after the last digit.
fn read_integer(s: &str, start: usize) -> Result<(u32, usize), ParseError> {
    let b = s.as_bytes();
    let mut end = start;
    while end < b.len() && b[end].is_ascii_digit() {
        end += 1;
    }

    let literal = &s[start..end];
    let value = literal
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidExponent {
            literal: literal.to_owned(),
            position: start,
        })?;

    if value > MAX_DEGREE {
        return Err(ParseError::DegreeTooLarge {
            degree: value,
            max: MAX_DEGREE,
        });
    }

    Ok((value, end))
}

/// Tokenize `s` into signed terms and collect the coefficients per power.
/// `offset` is the position of `s` in the full input.
fn parse_terms(s: &str, offset: usize) -> Result<Polynomial, ParseError> {
    let b = s.as_bytes();
    let mut terms: AHashMap<u32, f64> = AHashMap::default();
    let mut i = 0;

    while i < b.len() {
        let start = i;
        let sign = match b[i] {
            b'+' => {
                i += 1;
                1.
            }
            b'-' => {
                i += 1;
                -1.
            }
            _ if i == 0 => 1.,
            c => {
                return Err(ParseError::UnexpectedCharacter {
                    character: c as char,
                    position: offset + i,
                })
            }
        };

        let num_start = i;
        while i < b.len() && (b[i].is_ascii_digit() || b[i] == b'.') {
            i += 1;
        }
        if i > num_start {
            i = scan_exponent(b, i);
        }
        let number = if i > num_start {
            let literal = &s[num_start..i];
            let invalid = || ParseError::InvalidNumber {
                literal: literal.to_owned(),
                position: offset + num_start,
            };
            let value = literal.parse::<f64>().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            Some(value)
        } else {
            None
        };

        if i < b.len() && b[i] == b'*' {
            if i + 1 < b.len() && matches!(b[i + 1], b'x' | b'X') {
                i += 1;
            } else {
                return Err(ParseError::UnexpectedCharacter {
                    character: '*',
                    position: offset + i,
                });
            }
        }

        let has_var = i < b.len() && matches!(b[i], b'x' | b'X');
        let mut exponent = None;
        if has_var {
            i += 1;

            let caret = i < b.len() && b[i] == b'^';
            if caret {
                i += 1;
            }
            if caret || (i < b.len() && b[i].is_ascii_digit()) {
                let (e, end) = read_integer(s, i).map_err(|e| shift(e, offset))?;
                exponent = Some(e);
                i = end;
            }
        } else if i < b.len() && b[i] == b'^' {
            return Err(ParseError::ExponentWithoutVariable {
                position: offset + i,
            });
        }

        if number.is_none() && !has_var {
            if i == start {
                return Err(ParseError::UnexpectedCharacter {
                    character: b[i] as char,
                    position: offset + i,
                });
            }
            // a lone sign
            continue;
        }

        let coefficient = sign * number.unwrap_or(1.);
        let power = if has_var { exponent.unwrap_or(1) } else { 0 };

        *terms.entry(power).or_insert(0.) += coefficient;
    }

    let Some(&max) = terms.keys().max() else {
        return Ok(Polynomial::zero());
    };

    let mut coefficients = vec![0.; max as usize + 1];
    for (power, c) in terms {
        coefficients[power as usize] = c;
    }

    Ok(Polynomial::new(coefficients))
}

/// Skip a scientific exponent such as `e+04` or `E-5` after the mantissa
/// ending at `i`. An `e` that is not followed by digits is left alone.
fn scan_exponent(b: &[u8], i: usize) -> usize {
    if i >= b.len() || !matches!(b[i], b'e' | b'E') {
        return i;
    }

    let mut j = i + 1;
    if j < b.len() && matches!(b[j], b'+' | b'-') {
        j += 1;
    }
    if j >= b.len() || !b[j].is_ascii_digit() {
        return i;
    }
    while j < b.len() && b[j].is_ascii_digit() {
        j += 1;
    }
    j
}

fn shift(e: ParseError, offset: usize) -> ParseError {
    match e {
        ParseError::InvalidExponent { literal, position } => ParseError::InvalidExponent {
            literal,
            position: position + offset,
        },
        e => e,
    }
}
