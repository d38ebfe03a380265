//! Number formatting for reports.
//!
//! Coefficients are printed with a fixed number of significant digits,
//! switching to scientific notation for very small or very large magnitudes
//! (the `%g` convention).

use std::fmt::{self, Write};

use smartstring::{LazyCompact, SmartString};

/// The default number of significant digits.
pub const DEFAULT_PRECISION: usize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Number of significant digits of every printed coefficient.
    pub precision: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl PrintOptions {
    pub fn with_precision(precision: usize) -> PrintOptions {
        PrintOptions {
            precision: precision.max(1),
        }
    }

    /// Take the precision from the formatter if one was given, e.g. `{:.6}`.
    pub fn from_formatter(f: &fmt::Formatter) -> PrintOptions {
        match f.precision() {
            Some(p) => PrintOptions::with_precision(p),
            None => PrintOptions::default(),
        }
    }
}

/// Prints a single coefficient with the configured precision.
pub struct NumberPrinter {
    pub value: f64,
    pub opts: PrintOptions,
}

impl NumberPrinter {
    pub fn new(value: f64, opts: PrintOptions) -> NumberPrinter {
        NumberPrinter { value, opts }
    }
}

impl fmt::Display for NumberPrinter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format_significant(self.value, self.opts.precision))
    }
}

/// Format `value` with `digits` significant digits, removing trailing zeros.
pub fn format_significant(value: f64, digits: usize) -> SmartString<LazyCompact> {
    let mut out = SmartString::new();

    if value.is_nan() {
        out.push_str("nan");
        return out;
    }
    if value.is_infinite() {
        out.push_str(if value < 0. { "-inf" } else { "inf" });
        return out;
    }
    if value == 0. {
        out.push('0');
        return out;
    }

    let digits = digits.max(1);

    // the exponent after rounding to `digits` places
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= digits as i32 {
        out.push_str(strip_zeros(mantissa));
        let _ = write!(
            out,
            "e{}{:02}",
            if exp < 0 { '-' } else { '+' },
            exp.unsigned_abs()
        );
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        out.push_str(strip_zeros(&fixed));
    }

    if out == "-0" {
        out = SmartString::from("0");
    }
    out
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
