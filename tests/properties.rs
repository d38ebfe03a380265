//! Property-based tests for polynomial arithmetic, the parser and the solver.

use proptest::prelude::*;

use apartint::{
    domains::linear_system::Matrix,
    parser::parse_polynomial,
    Polynomial,
};

// small integer coefficients keep the arithmetic exact
fn small_coeff() -> impl Strategy<Value = f64> {
    (-20i32..=20).prop_map(f64::from)
}

fn small_poly() -> impl Strategy<Value = Polynomial> {
    proptest::collection::vec(small_coeff(), 1..=5).prop_map(Polynomial::new)
}

/// Coefficients with at most four significant digits across a wide range of
/// magnitudes, so that printing them switches to scientific notation.
fn wide_coeff() -> impl Strategy<Value = f64> {
    (-9999i32..=9999, -8i32..=8).prop_map(|(m, k)| f64::from(m) * 10f64.powi(k))
}

fn wide_poly() -> impl Strategy<Value = Polynomial> {
    proptest::collection::vec(wide_coeff(), 1..=5).prop_map(Polynomial::new)
}

fn real_coeff() -> impl Strategy<Value = f64> {
    (-1000i32..=1000).prop_map(|v| f64::from(v) / 100.)
}

/// A diagonally dominant system of size 2 to 4 with a known solution.
fn system() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<f64>)> {
    (2usize..=4).prop_flat_map(|n| {
        (
            proptest::collection::vec(proptest::collection::vec(real_coeff(), n), n),
            proptest::collection::vec(real_coeff(), n),
        )
            .prop_map(move |(mut rows, x)| {
                for (i, row) in rows.iter_mut().enumerate() {
                    let off: f64 = row.iter().map(|v| v.abs()).sum();
                    row[i] = if row[i] < 0. { -off - 1. } else { off + 1. };
                }
                (rows, x)
            })
    })
}

proptest! {
    #[test]
    fn mul_commutative(a in small_poly(), b in small_poly()) {
        prop_assert!((&a * &b).approx_eq(&(&b * &a)));
    }

    #[test]
    fn mul_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
        prop_assert!((&(&a * &b) * &c).approx_eq(&(&a * &(&b * &c))));
    }

    #[test]
    fn mul_identity(a in small_poly()) {
        let one = Polynomial::one();
        prop_assert!((&a * &one).approx_eq(&a));
        prop_assert!((&one * &a).approx_eq(&a));
    }

    #[test]
    fn mul_degree(a in small_poly(), b in small_poly()) {
        prop_assume!(!a.is_zero() && !b.is_zero());
        prop_assert_eq!((&a * &b).degree(), a.degree() + b.degree());
    }

    #[test]
    fn display_parse_round_trip(p in small_poly()) {
        let parsed = parse_polynomial(&p.to_string()).unwrap();
        prop_assert!(parsed.approx_eq(&p), "{} parsed as {}", p, parsed);
    }

    #[test]
    fn scientific_display_parse_round_trip(p in wide_poly()) {
        let parsed = parse_polynomial(&p.to_string()).unwrap();
        prop_assert_eq!(parsed.degree(), p.degree());
        for (a, b) in parsed.coefficients().iter().zip(p.coefficients()) {
            prop_assert!(
                (a - b).abs() <= 1e-9 * b.abs().max(1e-12),
                "{} parsed as {}",
                p,
                parsed
            );
        }
    }

    #[test]
    fn evaluate_matches_product(a in small_poly(), b in small_poly(), x in -3i32..=3) {
        let x = f64::from(x);
        let product = (&a * &b).evaluate(x);
        prop_assert!((product - a.evaluate(x) * b.evaluate(x)).abs() < 1e-6);
    }

    #[test]
    fn solver_recovers_solution((rows, x) in system()) {
        let m = Matrix::from_rows(&rows).unwrap();
        let b = m.mul_vec(&x).unwrap();
        let solution = m.solve(&b).unwrap();

        for (s, e) in solution.iter().zip(&x) {
            prop_assert!((s - e).abs() <= 1e-6 * e.abs().max(1.), "{:?} != {:?}", solution, x);
        }
    }
}
