use apartint::{
    apart::{decompose, PartialFraction},
    error::{Error, ValidationError},
    integrate::integrate_str,
    parser::parse,
    poly::{classify, Factorization, FactorizationKind},
    validate::validate,
};

#[test]
fn validator() {
    let v = validate(&parse("1").unwrap(), &parse("x^2+2").unwrap());
    assert!(v.is_valid());
    assert_eq!((v.numerator.degree(), v.denominator.degree()), (0, 2));

    let v = validate(&parse("x^4+9x-1").unwrap(), &parse("x+1").unwrap());
    assert!(matches!(
        v.error,
        Some(ValidationError::ImproperFraction { .. })
    ));

    assert!(validate(&parse("x").unwrap(), &parse("x^2").unwrap()).is_valid());
}

#[test]
fn irreducible_quadratic_with_log_only() {
    let r = integrate_str("2x", "x^2+1").unwrap();
    assert!(r.valid);
    assert_eq!(r.kind, Some(FactorizationKind::IrreducibleQuadratic));

    match r.factorization {
        Some(Factorization::IrreducibleQuadratic { quadratic }) => {
            assert_eq!(quadratic.coefficients(), &[1., 0., 1.])
        }
        f => panic!("unexpected factorization {:?}", f),
    }

    assert_eq!(r.terms.len(), 1);
    assert!(matches!(
        &r.terms[0],
        PartialFraction::Quadratic { linear, constant, .. } if *linear == 2. && *constant == 0.
    ));
    assert_eq!(r.integrals, vec!["1·ln|x^2+1|"]);
    assert_eq!(r.result, "1·ln|x^2+1| + C");
}

#[test]
fn factored_linear_satisfies_identity() {
    let num = parse("3x + 5").unwrap();
    let den = parse("(x-1)(x-2)").unwrap();

    let f = classify(&den);
    assert_eq!(f.kind(), FactorizationKind::FactoredLinear);
    assert_eq!(f.roots(), vec![1., 2.]);

    let terms = decompose(&num, &f).unwrap();
    let coefficients: Vec<f64> = terms
        .iter()
        .map(|t| match t {
            PartialFraction::GeneralLinear { coefficient, .. } => *coefficient,
            t => panic!("unexpected term {}", t),
        })
        .collect();
    let (a1, a2) = (coefficients[0], coefficients[1]);

    // A1 (x - 2) + A2 (x - 1) = 3x + 5
    for x in [0., 3., -1.5] {
        assert!((a1 * (x - 2.) + a2 * (x - 1.) - (3. * x + 5.)).abs() < 1e-9);
    }
}

#[test]
fn degree_three_is_rejected_before_decomposition() {
    let r = integrate_str("1", "(x+2)(x-3)(x-3)").unwrap();
    assert!(!r.valid);
    assert_eq!(
        r.message,
        "Error: denominator degree (3) not supported. Must be 2 or 4."
    );
    assert!(r.factorization.is_none());
    assert!(r.terms.is_empty());
}

#[test]
fn biquadratic_with_real_roots_is_unsupported() {
    let den = parse("x^4 - x^2").unwrap();
    let f = classify(&den);
    assert_eq!(f.kind(), FactorizationKind::Quartic);

    assert!(matches!(
        decompose(&parse("1").unwrap(), &f),
        Err(Error::Unsupported { .. })
    ));
    assert!(integrate_str("1", "x^4 - x^2").is_err());
}

#[test]
fn general_factored_form() {
    let r = integrate_str("3x + 27", "(3x-2)(x+5)").unwrap();
    assert_eq!(r.kind, Some(FactorizationKind::FactoredLinear));
    assert_eq!(r.integrals.len(), 2);

    // 3x + 27 = A1 (x + 5) + A2 (3x - 2)
    let a: Vec<f64> = r
        .terms
        .iter()
        .map(|t| match t {
            PartialFraction::GeneralLinear { coefficient, .. } => *coefficient,
            t => panic!("unexpected term {}", t),
        })
        .collect();
    for x in [0., 1., -7.] {
        assert!((a[0] * (x + 5.) + a[1] * (3. * x - 2.) - (3. * x + 27.)).abs() < 1e-9);
    }
    assert_eq!(r.integrals, vec!["1.706·ln|3x-2|", "-0.7059·ln|x+5|"]);
}

#[test]
fn every_result_ends_with_the_constant() {
    for (num, den) in [
        ("x-1", "x^2+2"),
        ("1", "x^2+2x+10"),
        ("x", "(x-3)^2"),
        ("1", "x^4+5x^2+6"),
        ("x", "(x^2+1)(x^2+4)"),
        ("x+1", "x(x+1)"),
    ] {
        let r = integrate_str(num, den).unwrap();
        assert!(r.valid, "{}", r.message);
        assert!(r.result.ends_with(" + C"), "{}", r.result);
        assert_eq!(r.integrals.len(), r.terms.len());
    }
}

#[test]
fn json_record() {
    let r = integrate_str("2x", "x^2+1").unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["valid"], true);
    assert_eq!(v["kind"], "quadratico_complexo");
    assert_eq!(v["factorization"]["kind"], "quadratico_complexo");
    assert_eq!(v["result"], "1·ln|x^2+1| + C");
}
