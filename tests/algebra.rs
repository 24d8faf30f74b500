use twine::algebra::{
    expr::AlgebraicExpression as E,
    infix, latex,
    order::order,
    parser::parse_algebraic,
    simplify::simplify,
};

fn x() -> E {
    E::sym("x")
}

fn y() -> E {
    E::sym("y")
}

/// A spread of canonical expressions for order and idempotence sweeps.
fn fixtures() -> Vec<E> {
    vec![E::int(-3),
         E::int(0),
         E::int(2),
         E::fraction(1, 2),
         E::real(2.5),
         x(),
         y(),
         E::sym("z"),
         E::product(vec![E::int(2), x()]),
         E::product(vec![x(), y()]),
         E::sum(vec![x(), y()]),
         E::power(x(), E::int(2)),
         E::power(y(), E::int(3)),
         E::factorial(x()),
         E::func("f", vec![x()]),
         E::func("g", vec![x(), y()])]
}

#[test]
fn simplify_is_idempotent() {
    let samples = vec![E::product(vec![E::int(2), E::int(3), x()]),
                       E::sum(vec![x(), x(), E::int(1)]),
                       E::power(E::product(vec![x(), y()]), E::int(2)),
                       E::Quotient(Box::new(x()), Box::new(E::int(2))),
                       E::Difference(vec![x(), y()]),
                       E::sum(vec![E::fraction(1, 3), E::fraction(1, 6), x()]),
                       E::factorial(E::int(4)),
                       E::func("f", vec![E::sum(vec![x(), E::int(0)])])];

    for sample in samples {
        let once = simplify(&sample);
        let twice = simplify(&once);
        assert_eq!(once, twice, "not idempotent for {sample:?}");
    }
}

#[test]
fn fraction_normalization() {
    assert_eq!(simplify(&E::fraction(2, 4)), E::fraction(1, 2));
    assert_eq!(simplify(&E::fraction(-4, -2)), E::int(2));
    assert_eq!(simplify(&E::fraction(4, -2)), E::int(-2));
    assert_eq!(simplify(&E::fraction(-4, 2)), E::int(-2));
    assert_eq!(simplify(&E::fraction(6, 3)), E::int(2));
    assert_eq!(simplify(&E::fraction(0, 5)), E::int(0));
}

#[test]
fn zero_denominator_is_undefined_not_an_error() {
    let result = simplify(&E::fraction(1, 0));
    assert!(result.is_undefined());
}

#[test]
fn undefined_propagates_structurally() {
    let poisoned = E::sum(vec![x(), E::fraction(1, 0)]);
    assert!(simplify(&poisoned).is_undefined());

    let nested = E::product(vec![E::int(2), E::power(E::fraction(3, 0), x())]);
    assert!(simplify(&nested).is_undefined());

    assert!(simplify(&E::power(E::int(0), E::int(0))).is_undefined());
    assert!(simplify(&E::power(E::int(0), E::int(-1))).is_undefined());
}

#[test]
fn order_is_a_strict_total_order() {
    let fixtures = fixtures();
    for a in &fixtures {
        for b in &fixtures {
            let forward = order(a, b);
            let backward = order(b, a);
            let equal = a == b;
            let holds = usize::from(forward) + usize::from(backward) + usize::from(equal);
            assert_eq!(holds, 1,
                       "trichotomy violated for {a:?} vs {b:?}: \
                        order(a,b)={forward}, order(b,a)={backward}, eq={equal}");
        }
    }
}

#[test]
fn numeric_atoms_precede_everything() {
    assert!(order(&E::int(100), &x()));
    assert!(order(&E::fraction(7, 2), &E::product(vec![E::int(2), x()])));
    assert!(order(&E::real(1e9), &E::func("f", vec![x()])));
}

#[test]
fn symbols_order_lexicographically() {
    assert!(order(&x(), &y()));
    assert!(!order(&y(), &x()));
    assert!(order(&E::sym("a"), &E::sym("ab")));
}

#[test]
fn promoted_comparisons() {
    // x against x^2: promote x to x^1, compare exponents.
    assert!(order(&x(), &E::power(x(), E::int(2))));
    assert!(order(&E::power(x(), E::int(-1)), &x()));

    // x against 2*x: promote x to a one-operand product.
    assert!(order(&x(), &E::product(vec![E::int(2), x()])));

    // x! sits after x, before f(x) by name comparison on ties.
    assert!(order(&x(), &E::factorial(x())));
    assert!(order(&E::sym("f"), &E::func("f", vec![x()])));
}

#[test]
fn simplification_scenarios() {
    assert_eq!(simplify(&E::product(vec![E::int(2), E::int(3)])), E::int(6));
    assert_eq!(simplify(&E::sum(vec![x(), E::int(0)])), x());
    assert_eq!(simplify(&E::power(x(), E::int(0))), E::int(1));
    assert_eq!(simplify(&E::power(x(), E::int(1))), x());
    assert_eq!(simplify(&E::power(E::int(1), y())), E::int(1));
    assert_eq!(simplify(&E::product(vec![x(), E::int(1)])), x());
    assert_eq!(simplify(&E::product(vec![x(), E::int(0)])), E::int(0));
}

#[test]
fn like_terms_collect() {
    assert_eq!(simplify(&E::sum(vec![x(), x()])),
               E::product(vec![E::int(2), x()]));
    assert_eq!(simplify(&E::sum(vec![E::product(vec![E::int(2), x()]),
                                     E::product(vec![E::int(3), x()])])),
               E::product(vec![E::int(5), x()]));
    // Opposite coefficients cancel to zero.
    assert_eq!(simplify(&E::sum(vec![x(), E::product(vec![E::int(-1), x()])])),
               E::int(0));
}

#[test]
fn same_base_factors_merge() {
    assert_eq!(simplify(&E::product(vec![x(), x()])),
               E::power(x(), E::int(2)));
    assert_eq!(simplify(&E::product(vec![E::power(x(), E::int(2)),
                                         E::power(x(), E::int(3))])),
               E::power(x(), E::int(5)));
    // x * x^-1 collapses entirely.
    assert_eq!(simplify(&E::product(vec![x(), E::power(x(), E::int(-1))])),
               E::int(1));
}

#[test]
fn power_rules() {
    // Nested integer exponents multiply.
    assert_eq!(simplify(&E::power(E::power(x(), E::int(2)), E::int(3))),
               E::power(x(), E::int(6)));
    // Integer exponents distribute over products.
    assert_eq!(simplify(&E::power(E::product(vec![x(), y()]), E::int(2))),
               E::product(vec![E::power(x(), E::int(2)), E::power(y(), E::int(2))]));
    // Rational bases fold exactly.
    assert_eq!(simplify(&E::power(E::fraction(2, 3), E::int(2))),
               E::fraction(4, 9));
    assert_eq!(simplify(&E::power(E::int(2), E::int(-2))), E::fraction(1, 4));
    // Non-integer exponents stay unevaluated.
    assert_eq!(simplify(&E::power(x(), E::fraction(1, 2))),
               E::power(x(), E::fraction(1, 2)));
}

#[test]
fn differences_and_quotients_rewrite() {
    assert_eq!(simplify(&E::Difference(vec![x(), x()])), E::int(0));
    assert_eq!(simplify(&E::Difference(vec![E::int(5), E::int(3)])), E::int(2));
    assert_eq!(simplify(&E::Quotient(Box::new(E::int(6)), Box::new(E::int(4)))),
               E::fraction(3, 2));
    assert_eq!(simplify(&E::Quotient(Box::new(x()), Box::new(x()))), E::int(1));
    assert!(simplify(&E::Quotient(Box::new(x()), Box::new(E::int(0)))).is_undefined());
}

#[test]
fn factorials_fold_for_small_integers() {
    assert_eq!(simplify(&E::factorial(E::int(0))), E::int(1));
    assert_eq!(simplify(&E::factorial(E::int(5))), E::int(120));
    assert_eq!(simplify(&E::factorial(E::int(20))),
               E::int(2_432_902_008_176_640_000));
    // Symbolic arguments stay symbolic.
    assert_eq!(simplify(&E::factorial(x())), E::factorial(x()));
}

#[test]
fn rational_constant_folding_in_sums() {
    assert_eq!(simplify(&E::sum(vec![E::fraction(1, 3), E::fraction(1, 6)])),
               E::fraction(1, 2));
    assert_eq!(simplify(&E::sum(vec![E::fraction(1, 2), E::fraction(1, 2)])),
               E::int(1));
}

#[test]
fn parsed_algebra_string_reaches_canonical_form() {
    let canonical = simplify(&parse_algebraic("2x + 1").unwrap());
    assert_eq!(canonical,
               E::sum(vec![E::product(vec![E::int(2), x()]), E::int(1)]));

    let canonical = simplify(&parse_algebraic("x + x").unwrap());
    assert_eq!(canonical, E::product(vec![E::int(2), x()]));

    let canonical = simplify(&parse_algebraic("(x + 1) - (x + 1)").unwrap());
    assert_eq!(canonical, E::int(0));

    let canonical = simplify(&parse_algebraic("3! + x").unwrap());
    assert_eq!(canonical, E::sum(vec![x(), E::int(6)]));
}

#[test]
fn algebra_parser_handles_functions_and_constants() {
    let raw = parse_algebraic("sin(x) + pi").unwrap();
    let E::Sum(ops) = &raw else {
        panic!("expected a sum, got {raw:?}");
    };
    assert_eq!(ops[0], E::func("sin", vec![x()]));
    assert!(matches!(&ops[1], E::Constant { name, value: Some(_) } if name == "pi"));
}

#[test]
fn algebra_parser_rejects_garbage() {
    assert!(parse_algebraic("2 +").is_err());
    assert!(parse_algebraic("(x").is_err());
    assert!(parse_algebraic("").is_err());
}

#[test]
fn infix_rendering_is_read_only_and_precedence_aware() {
    let e = simplify(&parse_algebraic("2x + 1").unwrap());
    let before = e.clone();
    assert_eq!(infix::render_algebraic(&e), "2*x + 1");
    assert_eq!(e, before);

    let grouped = E::product(vec![E::int(2), E::sum(vec![x(), E::int(1)])]);
    assert_eq!(infix::render_algebraic(&grouped), "2*(x + 1)");

    let nested_power = E::power(E::sum(vec![x(), y()]), E::int(2));
    assert_eq!(infix::render_algebraic(&nested_power), "(x + y)^2");
}

#[test]
fn latex_rendering() {
    assert_eq!(latex::render_algebraic(&E::fraction(1, 2)), "\\frac{1}{2}");
    assert_eq!(latex::render_algebraic(&E::power(x(), E::int(2))), "{x}^{2}");
    assert_eq!(latex::render_algebraic(&E::func("sin", vec![x()])),
               "\\sin\\left(x\\right)");
    assert_eq!(latex::render_algebraic(&E::Constant { name:  "pi".to_string(),
                                                      value: Some(std::f64::consts::PI.into()), }),
               "\\pi");
}

#[test]
fn undefined_renders_as_a_value() {
    let undefined = simplify(&E::fraction(3, 0));
    assert_eq!(infix::render_algebraic(&undefined), "Undefined");
}
