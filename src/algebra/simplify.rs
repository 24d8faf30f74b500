use crate::{
    algebra::{expr::AlgebraicExpression, order},
    util::num::gcd,
};

/// Rewrites an expression to canonical form.
///
/// The pass is bottom-up: every operand is simplified first, then the node
/// itself is rewritten by kind. The result is canonical: rationals are in
/// lowest terms with the sign on the numerator, sums and products are
/// flattened, sorted by the total order, and have their like terms
/// collected, and `x^1`/`x*1`/`x+0` shapes are gone.
///
/// Simplification never fails: undefined results (division by zero, `0^0`)
/// are the `Undefined` sentinel value, and any operand equal to `Undefined`
/// makes the whole result `Undefined`.
///
/// Running the pass twice changes nothing: `simplify(simplify(e))` equals
/// `simplify(e)` for every `e`.
///
/// # Example
/// ```
/// use twine::algebra::{expr::AlgebraicExpression as E, simplify::simplify};
///
/// let e = E::product(vec![E::int(2), E::int(3)]);
/// assert_eq!(simplify(&e), E::int(6));
///
/// let e = E::sum(vec![E::sym("x"), E::int(0)]);
/// assert_eq!(simplify(&e), E::sym("x"));
/// ```
#[must_use]
pub fn simplify(e: &AlgebraicExpression) -> AlgebraicExpression {
    use AlgebraicExpression as E;

    match e {
        E::Int(_) | E::Real(_) | E::Sym(_) | E::Constant { .. } => e.clone(),

        E::Fraction(numerator, denominator) => simplify_rational(*numerator, *denominator),

        E::Power { base, exponent } => {
            let base = simplify(base);
            let exponent = simplify(exponent);
            simplify_power(base, exponent)
        },

        E::Sum(operands) => match simplify_all(operands) {
            Ok(operands) => simplify_sum(operands),
            Err(undefined) => undefined,
        },

        E::Product(operands) => match simplify_all(operands) {
            Ok(operands) => simplify_product(operands),
            Err(undefined) => undefined,
        },

        // `a - b` rewrites to `a + (-1)*b`, unary `-a` to `(-1)*a`.
        E::Difference(operands) => match simplify_all(operands) {
            Ok(operands) => simplify_difference(operands),
            Err(undefined) => undefined,
        },

        // `a / b` rewrites to `a * b^-1`.
        E::Quotient(numer, denom) => {
            let numer = simplify(numer);
            let denom = simplify(denom);
            if numer.is_undefined() {
                return numer;
            }
            let inverse = simplify_power(denom, E::Int(-1));
            if inverse.is_undefined() {
                return inverse;
            }
            simplify_product(vec![numer, inverse])
        },

        E::Factorial(operand) => {
            let operand = simplify(operand);
            if operand.is_undefined() {
                return operand;
            }
            if let E::Int(n) = operand {
                if (0..=20).contains(&n) {
                    return E::Int((1..=n).product());
                }
            }
            E::Factorial(Box::new(operand))
        },

        E::Func { name, args } => match simplify_all(args) {
            Ok(args) => E::Func { name: name.clone(),
                                  args },
            Err(undefined) => undefined,
        },
    }
}

/// Rewrites a difference into sum-of-negated form.
fn simplify_difference(operands: Vec<AlgebraicExpression>) -> AlgebraicExpression {
    use AlgebraicExpression as E;

    let mut operands = operands.into_iter();
    match (operands.next(), operands.next()) {
        (Some(only), None) => simplify_product(vec![E::Int(-1), only]),
        (Some(minuend), Some(subtrahend)) => {
            let negated = simplify_product(vec![E::Int(-1), subtrahend]);
            simplify_sum(vec![minuend, negated])
        },
        _ => E::undefined("malformed difference"),
    }
}

/// Simplifies every operand, short-circuiting on the first `Undefined`.
fn simplify_all(operands: &[AlgebraicExpression])
                -> Result<Vec<AlgebraicExpression>, AlgebraicExpression> {
    let simplified: Vec<AlgebraicExpression> = operands.iter().map(simplify).collect();
    match simplified.iter().find(|op| op.is_undefined()) {
        Some(undefined) => Err(undefined.clone()),
        None => Ok(simplified),
    }
}

/// Reduces an integer pair to a canonical rational number.
///
/// The sign is carried on the numerator, the denominator stays positive,
/// and a denominator of one collapses to an integer. A zero denominator
/// yields `Undefined`.
#[must_use]
pub fn simplify_rational(numerator: i64, denominator: i64) -> AlgebraicExpression {
    if denominator == 0 {
        return AlgebraicExpression::undefined("division by zero");
    }
    let (mut numerator, mut denominator) = (numerator, denominator);
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }
    let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs());
    if divisor > 1 {
        numerator /= i64::try_from(divisor).unwrap_or(1);
        denominator /= i64::try_from(divisor).unwrap_or(1);
    }
    if denominator == 1 {
        AlgebraicExpression::Int(numerator)
    } else {
        AlgebraicExpression::Fraction(numerator, denominator)
    }
}

/// Simplifies `base ^ exponent`, both already canonical.
///
/// Rules, in order: `Undefined` propagates; a zero base yields `0` for a
/// positive numeric exponent and `Undefined` for a zero or negative one;
/// a base of one absorbs any exponent; an integer exponent folds rational
/// bases exactly, multiplies through nested powers, and distributes over
/// products. Anything else is left unevaluated.
#[must_use]
pub fn simplify_power(base: AlgebraicExpression,
                      exponent: AlgebraicExpression)
                      -> AlgebraicExpression {
    use AlgebraicExpression as E;

    if base.is_undefined() {
        return base;
    }
    if exponent.is_undefined() {
        return exponent;
    }

    if base.is_zero() {
        return match exponent.numeric_value() {
            Some(v) if v > 0.0 => E::Int(0),
            Some(v) if v == 0.0 => E::undefined("zero raised to the zeroth power"),
            Some(_) => E::undefined("division by zero"),
            None => E::Power { base:     Box::new(base),
                               exponent: Box::new(exponent), },
        };
    }
    if base.is_one() {
        return E::Int(1);
    }

    if let E::Int(n) = exponent {
        return match n {
            0 => E::Int(1),
            1 => base,
            _ => match base {
                E::Int(_) | E::Fraction(_, _) => rational_power(&base, n),
                E::Real(r) => E::real(power_f64(r.0, n)),
                E::Power { base: inner_base, exponent: inner_exponent } => {
                    let merged = simplify_product(vec![*inner_exponent, E::Int(n)]);
                    simplify_power(*inner_base, merged)
                },
                E::Product(operands) => {
                    let distributed = operands.into_iter()
                                              .map(|op| simplify_power(op, E::Int(n)))
                                              .collect();
                    simplify_product(distributed)
                },
                other => E::Power { base:     Box::new(other),
                                    exponent: Box::new(E::Int(n)), },
            },
        };
    }

    E::Power { base:     Box::new(base),
               exponent: Box::new(exponent), }
}

/// Simplifies a product whose operands are already canonical.
///
/// Nested products are flattened, a zero factor annihilates the result,
/// numeric factors fold into a single leading coefficient, factors sharing
/// a base merge by summing exponents, unit factors drop, and the survivors
/// are merged back in total order. An empty result is `1`; a singleton
/// collapses to its operand.
#[must_use]
pub fn simplify_product(operands: Vec<AlgebraicExpression>) -> AlgebraicExpression {
    use AlgebraicExpression as E;

    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            E::Product(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    if flat.iter().any(AlgebraicExpression::is_zero) {
        return E::Int(0);
    }

    let mut coefficient = E::Int(1);
    let mut collected: Vec<(AlgebraicExpression, AlgebraicExpression)> = Vec::new();
    for operand in flat {
        if operand.is_numeric() {
            coefficient = fold_mul(&coefficient, &operand);
            continue;
        }
        let (base, exponent) = split_power(operand);
        match collected.iter_mut().find(|(b, _)| *b == base) {
            Some(entry) => entry.1 = simplify_sum(vec![entry.1.clone(), exponent]),
            None => collected.push((base, exponent)),
        }
    }

    let mut factors = Vec::with_capacity(collected.len());
    for (base, exponent) in collected {
        let rebuilt = simplify_power(base, exponent);
        if rebuilt.is_undefined() {
            return rebuilt;
        }
        if rebuilt.is_one() {
            continue;
        }
        if rebuilt.is_numeric() {
            coefficient = fold_mul(&coefficient, &rebuilt);
        } else {
            factors.push(rebuilt);
        }
    }

    if coefficient.is_zero() {
        return E::Int(0);
    }

    // A numeric coefficient on a lone sum distributes, so differences of
    // equal sums cancel: `(-1) * (x + 1)` becomes `-1*x + -1`.
    if factors.len() == 1 && !coefficient.is_one() {
        if let E::Sum(terms) = &factors[0] {
            let scaled = terms.iter()
                              .map(|term| simplify_product(vec![coefficient.clone(),
                                                                term.clone()]))
                              .collect();
            return simplify_sum(scaled);
        }
    }

    factors.sort_by(order::cmp);
    if !coefficient.is_one() {
        factors.insert(0, coefficient);
    }

    match factors.len() {
        0 => E::Int(1),
        1 => factors.swap_remove(0),
        _ => E::Product(factors),
    }
}

/// Simplifies a sum whose operands are already canonical.
///
/// Symmetric to the product rules: nested sums flatten, numeric terms fold
/// into one constant, like terms (same non-constant factor) merge by
/// summing coefficients, zero terms drop, and the survivors are merged
/// back in total order. An empty result is `0`; a singleton collapses.
#[must_use]
pub fn simplify_sum(operands: Vec<AlgebraicExpression>) -> AlgebraicExpression {
    use AlgebraicExpression as E;

    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        match operand {
            E::Sum(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }

    let mut constant = E::Int(0);
    let mut collected: Vec<(AlgebraicExpression, AlgebraicExpression)> = Vec::new();
    for operand in flat {
        if operand.is_numeric() {
            constant = fold_add(&constant, &operand);
            continue;
        }
        let (coefficient, term) = split_term(operand);
        match collected.iter_mut().find(|(t, _)| *t == term) {
            Some(entry) => entry.1 = fold_add(&entry.1, &coefficient),
            None => collected.push((term, coefficient)),
        }
    }

    let mut terms = Vec::with_capacity(collected.len());
    for (term, coefficient) in collected {
        if coefficient.is_zero() {
            continue;
        }
        let scaled = if coefficient.is_one() {
            term
        } else {
            simplify_product(vec![coefficient, term])
        };
        terms.push(scaled);
    }

    terms.sort_by(order::cmp);
    // The folded constant trails the sum (`2x + 1`), mirroring how a
    // product leads with its coefficient (`2x`).
    if !constant.is_zero() {
        terms.push(constant);
    }

    match terms.len() {
        0 => E::Int(0),
        1 => terms.swap_remove(0),
        _ => E::Sum(terms),
    }
}

/// Splits an operand into `(base, exponent)` for product collection.
fn split_power(operand: AlgebraicExpression)
               -> (AlgebraicExpression, AlgebraicExpression) {
    match operand {
        AlgebraicExpression::Power { base, exponent } => (*base, *exponent),
        other => (other, AlgebraicExpression::Int(1)),
    }
}

/// Splits an operand into `(coefficient, term)` for like-term collection.
///
/// A canonical product keeps its numeric coefficient first, so `2*x*y`
/// splits into `2` and `x*y`; anything else has coefficient one.
fn split_term(operand: AlgebraicExpression)
              -> (AlgebraicExpression, AlgebraicExpression) {
    use AlgebraicExpression as E;

    match operand {
        E::Product(mut operands) if operands.first().is_some_and(E::is_numeric) => {
            let coefficient = operands.remove(0);
            let term = if operands.len() == 1 {
                operands.swap_remove(0)
            } else {
                E::Product(operands)
            };
            (coefficient, term)
        },
        other => (E::Int(1), other),
    }
}

/// Multiplies two numeric atoms exactly where possible.
///
/// Rational pairs stay rational; a real operand, or rational overflow,
/// falls back to floating point.
fn fold_mul(a: &AlgebraicExpression, b: &AlgebraicExpression) -> AlgebraicExpression {
    match (rational_parts(a), rational_parts(b)) {
        (Some((an, ad)), Some((bn, bd))) => {
            match (an.checked_mul(bn), ad.checked_mul(bd)) {
                (Some(numerator), Some(denominator)) => {
                    simplify_rational(numerator, denominator)
                },
                _ => fold_real(a, b, |x, y| x * y),
            }
        },
        _ => fold_real(a, b, |x, y| x * y),
    }
}

/// Adds two numeric atoms exactly where possible.
fn fold_add(a: &AlgebraicExpression, b: &AlgebraicExpression) -> AlgebraicExpression {
    match (rational_parts(a), rational_parts(b)) {
        (Some((an, ad)), Some((bn, bd))) => {
            let numerator = an.checked_mul(bd)
                              .zip(bn.checked_mul(ad))
                              .and_then(|(left, right)| left.checked_add(right));
            match (numerator, ad.checked_mul(bd)) {
                (Some(numerator), Some(denominator)) => {
                    simplify_rational(numerator, denominator)
                },
                _ => fold_real(a, b, |x, y| x + y),
            }
        },
        _ => fold_real(a, b, |x, y| x + y),
    }
}

fn fold_real(a: &AlgebraicExpression,
             b: &AlgebraicExpression,
             op: impl Fn(f64, f64) -> f64)
             -> AlgebraicExpression {
    let (Some(va), Some(vb)) = (a.numeric_value(), b.numeric_value()) else {
        return AlgebraicExpression::undefined("non-numeric constant fold");
    };
    AlgebraicExpression::real(op(va, vb))
}

/// The `(numerator, denominator)` view of an exact numeric atom.
const fn rational_parts(e: &AlgebraicExpression) -> Option<(i64, i64)> {
    match e {
        AlgebraicExpression::Int(n) => Some((*n, 1)),
        AlgebraicExpression::Fraction(n, d) => Some((*n, *d)),
        _ => None,
    }
}

/// Raises a rational base to an integer power, exactly where possible.
fn rational_power(base: &AlgebraicExpression, n: i64) -> AlgebraicExpression {
    let Some((numerator, denominator)) = rational_parts(base) else {
        return AlgebraicExpression::undefined("non-rational base");
    };
    let magnitude = n.unsigned_abs();
    let exact = u32::try_from(magnitude).ok().and_then(|exp| {
                    numerator.checked_pow(exp)
                             .zip(denominator.checked_pow(exp))
                });
    match exact {
        Some((top, bottom)) if n >= 0 => simplify_rational(top, bottom),
        Some((top, bottom)) => simplify_rational(bottom, top),
        None => {
            let value = base.numeric_value().unwrap_or(f64::NAN);
            AlgebraicExpression::real(power_f64(value, n))
        },
    }
}

#[allow(clippy::cast_possible_truncation)]
fn power_f64(base: f64, n: i64) -> f64 {
    if let Ok(exp) = i32::try_from(n) {
        base.powi(exp)
    } else {
        #[allow(clippy::cast_precision_loss)]
        base.powf(n as f64)
    }
}
