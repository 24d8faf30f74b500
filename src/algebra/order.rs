use std::cmp::Ordering;

use crate::algebra::expr::AlgebraicExpression;

/// The strict total order over algebraic expressions.
///
/// Returns `true` when `a` strictly precedes `b` in canonical order. For
/// any two canonical expressions exactly one of `order(a, b)`,
/// `order(b, a)`, or `a == b` holds; sums and products keep their operand
/// lists sorted by this relation so like terms sit next to each other.
///
/// Dispatch is by paired kinds:
/// - numeric atoms compare by value (ties broken by representation, so
///   `Int(1)` precedes `Real(1.0)`);
/// - symbols and named constants compare lexicographically;
/// - sums and products compare by their last differing operand, scanning
///   from the end, tie-broken by operand count;
/// - powers compare base first, then exponent; factorials by argument;
///   named functions by name, then arguments;
/// - any numeric atom precedes any non-atom;
/// - a product compares against a non-product by treating the other side
///   as a one-operand product; a power promotes the other side to
///   `power(x, 1)`; sums and factorials promote analogously, with the
///   promoted (simpler) side preceding on a full tie.
#[must_use]
pub fn order(a: &AlgebraicExpression, b: &AlgebraicExpression) -> bool {
    use AlgebraicExpression as E;

    // Numeric atoms.
    if a.is_numeric() || b.is_numeric() {
        return match (a.numeric_value(), b.numeric_value()) {
            (Some(va), Some(vb)) => match va.partial_cmp(&vb) {
                Some(Ordering::Less) => true,
                Some(Ordering::Greater) => false,
                _ => numeric_rank(a) < numeric_rank(b),
            },
            // A numeric atom precedes any non-atom.
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => unreachable!("is_numeric implies a numeric value"),
        };
    }

    match (a, b) {
        // Symbols and named constants, lexicographically.
        (E::Sym(x) | E::Constant { name: x, .. }, E::Sym(y) | E::Constant { name: y, .. }) => {
            x < y
        },

        // Two sums or two products: last differing operand from the end.
        (E::Sum(u), E::Sum(v)) | (E::Product(u), E::Product(v)) => order_lists(u, v),

        // Two powers: base, then exponent.
        (E::Power { base: ab, exponent: ax }, E::Power { base: bb, exponent: bx }) => {
            if ab == bb {
                order(ax, bx)
            } else {
                order(ab, bb)
            }
        },

        // Two factorials: by argument.
        (E::Factorial(u), E::Factorial(v)) => order(u, v),

        // Two named functions: name, then arguments first-to-last.
        (E::Func { name: an, args: au }, E::Func { name: bn, args: bu }) => {
            if an == bn {
                for (x, y) in au.iter().zip(bu.iter()) {
                    if x != y {
                        return order(x, y);
                    }
                }
                au.len() < bu.len()
            } else {
                an < bn
            }
        },

        // A product against anything else: promote to a one-operand product.
        (E::Product(u), other) => order_lists(u, std::slice::from_ref(other)),
        (other, E::Product(v)) => order_lists(std::slice::from_ref(other), v),

        // A power against a sum, factorial, function, or symbol: promote
        // the other side to power(x, 1); the simpler side precedes on a
        // full tie.
        (E::Power { base, exponent }, other) => {
            if **base == *other {
                order(exponent, &E::Int(1))
            } else {
                order(base, other)
            }
        },
        (other, E::Power { base, exponent }) => {
            if *other == **base {
                **exponent == E::Int(1) || order(&E::Int(1), exponent)
            } else {
                order(other, base)
            }
        },

        // A sum against a factorial, function, or symbol.
        (E::Sum(u), other) => order_lists(u, std::slice::from_ref(other)),
        (other, E::Sum(v)) => order_lists(std::slice::from_ref(other), v),

        // A factorial against a function or symbol.
        (E::Factorial(u), other) => {
            if **u == *other {
                false
            } else {
                order(u, other)
            }
        },
        (other, E::Factorial(v)) => {
            if *other == **v {
                true
            } else {
                order(other, v)
            }
        },

        // A function against a symbol: by name; the symbol precedes on ties.
        (E::Func { name, .. }, E::Sym(y) | E::Constant { name: y, .. }) => name < y,
        (E::Sym(x) | E::Constant { name: x, .. }, E::Func { name, .. }) => x <= name,

        // Differences and quotients only exist before simplification; give
        // them a stable position so sorting never loops.
        (E::Difference(u), E::Difference(v)) => order_lists(u, v),
        (E::Quotient(an, ad), E::Quotient(bn, bd)) => {
            if an == bn {
                order(ad, bd)
            } else {
                order(an, bn)
            }
        },
        (E::Quotient(..), E::Difference(_)) => false,
        (E::Difference(_), E::Quotient(..)) => true,
        (E::Difference(_) | E::Quotient(..), _) => false,
        (_, E::Difference(_) | E::Quotient(..)) => true,

        // Numeric atoms were consumed by the value comparison above.
        _ => unreachable!("numeric atoms are ordered by value"),
    }
}

/// `Ordering`-flavored wrapper over [`order`], for sorting operand lists.
#[must_use]
pub fn cmp(a: &AlgebraicExpression, b: &AlgebraicExpression) -> Ordering {
    if a == b {
        Ordering::Equal
    } else if order(a, b) {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

/// Compares two operand lists by their last differing operand, scanning
/// from the end; a shorter list that matches the longer one's tail
/// precedes it.
fn order_lists(u: &[AlgebraicExpression], v: &[AlgebraicExpression]) -> bool {
    for (x, y) in u.iter().rev().zip(v.iter().rev()) {
        if x != y {
            return order(x, y);
        }
    }
    u.len() < v.len()
}

/// Tie-break rank between numeric representations of the same value.
const fn numeric_rank(e: &AlgebraicExpression) -> u8 {
    match e {
        AlgebraicExpression::Int(_) => 0,
        AlgebraicExpression::Fraction(_, _) => 1,
        _ => 2,
    }
}
