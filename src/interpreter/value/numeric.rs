use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Pow, Signed, ToPrimitive, Zero};

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, lexer::Pos, value::core::Primitive},
};

/// Two scalar operands promoted to a common numeric representation.
///
/// A mixed (integer, fraction) pair becomes (fraction, fraction); a float
/// operand is contagious and demotes the pair to floating point; anything
/// paired with a big form becomes big.
enum NumericPair {
    Int(i64, i64),
    Float(f64, f64),
    Fraction(Rational64, Rational64),
    Big(BigInt, BigInt),
    BigFraction(BigRational, BigRational),
}

/// Applies an arithmetic operator to two scalar numeric values.
///
/// # Errors
/// `TypeError` for non-numeric operands, `DivisionByZero`, `Overflow`, and
/// `FractionalExponent` for `^` on a fraction base with a non-integer
/// exponent.
pub fn apply(op: BinaryOperator,
             left: &Primitive,
             right: &Primitive,
             pos: Pos)
             -> EvalResult<Primitive> {
    let Some(pair) = promote(left, right) else {
        return Err(RuntimeError::TypeError { details: format!("cannot apply arithmetic to {} and {}",
                                                              left.type_name(),
                                                              right.type_name()),
                                             pos });
    };

    match pair {
        NumericPair::Int(x, y) => apply_int(op, x, y, pos),
        NumericPair::Float(x, y) => apply_float(op, x, y, pos),
        NumericPair::Fraction(x, y) => apply_fraction(op, &x, &y, pos),
        NumericPair::Big(x, y) => apply_big(op, &x, &y, pos),
        NumericPair::BigFraction(x, y) => apply_big_fraction(op, &x, &y, pos),
    }
}

/// Compares two scalar numeric values.
///
/// # Errors
/// `TypeError` for non-numeric operands or a NaN comparison.
pub fn compare(left: &Primitive, right: &Primitive, pos: Pos) -> EvalResult<Ordering> {
    let Some(pair) = promote(left, right) else {
        return Err(RuntimeError::TypeError { details: format!("cannot compare {} and {}",
                                                              left.type_name(),
                                                              right.type_name()),
                                             pos });
    };

    match pair {
        NumericPair::Int(x, y) => Ok(x.cmp(&y)),
        NumericPair::Float(x, y) => {
            x.partial_cmp(&y)
             .ok_or(RuntimeError::TypeError { details: "cannot compare NaN".to_string(),
                                              pos })
        },
        NumericPair::Fraction(x, y) => Ok(x.cmp(&y)),
        NumericPair::Big(x, y) => Ok(x.cmp(&y)),
        NumericPair::BigFraction(x, y) => Ok(x.cmp(&y)),
    }
}

/// Equality across the numeric tower, falling back to structural equality
/// for non-numeric values. `Int(2)` equals `Float(2.0)` and `Fraction(4|2)`.
#[must_use]
pub fn equals(left: &Primitive, right: &Primitive) -> bool {
    match promote(left, right) {
        Some(NumericPair::Int(x, y)) => x == y,
        Some(NumericPair::Float(x, y)) => x == y,
        Some(NumericPair::Fraction(x, y)) => x == y,
        Some(NumericPair::Big(x, y)) => x == y,
        Some(NumericPair::BigFraction(x, y)) => x == y,
        None => left == right,
    }
}

/// Numeric negation, preserving the operand's representation.
///
/// # Errors
/// `TypeError` for non-numeric operands, `Overflow` for `i64::MIN`.
pub fn negate(value: &Primitive, pos: Pos) -> EvalResult<Primitive> {
    match value {
        Primitive::Int(v) => v.checked_neg()
                              .map(Primitive::Int)
                              .ok_or(RuntimeError::Overflow { pos }),
        Primitive::Float(v) => Ok(Primitive::Float(-v)),
        Primitive::Fraction(v) => Ok(Primitive::Fraction(-v)),
        Primitive::BigInt(v) => Ok(Primitive::BigInt(-v)),
        Primitive::BigFraction(v) => Ok(Primitive::BigFraction(-v)),
        other => Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                other.type_name()),
                                               pos }),
    }
}

/// The floating-point view of a scalar numeric value.
#[must_use]
pub fn to_f64(value: &Primitive) -> Option<f64> {
    #[allow(clippy::cast_precision_loss)]
    match value {
        Primitive::Float(v) => Some(*v),
        Primitive::Int(v) => Some(*v as f64),
        Primitive::Fraction(v) => v.to_f64(),
        Primitive::BigInt(v) => v.to_f64(),
        Primitive::BigFraction(v) => v.to_f64(),
        _ => None,
    }
}

fn promote(left: &Primitive, right: &Primitive) -> Option<NumericPair> {
    use Primitive as P;

    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }

    // Floats are contagious.
    if matches!(left, P::Float(_)) || matches!(right, P::Float(_)) {
        return Some(NumericPair::Float(to_f64(left)?, to_f64(right)?));
    }

    Some(match (left, right) {
        (P::Int(x), P::Int(y)) => NumericPair::Int(*x, *y),

        (P::Int(x), P::Fraction(y)) => {
            NumericPair::Fraction(Rational64::from_integer(*x), *y)
        },
        (P::Fraction(x), P::Int(y)) => {
            NumericPair::Fraction(*x, Rational64::from_integer(*y))
        },
        (P::Fraction(x), P::Fraction(y)) => NumericPair::Fraction(*x, *y),

        (P::BigInt(x), P::BigInt(y)) => NumericPair::Big(x.clone(), y.clone()),
        (P::BigInt(x), P::Int(y)) => NumericPair::Big(x.clone(), BigInt::from(*y)),
        (P::Int(x), P::BigInt(y)) => NumericPair::Big(BigInt::from(*x), y.clone()),

        (x, y) => NumericPair::BigFraction(to_big_rational(x)?, to_big_rational(y)?),
    })
}

fn to_big_rational(value: &Primitive) -> Option<BigRational> {
    match value {
        Primitive::Int(v) => Some(BigRational::from_integer(BigInt::from(*v))),
        Primitive::BigInt(v) => Some(BigRational::from_integer(v.clone())),
        Primitive::Fraction(v) => {
            Some(BigRational::new(BigInt::from(*v.numer()), BigInt::from(*v.denom())))
        },
        Primitive::BigFraction(v) => Some(v.clone()),
        _ => None,
    }
}

fn apply_int(op: BinaryOperator, x: i64, y: i64, pos: Pos) -> EvalResult<Primitive> {
    match op {
        BinaryOperator::Add => x.checked_add(y)
                                .map(Primitive::Int)
                                .ok_or(RuntimeError::Overflow { pos }),
        BinaryOperator::Sub => x.checked_sub(y)
                                .map(Primitive::Int)
                                .ok_or(RuntimeError::Overflow { pos }),
        BinaryOperator::Mul => x.checked_mul(y)
                                .map(Primitive::Int)
                                .ok_or(RuntimeError::Overflow { pos }),
        // Inexact integer division yields an exact fraction.
        BinaryOperator::Div => {
            if y == 0 {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            if x % y == 0 {
                Ok(Primitive::Int(x / y))
            } else {
                Ok(shrink_fraction(Rational64::new(x, y)))
            }
        },
        BinaryOperator::Mod => {
            if y == 0 {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(Primitive::Int(x % y))
        },
        BinaryOperator::Pow => int_pow(x, y, pos),
    }
}

fn int_pow(x: i64, y: i64, pos: Pos) -> EvalResult<Primitive> {
    if y >= 0 {
        let exponent = u32::try_from(y).map_err(|_| RuntimeError::Overflow { pos })?;
        return x.checked_pow(exponent)
                .map(Primitive::Int)
                .ok_or(RuntimeError::Overflow { pos });
    }
    if x == 0 {
        return Err(RuntimeError::DivisionByZero { pos });
    }
    let exponent =
        u32::try_from(y.unsigned_abs()).map_err(|_| RuntimeError::Overflow { pos })?;
    let denominator = x.checked_pow(exponent).ok_or(RuntimeError::Overflow { pos })?;
    Ok(shrink_fraction(Rational64::new(1, denominator)))
}

#[allow(clippy::float_arithmetic)]
fn apply_float(op: BinaryOperator, x: f64, y: f64, pos: Pos) -> EvalResult<Primitive> {
    match op {
        BinaryOperator::Add => Ok(Primitive::Float(x + y)),
        BinaryOperator::Sub => Ok(Primitive::Float(x - y)),
        BinaryOperator::Mul => Ok(Primitive::Float(x * y)),
        BinaryOperator::Div => {
            if y == 0.0 {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(Primitive::Float(x / y))
        },
        BinaryOperator::Mod => {
            if y == 0.0 {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(Primitive::Float(x % y))
        },
        BinaryOperator::Pow => Ok(Primitive::Float(x.powf(y))),
    }
}

fn apply_fraction(op: BinaryOperator,
                  x: &Rational64,
                  y: &Rational64,
                  pos: Pos)
                  -> EvalResult<Primitive> {
    let result = match op {
        BinaryOperator::Add => x.checked_add(y),
        BinaryOperator::Sub => x.checked_sub(y),
        BinaryOperator::Mul => x.checked_mul(y),
        BinaryOperator::Div => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            x.checked_div(y)
        },
        BinaryOperator::Mod => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            return Ok(fraction_rem(x, y));
        },
        BinaryOperator::Pow => return fraction_pow(x, y, pos),
    };
    result.map(shrink_fraction)
          .ok_or(RuntimeError::Overflow { pos })
}

/// Remainder over fractions, computed in big arithmetic to dodge overflow.
fn fraction_rem(x: &Rational64, y: &Rational64) -> Primitive {
    let big_x = BigRational::new(BigInt::from(*x.numer()), BigInt::from(*x.denom()));
    let big_y = BigRational::new(BigInt::from(*y.numer()), BigInt::from(*y.denom()));
    let quotient = (&big_x / &big_y).trunc();
    shrink_big_rational(big_x - quotient * big_y)
}

/// `^` on a fraction base requires an integer exponent.
fn fraction_pow(x: &Rational64, y: &Rational64, pos: Pos) -> EvalResult<Primitive> {
    if !y.is_integer() {
        return Err(RuntimeError::FractionalExponent { pos });
    }
    let exponent =
        i32::try_from(y.to_integer()).map_err(|_| RuntimeError::Overflow { pos })?;
    if x.is_zero() && exponent < 0 {
        return Err(RuntimeError::DivisionByZero { pos });
    }
    // Exponentiation in big arithmetic, shrunk back down when it fits.
    let big = BigRational::new(BigInt::from(*x.numer()), BigInt::from(*x.denom()));
    Ok(shrink_big_rational(big.pow(exponent)))
}

fn apply_big(op: BinaryOperator, x: &BigInt, y: &BigInt, pos: Pos) -> EvalResult<Primitive> {
    match op {
        BinaryOperator::Add => Ok(Primitive::BigInt(x + y)),
        BinaryOperator::Sub => Ok(Primitive::BigInt(x - y)),
        BinaryOperator::Mul => Ok(Primitive::BigInt(x * y)),
        BinaryOperator::Div => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            if (x % y).is_zero() {
                Ok(Primitive::BigInt(x / y))
            } else {
                Ok(Primitive::BigFraction(BigRational::new(x.clone(), y.clone())))
            }
        },
        BinaryOperator::Mod => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(Primitive::BigInt(x % y))
        },
        BinaryOperator::Pow => {
            let Some(exponent) = y.to_i64() else {
                return Err(RuntimeError::Overflow { pos });
            };
            if exponent >= 0 {
                let exponent =
                    u32::try_from(exponent).map_err(|_| RuntimeError::Overflow { pos })?;
                Ok(Primitive::BigInt(x.pow(exponent)))
            } else {
                if x.is_zero() {
                    return Err(RuntimeError::DivisionByZero { pos });
                }
                let exponent = u32::try_from(exponent.unsigned_abs())
                    .map_err(|_| RuntimeError::Overflow { pos })?;
                Ok(shrink_big_rational(BigRational::new(BigInt::from(1), x.pow(exponent))))
            }
        },
    }
}

fn apply_big_fraction(op: BinaryOperator,
                      x: &BigRational,
                      y: &BigRational,
                      pos: Pos)
                      -> EvalResult<Primitive> {
    match op {
        BinaryOperator::Add => Ok(shrink_big_rational(x + y)),
        BinaryOperator::Sub => Ok(shrink_big_rational(x - y)),
        BinaryOperator::Mul => Ok(shrink_big_rational(x * y)),
        BinaryOperator::Div => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(shrink_big_rational(x / y))
        },
        BinaryOperator::Mod => {
            if y.is_zero() {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            let quotient = (x / y).trunc();
            Ok(shrink_big_rational(x - quotient * y))
        },
        BinaryOperator::Pow => {
            if !y.is_integer() {
                return Err(RuntimeError::FractionalExponent { pos });
            }
            let Some(exponent) = y.to_integer().to_i64() else {
                return Err(RuntimeError::Overflow { pos });
            };
            let exponent =
                i32::try_from(exponent).map_err(|_| RuntimeError::Overflow { pos })?;
            if x.is_zero() && exponent < 0 {
                return Err(RuntimeError::DivisionByZero { pos });
            }
            Ok(shrink_big_rational(x.pow(exponent)))
        },
    }
}

/// Collapses a whole-number fraction to an integer.
pub(crate) fn shrink_fraction(value: Rational64) -> Primitive {
    if value.is_integer() {
        Primitive::Int(value.to_integer())
    } else {
        Primitive::Fraction(value)
    }
}

/// Collapses a big rational to the smallest representation that holds it.
pub(crate) fn shrink_big_rational(value: BigRational) -> Primitive {
    if value.is_integer() {
        let whole = value.to_integer();
        return whole.to_i64().map_or(Primitive::BigInt(whole), Primitive::Int);
    }
    match (value.numer().to_i64(), value.denom().to_i64()) {
        (Some(numerator), Some(denominator)) => {
            Primitive::Fraction(Rational64::new(numerator, denominator))
        },
        _ => Primitive::BigFraction(value),
    }
}

/// Absolute value, preserving the operand's representation.
///
/// # Errors
/// `TypeError` for non-numeric operands, `Overflow` for `i64::MIN`.
pub fn abs(value: &Primitive, pos: Pos) -> EvalResult<Primitive> {
    match value {
        Primitive::Int(v) => v.checked_abs()
                              .map(Primitive::Int)
                              .ok_or(RuntimeError::Overflow { pos }),
        Primitive::Float(v) => Ok(Primitive::Float(v.abs())),
        Primitive::Fraction(v) => Ok(Primitive::Fraction(v.abs())),
        Primitive::BigInt(v) => Ok(Primitive::BigInt(v.abs())),
        Primitive::BigFraction(v) => Ok(Primitive::BigFraction(v.abs())),
        other => Err(RuntimeError::TypeError { details: format!("cannot take the absolute value of {}",
                                                                other.type_name()),
                                               pos }),
    }
}
