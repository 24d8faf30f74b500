use std::rc::Rc;

use crate::{
    algebra::{expr::AlgebraicExpression, simplify::simplify},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        lexer::Pos,
        value::{core::Primitive, numeric},
    },
    util::num::gcd,
};

/// Dispatches a call to a native function from the fixed table.
///
/// Unlike user functions, natives check their argument counts: the
/// permissive bind-missing-as-nil rule applies only to user-defined
/// parameter lists.
///
/// # Errors
/// `InvalidNativeArgument` for wrong arities, non-numeric arguments, or
/// domain violations (negative square roots, non-positive logarithms).
pub fn call_native(name: &str, args: &[Primitive], pos: Pos) -> EvalResult<Primitive> {
    match name {
        "sin" => unary_float(name, args, pos, f64::sin),
        "cos" => unary_float(name, args, pos, f64::cos),
        "tan" => unary_float(name, args, pos, f64::tan),
        "exp" => unary_float(name, args, pos, f64::exp),

        "ln" => logarithm(name, args, pos, f64::ln),
        "lg" => logarithm(name, args, pos, f64::log10),
        "log" => {
            expect_arity(name, args, 2, pos)?;
            let base = as_float(name, &args[0], pos)?;
            let value = as_float(name, &args[1], pos)?;
            if base <= 0.0 || base == 1.0 || value <= 0.0 {
                return Err(invalid(name, "logarithm domain violation", pos));
            }
            Ok(Primitive::Float(value.log(base)))
        },

        "sqrt" => {
            expect_arity(name, args, 1, pos)?;
            let value = as_float(name, &args[0], pos)?;
            if value < 0.0 {
                return Err(invalid(name, "argument must be non-negative", pos));
            }
            Ok(Primitive::Float(value.sqrt()))
        },

        "abs" => {
            expect_arity(name, args, 1, pos)?;
            numeric::abs(&args[0], pos)
        },

        "floor" => rounding(name, args, pos, true),
        "ceil" => rounding(name, args, pos, false),

        "gcd" => {
            let (x, y) = two_integers(name, args, pos)?;
            integer_result(gcd(x.unsigned_abs(), y.unsigned_abs()), pos)
        },
        "lcm" => {
            let (x, y) = two_integers(name, args, pos)?;
            if x == 0 || y == 0 {
                return Ok(Primitive::Int(0));
            }
            let divisor = gcd(x.unsigned_abs(), y.unsigned_abs());
            let scaled = (x.unsigned_abs() / divisor).checked_mul(y.unsigned_abs())
                                                     .ok_or(RuntimeError::Overflow { pos })?;
            integer_result(scaled, pos)
        },

        "max" => extremum(name, args, pos, std::cmp::Ordering::Greater),
        "min" => extremum(name, args, pos, std::cmp::Ordering::Less),

        "simplify" => {
            expect_arity(name, args, 1, pos)?;
            let expr = as_algebraic(name, &args[0], pos)?;
            Ok(Primitive::Algebraic(Rc::new(simplify(expr))))
        },

        // `deriv` is wired through the grammar and this dispatch but is an
        // explicit stub: it yields its (already canonical) input.
        "deriv" => {
            if args.is_empty() || args.len() > 2 {
                return Err(invalid(name, "expected 1 or 2 arguments", pos));
            }
            let expr = as_algebraic(name, &args[0], pos)?;
            Ok(Primitive::Algebraic(Rc::new(expr.clone())))
        },

        "subex" => {
            expect_arity(name, args, 3, pos)?;
            let expr = as_algebraic(name, &args[0], pos)?;
            let target = as_algebraic(name, &args[1], pos)?;
            let replacement = as_algebraic(name, &args[2], pos)?;
            let substituted = expr.substitute(target, replacement);
            Ok(Primitive::Algebraic(Rc::new(simplify(&substituted))))
        },

        other => Err(invalid(other, "unknown native function", pos)),
    }
}

fn unary_float(name: &str,
               args: &[Primitive],
               pos: Pos,
               op: impl Fn(f64) -> f64)
               -> EvalResult<Primitive> {
    expect_arity(name, args, 1, pos)?;
    Ok(Primitive::Float(op(as_float(name, &args[0], pos)?)))
}

fn logarithm(name: &str,
             args: &[Primitive],
             pos: Pos,
             op: impl Fn(f64) -> f64)
             -> EvalResult<Primitive> {
    expect_arity(name, args, 1, pos)?;
    let value = as_float(name, &args[0], pos)?;
    if value <= 0.0 {
        return Err(invalid(name, "argument must be positive", pos));
    }
    Ok(Primitive::Float(op(value)))
}

/// `floor`/`ceil`, preserving exact representations.
fn rounding(name: &str, args: &[Primitive], pos: Pos, down: bool) -> EvalResult<Primitive> {
    expect_arity(name, args, 1, pos)?;
    match &args[0] {
        Primitive::Int(v) => Ok(Primitive::Int(*v)),
        Primitive::BigInt(v) => Ok(Primitive::BigInt(v.clone())),
        Primitive::Float(v) => Ok(Primitive::Float(if down { v.floor() } else { v.ceil() })),
        Primitive::Fraction(v) => {
            let rounded = if down { v.floor() } else { v.ceil() };
            Ok(Primitive::Int(rounded.to_integer()))
        },
        Primitive::BigFraction(v) => {
            let rounded = if down { v.floor() } else { v.ceil() };
            Ok(Primitive::BigInt(rounded.to_integer()))
        },
        other => Err(invalid(name, &format!("expected a number, got {}", other.type_name()), pos)),
    }
}

/// `max`/`min` over one or more numeric arguments.
fn extremum(name: &str,
            args: &[Primitive],
            pos: Pos,
            keep: std::cmp::Ordering)
            -> EvalResult<Primitive> {
    if args.is_empty() {
        return Err(invalid(name, "expected at least 1 argument", pos));
    }
    let mut best = args[0].clone();
    for candidate in &args[1..] {
        if numeric::compare(candidate, &best, pos)? == keep {
            best = candidate.clone();
        }
    }
    Ok(best)
}

fn expect_arity(name: &str, args: &[Primitive], count: usize, pos: Pos) -> EvalResult<()> {
    if args.len() == count {
        return Ok(());
    }
    Err(invalid(name,
                &format!("expected {count} argument{}, got {}",
                         if count == 1 { "" } else { "s" },
                         args.len()),
                pos))
}

fn as_float(name: &str, value: &Primitive, pos: Pos) -> EvalResult<f64> {
    numeric::to_f64(value).ok_or_else(|| {
                              invalid(name,
                                      &format!("expected a number, got {}", value.type_name()),
                                      pos)
                          })
}

fn as_algebraic<'a>(name: &str,
                    value: &'a Primitive,
                    pos: Pos)
                    -> EvalResult<&'a AlgebraicExpression> {
    match value {
        Primitive::Algebraic(expr) => Ok(expr),
        other => Err(invalid(name,
                             &format!("expected an algebraic expression, got {}",
                                      other.type_name()),
                             pos)),
    }
}

fn two_integers(name: &str, args: &[Primitive], pos: Pos) -> EvalResult<(i64, i64)> {
    expect_arity(name, args, 2, pos)?;
    match (&args[0], &args[1]) {
        (Primitive::Int(x), Primitive::Int(y)) => Ok((*x, *y)),
        _ => Err(invalid(name, "expected two integers", pos)),
    }
}

fn integer_result(value: u64, pos: Pos) -> EvalResult<Primitive> {
    i64::try_from(value).map(Primitive::Int)
                        .map_err(|_| RuntimeError::Overflow { pos })
}

fn invalid(name: &str, details: &str, pos: Pos) -> RuntimeError {
    RuntimeError::InvalidNativeArgument { name: name.to_string(),
                                          details: details.to_string(),
                                          pos }
}
