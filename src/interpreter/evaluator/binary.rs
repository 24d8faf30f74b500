use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, RelationalOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        lexer::Pos,
        value::{core::Primitive, numeric},
    },
};

/// Applies a binary arithmetic operator, dispatching on operand structure.
///
/// Strings concatenate under `+`; vectors and matrices support
/// element-wise addition and subtraction, scalar scaling, dot products,
/// and matrix multiplication; scalar numeric pairs go through the numeric
/// tower with its fraction promotion.
///
/// # Errors
/// `ShapeMismatch` for incompatible vector/matrix operands, `TypeError`
/// for unsupported combinations, plus whatever scalar arithmetic raises.
pub fn binary(op: BinaryOperator,
              left: &Primitive,
              right: &Primitive,
              pos: Pos)
              -> EvalResult<Primitive> {
    use Primitive as P;

    match (left, right) {
        (P::Str(a), P::Str(b)) if op == BinaryOperator::Add => Ok(P::Str(format!("{a}{b}"))),

        (P::Vector(a), P::Vector(b)) => vector_vector(op, a, b, pos),
        (P::Matrix(a), P::Matrix(b)) => matrix_matrix(op, a, b, pos),
        (P::Matrix(m), P::Vector(v)) if op == BinaryOperator::Mul => matrix_vector(m, v, pos),

        (P::Vector(v), scalar)
            if scalar.is_numeric()
               && matches!(op, BinaryOperator::Mul | BinaryOperator::Div) =>
        {
            vector_scalar(op, v, scalar, pos)
        },
        (scalar, P::Vector(v)) if scalar.is_numeric() && op == BinaryOperator::Mul => {
            vector_scalar(op, v, scalar, pos)
        },
        (P::Matrix(m), scalar)
            if scalar.is_numeric()
               && matches!(op, BinaryOperator::Mul | BinaryOperator::Div) =>
        {
            matrix_scalar(op, m, scalar, pos)
        },
        (scalar, P::Matrix(m)) if scalar.is_numeric() && op == BinaryOperator::Mul => {
            matrix_scalar(op, m, scalar, pos)
        },

        _ if left.is_numeric() && right.is_numeric() => numeric::apply(op, left, right, pos),

        _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op:?}' to {} and {}",
                                                            left.type_name(),
                                                            right.type_name()),
                                           pos }),
    }
}

/// Applies a relational operator.
///
/// Equality works across every value kind (numeric pairs compare by value,
/// everything else structurally); orderings require two numbers or two
/// strings.
///
/// # Errors
/// `TypeError` when ordering operands that have no order.
pub fn relational(op: RelationalOperator,
                  left: &Primitive,
                  right: &Primitive,
                  pos: Pos)
                  -> EvalResult<Primitive> {
    use std::cmp::Ordering;

    let ordering = match op {
        RelationalOperator::Equal => return Ok(Primitive::Bool(numeric::equals(left, right))),
        RelationalOperator::NotEqual => {
            return Ok(Primitive::Bool(!numeric::equals(left, right)));
        },
        _ => {
            if let (Primitive::Str(a), Primitive::Str(b)) = (left, right) {
                a.cmp(b)
            } else {
                numeric::compare(left, right, pos)?
            }
        },
    };

    let result = match op {
        RelationalOperator::Less => ordering == Ordering::Less,
        RelationalOperator::LessEqual => ordering != Ordering::Greater,
        RelationalOperator::Greater => ordering == Ordering::Greater,
        RelationalOperator::GreaterEqual => ordering != Ordering::Less,
        RelationalOperator::Equal | RelationalOperator::NotEqual => {
            unreachable!("handled above")
        },
    };
    Ok(Primitive::Bool(result))
}

fn vector_vector(op: BinaryOperator,
                 a: &Rc<Vec<Primitive>>,
                 b: &Rc<Vec<Primitive>>,
                 pos: Pos)
                 -> EvalResult<Primitive> {
    if a.len() != b.len() {
        return Err(RuntimeError::ShapeMismatch { details: format!("vectors of length {} and {}",
                                                                  a.len(),
                                                                  b.len()),
                                                 pos });
    }

    match op {
        BinaryOperator::Add | BinaryOperator::Sub => {
            let mut elements = Vec::with_capacity(a.len());
            for (x, y) in a.iter().zip(b.iter()) {
                elements.push(numeric::apply(op, x, y, pos)?);
            }
            Ok(Primitive::Vector(Rc::new(elements)))
        },
        // `*` on two vectors is the dot product.
        BinaryOperator::Mul => dot(a, b, pos),
        _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op:?}' to two vectors"),
                                           pos }),
    }
}

fn dot(a: &[Primitive], b: &[Primitive], pos: Pos) -> EvalResult<Primitive> {
    let mut acc = Primitive::Int(0);
    for (x, y) in a.iter().zip(b.iter()) {
        let product = numeric::apply(BinaryOperator::Mul, x, y, pos)?;
        acc = numeric::apply(BinaryOperator::Add, &acc, &product, pos)?;
    }
    Ok(acc)
}

fn vector_scalar(op: BinaryOperator,
                 v: &[Primitive],
                 scalar: &Primitive,
                 pos: Pos)
                 -> EvalResult<Primitive> {
    let mut elements = Vec::with_capacity(v.len());
    for value in v {
        elements.push(numeric::apply(op, value, scalar, pos)?);
    }
    Ok(Primitive::Vector(Rc::new(elements)))
}

fn matrix_scalar(op: BinaryOperator,
                 m: &[Vec<Primitive>],
                 scalar: &Primitive,
                 pos: Pos)
                 -> EvalResult<Primitive> {
    let mut rows = Vec::with_capacity(m.len());
    for row in m {
        let mut cells = Vec::with_capacity(row.len());
        for value in row {
            cells.push(numeric::apply(op, value, scalar, pos)?);
        }
        rows.push(cells);
    }
    Ok(Primitive::Matrix(Rc::new(rows)))
}

fn matrix_matrix(op: BinaryOperator,
                 a: &Rc<Vec<Vec<Primitive>>>,
                 b: &Rc<Vec<Vec<Primitive>>>,
                 pos: Pos)
                 -> EvalResult<Primitive> {
    match op {
        BinaryOperator::Add | BinaryOperator::Sub => {
            if shape(a) != shape(b) {
                return Err(shape_error(a, b, pos));
            }
            let mut rows = Vec::with_capacity(a.len());
            for (row_a, row_b) in a.iter().zip(b.iter()) {
                let mut cells = Vec::with_capacity(row_a.len());
                for (x, y) in row_a.iter().zip(row_b.iter()) {
                    cells.push(numeric::apply(op, x, y, pos)?);
                }
                rows.push(cells);
            }
            Ok(Primitive::Matrix(Rc::new(rows)))
        },
        BinaryOperator::Mul => {
            let (rows_a, cols_a) = shape(a);
            let (rows_b, cols_b) = shape(b);
            if cols_a != rows_b {
                return Err(shape_error(a, b, pos));
            }
            let mut rows = Vec::with_capacity(rows_a);
            for i in 0..rows_a {
                let mut cells = Vec::with_capacity(cols_b);
                for j in 0..cols_b {
                    let mut acc = Primitive::Int(0);
                    for k in 0..cols_a {
                        let product =
                            numeric::apply(BinaryOperator::Mul, &a[i][k], &b[k][j], pos)?;
                        acc = numeric::apply(BinaryOperator::Add, &acc, &product, pos)?;
                    }
                    cells.push(acc);
                }
                rows.push(cells);
            }
            Ok(Primitive::Matrix(Rc::new(rows)))
        },
        _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op:?}' to two matrices"),
                                           pos }),
    }
}

fn matrix_vector(m: &[Vec<Primitive>], v: &[Primitive], pos: Pos) -> EvalResult<Primitive> {
    if m.first().is_none_or(|row| row.len() != v.len()) {
        return Err(RuntimeError::ShapeMismatch { details: format!("matrix with {} columns against vector of length {}",
                                                                  m.first().map_or(0, Vec::len),
                                                                  v.len()),
                                                 pos });
    }
    let mut elements = Vec::with_capacity(m.len());
    for row in m {
        elements.push(dot(row, v, pos)?);
    }
    Ok(Primitive::Vector(Rc::new(elements)))
}

fn shape(m: &[Vec<Primitive>]) -> (usize, usize) {
    (m.len(), m.first().map_or(0, Vec::len))
}

fn shape_error(a: &[Vec<Primitive>], b: &[Vec<Primitive>], pos: Pos) -> RuntimeError {
    let (ra, ca) = shape(a);
    let (rb, cb) = shape(b);
    RuntimeError::ShapeMismatch { details: format!("matrices of shape {ra}x{ca} and {rb}x{cb}"),
                                  pos }
}
