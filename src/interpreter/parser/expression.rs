use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::SyntaxError,
    interpreter::{
        lexer::{is_native, numeric_constant, FractionLit, Pos, Token},
        parser::core::{bp, infix_binding_power, InfixOp, ParseResult, ParserState},
    },
};

/// Parses a full expression.
///
/// This is the entry point for expression parsing: a Pratt loop starting at
/// the lowest binding power, assignment.
///
/// # Errors
/// The first `SyntaxError` encountered.
pub fn parse_expression(state: &mut ParserState) -> ParseResult<Expr> {
    parse_bp(state, bp::ASSIGNMENT)
}

/// The Pratt loop: parses a prefix operand, then keeps extending it with
/// postfix forms, infix operators, and implicit multiplication while the
/// next token binds at least as tightly as `min_bp`.
pub(crate) fn parse_bp(state: &mut ParserState, min_bp: u8) -> ParseResult<Expr> {
    let mut left = parse_prefix(state)?;

    loop {
        let Some((token, pos)) = state.peek() else {
            break;
        };
        let pos = *pos;

        match token {
            Token::LParen if bp::POSTFIX >= min_bp && is_callable(&left) => {
                state.advance();
                let arguments = parse_arguments(state)?;
                left = Expr::Call { callee: Box::new(left),
                                    arguments,
                                    pos };
                continue;
            },

            Token::LBracket if bp::POSTFIX >= min_bp => {
                state.advance();
                let index = parse_expression(state)?;
                state.expect(&Token::RBracket, "']' after index")?;
                left = Expr::Index { target: Box::new(left),
                                     index: Box::new(index),
                                     pos };
                continue;
            },

            Token::Dot if bp::POSTFIX >= min_bp => {
                state.advance();
                let (name, name_pos) = state.expect_identifier("property name after '.'")?;
                left = Expr::Get { object: Box::new(left),
                                   name,
                                   pos: name_pos };
                continue;
            },

            Token::Equal if min_bp <= bp::ASSIGNMENT => {
                state.advance();
                let value = parse_bp(state, bp::ASSIGNMENT)?;
                left = match left {
                    Expr::Variable { name, .. } => Expr::Assign { name,
                                                                  id: state.fresh_id(),
                                                                  value: Box::new(value),
                                                                  pos },
                    Expr::Get { object, name, pos: get_pos } => Expr::Set { object,
                                                                            name,
                                                                            value:
                                                                                Box::new(value),
                                                                            pos: get_pos },
                    _ => return Err(SyntaxError::InvalidAssignmentTarget { pos }),
                };
                continue;
            },

            _ => {},
        }

        if let Some((left_bp, right_bp, op)) = infix_binding_power(token) {
            if left_bp < min_bp {
                break;
            }
            state.advance();
            let right = parse_bp(state, right_bp)?;
            left = match op {
                InfixOp::Binary(op) => Expr::Binary { left: Box::new(left),
                                                      op,
                                                      right: Box::new(right),
                                                      pos },
                InfixOp::Relational(op) => Expr::Relational { left: Box::new(left),
                                                              op,
                                                              right: Box::new(right),
                                                              pos },
                InfixOp::Logical(op) => Expr::Logical { left: Box::new(left),
                                                        op,
                                                        right: Box::new(right),
                                                        pos },
            };
            continue;
        }

        if bp::IMUL >= min_bp && implicit_factor_left(&left) && implicit_factor_start(token) {
            let right = parse_bp(state, bp::IMUL + 1)?;
            left = Expr::Binary { left: Box::new(left),
                                  op: BinaryOperator::Mul,
                                  right: Box::new(right),
                                  pos };
            continue;
        }

        break;
    }

    Ok(left)
}

/// Whether an expression may be the callee of a `(` postfix.
///
/// Literals and grouped expressions are excluded so that `3(x+1)` and
/// `(x+1)(y+1)` read as multiplication, not calls.
const fn is_callable(expr: &Expr) -> bool {
    matches!(expr,
             Expr::Variable { .. } | Expr::Get { .. } | Expr::Call { .. })
}

/// Whether an expression can be the left side of an implicit product:
/// a number (possibly negated), a grouped expression, or a call result.
const fn implicit_factor_left(expr: &Expr) -> bool {
    matches!(expr,
             Expr::Int { .. }
             | Expr::Float { .. }
             | Expr::Fraction { .. }
             | Expr::BigNum { .. }
             | Expr::BigFraction { .. }
             | Expr::Constant { .. }
             | Expr::Group { .. }
             | Expr::Call { .. }
             | Expr::NativeCall { .. }
             | Expr::Unary { .. })
}

/// Whether a token can begin the right side of an implicit product:
/// a symbol, `(`, or a native-call name.
const fn implicit_factor_start(token: &Token) -> bool {
    matches!(token, Token::Identifier(_) | Token::LParen)
}

/// Parses a primary (atomic) expression or a prefix operator.
///
/// Dispatches on the leading token: literals, identifiers (variables,
/// constants, native calls), `this`/`super`, grouping and tuples, vector
/// and matrix literals, algebraic strings, and the prefix operators `-`
/// and `!`.
fn parse_prefix(state: &mut ParserState) -> ParseResult<Expr> {
    let Some((token, pos)) = state.advance() else {
        return Err(SyntaxError::UnexpectedEndOfInput { pos: state.last_pos() });
    };
    let pos = *pos;

    match token {
        Token::Int(value) => Ok(Expr::Int { value: *value, pos }),
        Token::Float(value) => Ok(Expr::Float { value: *value, pos }),
        Token::Scientific((mantissa, exponent)) => {
            Ok(Expr::Float { value: mantissa * 10f64.powi(*exponent),
                             pos })
        },
        Token::Fraction(FractionLit::Small(numerator, denominator)) => {
            Ok(Expr::Fraction { numerator:   *numerator,
                                denominator: *denominator,
                                pos })
        },
        Token::Fraction(FractionLit::Big(numerator, denominator)) => {
            Ok(Expr::BigFraction { numerator:   numerator.clone(),
                                   denominator: denominator.clone(),
                                   pos })
        },
        Token::BigNum(value) => Ok(Expr::BigNum { value: value.clone(), pos }),
        Token::Bool(value) => Ok(Expr::Bool { value: *value, pos }),
        Token::Str(value) => Ok(Expr::Str { value: value.clone(), pos }),
        Token::Nil => Ok(Expr::Nil { pos }),
        Token::Algebraic(source) => Ok(Expr::AlgebraicString { source: source.clone(),
                                                               pos }),

        Token::Minus => {
            let expr = parse_bp(state, bp::UNARY)?;
            Ok(Expr::Unary { op:   UnaryOperator::Negate,
                             expr: Box::new(expr),
                             pos })
        },
        Token::Bang => {
            let expr = parse_bp(state, bp::UNARY)?;
            Ok(Expr::Unary { op:   UnaryOperator::Not,
                             expr: Box::new(expr),
                             pos })
        },

        Token::This => Ok(Expr::This { id: state.fresh_id(), pos }),
        Token::Super => {
            state.expect(&Token::Dot, "'.' after 'super'")?;
            let (method, _) = state.expect_identifier("method name after 'super.'")?;
            Ok(Expr::Super { method,
                             id: state.fresh_id(),
                             pos })
        },

        Token::LParen => parse_group_or_tuple(state, pos),
        Token::LBracket => parse_vector_or_matrix(state, pos),
        Token::Identifier(name) => parse_identifier(state, name.clone(), pos),

        other => Err(SyntaxError::UnexpectedToken { token: format!("{other:?}"),
                                                    pos }),
    }
}

/// Parses an identifier head: a native call, a named constant, or a plain
/// variable reference.
fn parse_identifier(state: &mut ParserState, name: String, pos: Pos) -> ParseResult<Expr> {
    if is_native(&name) {
        state.expect(&Token::LParen, "'(' after native function name")?;
        let arguments = parse_arguments(state)?;
        return Ok(Expr::NativeCall { name, arguments, pos });
    }
    if let Some(value) = numeric_constant(&name) {
        return Ok(Expr::Constant { name, value, pos });
    }
    Ok(Expr::Variable { name,
                        id: state.fresh_id(),
                        pos })
}

/// Parses the contents of a `(` head: a grouped expression or a tuple.
fn parse_group_or_tuple(state: &mut ParserState, pos: Pos) -> ParseResult<Expr> {
    let first = parse_expression(state)?;
    if state.eat(&Token::Comma) {
        let mut elements = vec![first];
        loop {
            elements.push(parse_expression(state)?);
            if !state.eat(&Token::Comma) {
                break;
            }
        }
        state.expect(&Token::RParen, "')' after tuple elements")?;
        return Ok(Expr::Tuple { elements, pos });
    }
    state.expect(&Token::RParen, "')' after expression")?;
    Ok(Expr::Group { expr: Box::new(first), pos })
}

/// Parses the contents of a `[` head: a vector literal, or a matrix when
/// the first element is itself bracketed.
///
/// Matrix rows must agree in length; a ragged literal is a syntax error.
fn parse_vector_or_matrix(state: &mut ParserState, pos: Pos) -> ParseResult<Expr> {
    if state.eat(&Token::RBracket) {
        return Ok(Expr::Vector { elements: Vec::new(), pos });
    }

    if matches!(state.peek(), Some((Token::LBracket, _))) {
        let mut rows = Vec::new();
        loop {
            state.expect(&Token::LBracket, "'[' to start a matrix row")?;
            rows.push(parse_elements(state)?);
            if !state.eat(&Token::Comma) {
                break;
            }
        }
        state.expect(&Token::RBracket, "']' after matrix rows")?;
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(SyntaxError::RaggedMatrix { pos });
        }
        return Ok(Expr::Matrix { rows, pos });
    }

    let elements = parse_elements(state)?;
    Ok(Expr::Vector { elements, pos })
}

/// Parses comma-separated expressions up to and including a closing `]`.
fn parse_elements(state: &mut ParserState) -> ParseResult<Vec<Expr>> {
    let mut elements = Vec::new();
    if state.eat(&Token::RBracket) {
        return Ok(elements);
    }
    loop {
        elements.push(parse_expression(state)?);
        if !state.eat(&Token::Comma) {
            break;
        }
    }
    state.expect(&Token::RBracket, "']' after elements")?;
    Ok(elements)
}

/// Parses a call's argument list up to and including the closing `)`.
pub(crate) fn parse_arguments(state: &mut ParserState) -> ParseResult<Vec<Expr>> {
    let mut arguments = Vec::new();
    if state.eat(&Token::RParen) {
        return Ok(arguments);
    }
    loop {
        arguments.push(parse_expression(state)?);
        if !state.eat(&Token::Comma) {
            break;
        }
    }
    state.expect(&Token::RParen, "')' after arguments")?;
    Ok(arguments)
}
