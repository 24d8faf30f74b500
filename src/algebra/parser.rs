use crate::{
    algebra::expr::AlgebraicExpression,
    error::{SyntaxError, TwineError},
    interpreter::{
        lexer::{numeric_constant, scan, Token},
        parser::core::{ParseResult, ParserState},
    },
};

use ordered_float::OrderedFloat;

/// Parses a quoted algebraic string into a raw expression tree.
///
/// The text is re-tokenized with the script lexer and parsed with a
/// dedicated grammar: `+ - * / ^ !`, implicit multiplication, named
/// constants, and uninterpreted function applications. The result is not
/// simplified; callers hand it to [`crate::algebra::simplify::simplify`].
///
/// # Errors
/// A `TwineError` of kind `Algebraic` for both lexical and grammatical
/// failures inside the quoted text.
///
/// # Example
/// ```
/// use twine::algebra::{expr::AlgebraicExpression as E, parser::parse_algebraic};
///
/// let raw = parse_algebraic("2x").unwrap();
/// assert_eq!(raw,
///            E::product(vec![E::int(2), E::sym("x")]));
/// ```
pub fn parse_algebraic(source: &str) -> Result<AlgebraicExpression, TwineError> {
    let tokens = scan(source).map_err(|error| TwineError { kind: crate::error::ErrorKind::Algebraic,
                                                           phase: crate::error::Phase::Simplifying,
                                                           ..error })?;
    let mut state = ParserState::new(&tokens);
    let expr = parse_sum(&mut state).map_err(|error| TwineError::algebraic(&error))?;

    if let Some((token, pos)) = state.peek() {
        let error = SyntaxError::UnexpectedToken { token: format!("{token:?}"),
                                                   pos:   *pos, };
        return Err(TwineError::algebraic(&error));
    }
    Ok(expr)
}

/// Parses addition and subtraction.
///
/// Grammar: `sum := product (("+" | "-") product)*`
fn parse_sum(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    let mut left = parse_product(state)?;
    loop {
        match state.peek() {
            Some((Token::Plus, _)) => {
                state.advance();
                let right = parse_product(state)?;
                left = AlgebraicExpression::Sum(vec![left, right]);
            },
            Some((Token::Minus, _)) => {
                state.advance();
                let right = parse_product(state)?;
                left = AlgebraicExpression::Difference(vec![left, right]);
            },
            _ => break,
        }
    }
    Ok(left)
}

/// Parses multiplication, division, and implicit products.
///
/// Grammar: `product := unary (("*" | "/") unary | <implicit> unary)*`
///
/// An implicit product continues whenever the next token could start an
/// operand: `2x`, `3(x+1)`, `x y`, `2 sin(x)`.
fn parse_product(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    let mut left = parse_unary(state)?;
    loop {
        match state.peek() {
            Some((Token::Star, _)) => {
                state.advance();
                let right = parse_unary(state)?;
                left = AlgebraicExpression::Product(vec![left, right]);
            },
            Some((Token::Slash, _)) => {
                state.advance();
                let right = parse_unary(state)?;
                left = AlgebraicExpression::Quotient(Box::new(left), Box::new(right));
            },
            Some((token, _)) if starts_operand(token) => {
                let right = parse_unary(state)?;
                left = AlgebraicExpression::Product(vec![left, right]);
            },
            _ => break,
        }
    }
    Ok(left)
}

/// Whether a token can begin an implicit-product operand.
const fn starts_operand(token: &Token) -> bool {
    matches!(token,
             Token::Identifier(_)
             | Token::LParen
             | Token::Int(_)
             | Token::Float(_)
             | Token::Scientific(_)
             | Token::Fraction(_))
}

/// Parses unary negation.
///
/// Grammar: `unary := "-" unary | power`
fn parse_unary(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    if matches!(state.peek(), Some((Token::Minus, _))) {
        state.advance();
        let operand = parse_unary(state)?;
        return Ok(AlgebraicExpression::Difference(vec![operand]));
    }
    parse_power(state)
}

/// Parses exponentiation, right-associatively.
///
/// Grammar: `power := postfix ("^" unary)?`
fn parse_power(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    let base = parse_postfix(state)?;
    if matches!(state.peek(), Some((Token::Caret, _))) {
        state.advance();
        let exponent = parse_unary(state)?;
        return Ok(AlgebraicExpression::Power { base:     Box::new(base),
                                               exponent: Box::new(exponent), });
    }
    Ok(base)
}

/// Parses postfix factorials.
///
/// Grammar: `postfix := atom "!"*`
fn parse_postfix(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    let mut operand = parse_atom(state)?;
    while state.eat(&Token::Bang) {
        operand = AlgebraicExpression::Factorial(Box::new(operand));
    }
    Ok(operand)
}

/// Parses an atom: a numeric literal, a symbol or constant, a function
/// application, or a parenthesized subexpression.
fn parse_atom(state: &mut ParserState) -> ParseResult<AlgebraicExpression> {
    let Some((token, pos)) = state.advance() else {
        return Err(SyntaxError::UnexpectedEndOfInput { pos: state.last_pos() });
    };
    let pos = *pos;

    match token {
        Token::Int(value) => Ok(AlgebraicExpression::Int(*value)),
        Token::Float(value) => Ok(AlgebraicExpression::real(*value)),
        Token::Scientific((mantissa, exponent)) => {
            Ok(AlgebraicExpression::real(mantissa * 10f64.powi(*exponent)))
        },
        Token::Fraction(crate::interpreter::lexer::FractionLit::Small(n, d)) => {
            Ok(AlgebraicExpression::Fraction(*n, *d))
        },

        Token::Identifier(name) => {
            if state.eat(&Token::LParen) {
                let mut args = Vec::new();
                if !state.eat(&Token::RParen) {
                    loop {
                        args.push(parse_sum(state)?);
                        if !state.eat(&Token::Comma) {
                            break;
                        }
                    }
                    state.expect(&Token::RParen, "')' after function arguments")?;
                }
                return Ok(AlgebraicExpression::Func { name: name.clone(),
                                                      args });
            }
            if let Some(value) = numeric_constant(name) {
                return Ok(AlgebraicExpression::Constant { name:  name.clone(),
                                                          value: Some(OrderedFloat(value)), });
            }
            Ok(AlgebraicExpression::Sym(name.clone()))
        },

        Token::LParen => {
            let inner = parse_sum(state)?;
            state.expect(&Token::RParen, "')' after expression")?;
            Ok(inner)
        },

        other => Err(SyntaxError::UnexpectedToken { token: format!("{other:?}"),
                                                    pos }),
    }
}
