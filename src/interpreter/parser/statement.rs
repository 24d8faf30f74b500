use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, Statement},
    error::SyntaxError,
    interpreter::{
        lexer::{is_native, Pos, Token},
        parser::{
            core::{expect_terminator, ParseResult, ParserState},
            expression::parse_expression,
        },
    },
};

/// Parses one declaration or statement.
///
/// Grammar:
/// ```text
///     declaration := class_decl | fn_decl | variable_decl | statement
/// ```
///
/// # Errors
/// The first `SyntaxError` encountered.
pub fn parse_declaration(state: &mut ParserState) -> ParseResult<Statement> {
    match state.peek() {
        Some((Token::Class, _)) => parse_class(state),
        Some((Token::Fn, _)) => {
            state.advance();
            Ok(Statement::Function(Rc::new(parse_function(state)?)))
        },
        Some((Token::Let, _)) => parse_variable(state, false),
        Some((Token::Var, _)) => parse_variable(state, true),
        _ => parse_statement(state),
    }
}

/// Parses a non-declaration statement.
///
/// Grammar:
/// ```text
///     statement := if | while | for | print | return | block | expr_stmt
/// ```
fn parse_statement(state: &mut ParserState) -> ParseResult<Statement> {
    match state.peek() {
        Some((Token::If, _)) => parse_if(state),
        Some((Token::While, _)) => parse_while(state),
        Some((Token::For, _)) => parse_for(state),
        Some((Token::Print, _)) => parse_print(state),
        Some((Token::Return, _)) => parse_return(state),
        Some((Token::LBrace, _)) => parse_block(state),
        _ => {
            let expr = parse_expression(state)?;
            expect_terminator(state)?;
            Ok(Statement::Expression { expr })
        },
    }
}

/// Parses a `let` or `var` declaration.
///
/// Both forms require an initializer; `var` additionally marks the binding
/// mutable. The name must not shadow a native function.
fn parse_variable(state: &mut ParserState, mutable: bool) -> ParseResult<Statement> {
    state.advance();
    let (name, pos) = state.expect_identifier("variable name")?;
    reject_native_name(&name, pos)?;
    state.expect(&Token::Equal, "'=' after variable name")?;
    let initializer = parse_expression(state)?;
    expect_terminator(state)?;
    Ok(Statement::Variable { name,
                             initializer,
                             mutable,
                             pos })
}

/// Parses a function declaration, after the `fn` keyword.
///
/// Two body forms are accepted:
/// ```text
///     fn name(params) { statements }
///     fn name(params) = expression;
/// ```
/// The expression form desugars to a body holding a single `return`.
pub(crate) fn parse_function(state: &mut ParserState) -> ParseResult<FunctionDecl> {
    let (name, pos) = state.expect_identifier("function name")?;
    reject_native_name(&name, pos)?;
    state.expect(&Token::LParen, "'(' after function name")?;

    let mut params: Vec<String> = Vec::new();
    if !state.eat(&Token::RParen) {
        loop {
            let (param, param_pos) = state.expect_identifier("parameter name")?;
            reject_native_name(&param, param_pos)?;
            if params.contains(&param) {
                return Err(SyntaxError::DuplicateParameter { name: param,
                                                             pos:  param_pos, });
            }
            params.push(param);
            if !state.eat(&Token::Comma) {
                break;
            }
        }
        state.expect(&Token::RParen, "')' after parameters")?;
    }

    let body = match state.peek() {
        Some((Token::LBrace, _)) => block_statements(state)?,
        Some((Token::Equal, ret_pos)) => {
            let ret_pos = *ret_pos;
            state.advance();
            let value = parse_expression(state)?;
            expect_terminator(state)?;
            vec![Statement::Return { value: Some(value),
                                     pos:   ret_pos, }]
        },
        Some((token, found_pos)) => {
            return Err(SyntaxError::ExpectedToken { expected:
                                                        "'{' or '=' to begin a function body"
                                                            .to_string(),
                                                    found:    format!("{token:?}"),
                                                    pos:      *found_pos, });
        },
        None => return Err(SyntaxError::UnexpectedEndOfInput { pos: state.last_pos() }),
    };

    Ok(FunctionDecl { name, params, body, pos })
}

/// Parses a class declaration with its method list.
///
/// Methods use the same `fn` form as free functions; a method literally
/// named `init` is the constructor.
fn parse_class(state: &mut ParserState) -> ParseResult<Statement> {
    state.advance();
    let (name, pos) = state.expect_identifier("class name")?;
    reject_native_name(&name, pos)?;
    state.expect(&Token::LBrace, "'{' before class body")?;

    let mut methods = Vec::new();
    while !matches!(state.peek(), Some((Token::RBrace, _)) | None) {
        state.expect(&Token::Fn, "'fn' to begin a method")?;
        methods.push(Rc::new(parse_function(state)?));
    }
    state.expect(&Token::RBrace, "'}' after class body")?;

    Ok(Statement::Class { name, methods, pos })
}

/// Parses an `if` statement with an optional `else` branch.
fn parse_if(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    state.advance();
    state.expect(&Token::LParen, "'(' after 'if'")?;
    let condition = parse_expression(state)?;
    state.expect(&Token::RParen, "')' after condition")?;

    let then_branch = Box::new(parse_statement(state)?);
    let else_branch = if state.eat(&Token::Else) {
        Some(Box::new(parse_statement(state)?))
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       pos })
}

/// Parses a `while` loop.
fn parse_while(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    state.advance();
    state.expect(&Token::LParen, "'(' after 'while'")?;
    let condition = parse_expression(state)?;
    state.expect(&Token::RParen, "')' after condition")?;
    let body = Box::new(parse_statement(state)?);
    Ok(Statement::While { condition, body, pos })
}

/// Parses a `for` loop and desugars it.
///
/// ```text
///     for (init; cond; incr) body
/// ```
/// becomes a block holding the initializer followed by a `while` whose body
/// has the increment appended. A missing condition loops forever (subject
/// to the interpreter's iteration ceiling).
fn parse_for(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    state.advance();
    state.expect(&Token::LParen, "'(' after 'for'")?;

    let initializer = match state.peek() {
        Some((Token::Semicolon, _)) => {
            state.advance();
            None
        },
        Some((Token::Let, _)) => Some(parse_variable(state, false)?),
        Some((Token::Var, _)) => Some(parse_variable(state, true)?),
        _ => {
            let expr = parse_expression(state)?;
            state.expect(&Token::Semicolon, "';' after loop initializer")?;
            Some(Statement::Expression { expr })
        },
    };

    let condition = if matches!(state.peek(), Some((Token::Semicolon, _))) {
        Expr::Bool { value: true, pos }
    } else {
        parse_expression(state)?
    };
    state.expect(&Token::Semicolon, "';' after loop condition")?;

    let increment = if matches!(state.peek(), Some((Token::RParen, _))) {
        None
    } else {
        Some(parse_expression(state)?)
    };
    state.expect(&Token::RParen, "')' after for clauses")?;

    let body = parse_statement(state)?;

    let body = match increment {
        Some(expr) => Statement::Block { statements: vec![body, Statement::Expression { expr }],
                                         pos },
        None => body,
    };
    let looped = Statement::While { condition,
                                    body: Box::new(body),
                                    pos };
    let statements = match initializer {
        Some(init) => vec![init, looped],
        None => vec![looped],
    };
    Ok(Statement::Block { statements, pos })
}

/// Parses a `print` statement.
fn parse_print(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    state.advance();
    let expr = parse_expression(state)?;
    expect_terminator(state)?;
    Ok(Statement::Print { expr, pos })
}

/// Parses a `return` statement with an optional value.
fn parse_return(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    state.advance();
    let value = if matches!(state.peek(), Some((Token::Semicolon, _)) | None) {
        None
    } else {
        Some(parse_expression(state)?)
    };
    expect_terminator(state)?;
    Ok(Statement::Return { value, pos })
}

/// Parses a braced block statement.
fn parse_block(state: &mut ParserState) -> ParseResult<Statement> {
    let pos = ahead_pos(state);
    Ok(Statement::Block { statements: block_statements(state)?,
                          pos })
}

/// Parses `{ declarations }` and returns the enclosed statements.
fn block_statements(state: &mut ParserState) -> ParseResult<Vec<Statement>> {
    state.expect(&Token::LBrace, "'{' to open a block")?;
    let mut statements = Vec::new();
    while !matches!(state.peek(), Some((Token::RBrace, _)) | None) {
        statements.push(parse_declaration(state)?);
    }
    state.expect(&Token::RBrace, "'}' to close a block")?;
    Ok(statements)
}

/// Rejects a native function name used as a binding name.
fn reject_native_name(name: &str, pos: Pos) -> ParseResult<()> {
    if is_native(name) {
        return Err(SyntaxError::ReservedName { name: name.to_string(),
                                               pos });
    }
    Ok(())
}

/// The position of the current token, for statements that consume their
/// keyword after recording where it was.
fn ahead_pos(state: &ParserState) -> Pos {
    state.peek().map_or_else(Pos::default, |(_, pos)| *pos)
}
