use crate::{
    ast::{BinaryOperator, LogicalOperator, NodeId, RelationalOperator, Statement},
    error::SyntaxError,
    interpreter::{
        lexer::{Pos, Token},
        parser::statement::parse_declaration,
    },
};

pub type ParseResult<T> = Result<T, SyntaxError>;

/// Binding powers for the Pratt expression loop, low to high.
///
/// An infix operator continues the current expression only while its left
/// binding power is at least the loop's minimum. Implicit multiplication
/// sits between the explicit factor level and unary operators, so `1/2x`
/// groups as `1/(2*x)` and `2x^2` as `2*(x^2)`.
pub mod bp {
    /// `=` (right-associative).
    pub const ASSIGNMENT: u8 = 1;
    /// `or`
    pub const OR: u8 = 2;
    /// `and`
    pub const AND: u8 = 3;
    /// `==`, `!=`
    pub const EQUALITY: u8 = 4;
    /// `<`, `<=`, `>`, `>=`
    pub const COMPARISON: u8 = 5;
    /// `+`, `-`
    pub const TERM: u8 = 6;
    /// `*`, `/`, `%`
    pub const FACTOR: u8 = 7;
    /// Implicit multiplication: `2x`, `3(x+1)`, `2 sin(x)`.
    pub const IMUL: u8 = 8;
    /// Prefix `-`, `!`.
    pub const UNARY: u8 = 9;
    /// `^` (right-associative).
    pub const POWER: u8 = 10;
    /// Calls, indexing, member access.
    pub const POSTFIX: u8 = 11;
}

/// The infix operator class a token belongs to.
pub enum InfixOp {
    /// Arithmetic operator.
    Binary(BinaryOperator),
    /// Comparison operator.
    Relational(RelationalOperator),
    /// Short-circuiting logical operator.
    Logical(LogicalOperator),
}

/// Maps a token to its infix operator and `(left, right)` binding powers.
///
/// Right-associative operators return a right power equal to their left
/// power; left-associative ones return left power plus one, so the Pratt
/// loop stops or recurses correctly in both cases.
#[must_use]
pub fn infix_binding_power(token: &Token) -> Option<(u8, u8, InfixOp)> {
    use BinaryOperator as B;
    use RelationalOperator as R;

    let entry = match token {
        Token::Or => (bp::OR, bp::OR + 1, InfixOp::Logical(LogicalOperator::Or)),
        Token::And => (bp::AND, bp::AND + 1, InfixOp::Logical(LogicalOperator::And)),
        Token::EqualEqual => (bp::EQUALITY, bp::EQUALITY + 1, InfixOp::Relational(R::Equal)),
        Token::BangEqual => (bp::EQUALITY, bp::EQUALITY + 1, InfixOp::Relational(R::NotEqual)),
        Token::Less => (bp::COMPARISON, bp::COMPARISON + 1, InfixOp::Relational(R::Less)),
        Token::LessEqual => {
            (bp::COMPARISON, bp::COMPARISON + 1, InfixOp::Relational(R::LessEqual))
        },
        Token::Greater => (bp::COMPARISON, bp::COMPARISON + 1, InfixOp::Relational(R::Greater)),
        Token::GreaterEqual => {
            (bp::COMPARISON, bp::COMPARISON + 1, InfixOp::Relational(R::GreaterEqual))
        },
        Token::Plus => (bp::TERM, bp::TERM + 1, InfixOp::Binary(B::Add)),
        Token::Minus => (bp::TERM, bp::TERM + 1, InfixOp::Binary(B::Sub)),
        Token::Star => (bp::FACTOR, bp::FACTOR + 1, InfixOp::Binary(B::Mul)),
        Token::Slash => (bp::FACTOR, bp::FACTOR + 1, InfixOp::Binary(B::Div)),
        Token::Percent => (bp::FACTOR, bp::FACTOR + 1, InfixOp::Binary(B::Mod)),
        Token::Caret => (bp::POWER, bp::POWER, InfixOp::Binary(B::Pow)),
        _ => return None,
    };
    Some(entry)
}

/// Explicit parser state threaded through every parsing function.
///
/// Holds the token slice, a cursor, and the running counter that hands out
/// resolver identities to `Variable`/`Assign`/`this`/`super` nodes.
pub struct ParserState<'a> {
    tokens:  &'a [(Token, Pos)],
    cursor:  usize,
    next_id: NodeId,
}

impl<'a> ParserState<'a> {
    /// Creates a parser over a scanned token stream.
    #[must_use]
    pub const fn new(tokens: &'a [(Token, Pos)]) -> Self {
        Self { tokens, cursor: 0, next_id: 0 }
    }

    /// The current token, or `None` at end of input.
    #[must_use]
    pub fn peek(&self) -> Option<&'a (Token, Pos)> {
        self.tokens.get(self.cursor)
    }

    /// The token after the current one.
    #[must_use]
    pub fn peek_second(&self) -> Option<&'a (Token, Pos)> {
        self.tokens.get(self.cursor + 1)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Option<&'a (Token, Pos)> {
        let entry = self.tokens.get(self.cursor);
        if entry.is_some() {
            self.cursor += 1;
        }
        entry
    }

    /// `true` when every token has been consumed.
    #[must_use]
    pub const fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Consumes the current token if it matches, without error.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().is_some_and(|(token, _)| token == expected) {
            self.cursor += 1;
            return true;
        }
        false
    }

    /// Consumes the current token, requiring it to match.
    ///
    /// # Errors
    /// `ExpectedToken` when the current token differs, `UnexpectedEndOfInput`
    /// when the stream is exhausted.
    pub fn expect(&mut self, expected: &Token, description: &str) -> ParseResult<Pos> {
        match self.advance() {
            Some((token, pos)) if token == expected => Ok(*pos),
            Some((token, pos)) => Err(SyntaxError::ExpectedToken { expected: description.to_string(),
                                                                   found:    format!("{token:?}"),
                                                                   pos:      *pos, }),
            None => Err(SyntaxError::UnexpectedEndOfInput { pos: self.last_pos() }),
        }
    }

    /// Consumes an identifier token and returns its name.
    ///
    /// # Errors
    /// `ExpectedToken` when the current token is not an identifier.
    pub fn expect_identifier(&mut self, description: &str) -> ParseResult<(String, Pos)> {
        match self.advance() {
            Some((Token::Identifier(name), pos)) => Ok((name.clone(), *pos)),
            Some((token, pos)) => Err(SyntaxError::ExpectedToken { expected: description.to_string(),
                                                                   found:    format!("{token:?}"),
                                                                   pos:      *pos, }),
            None => Err(SyntaxError::UnexpectedEndOfInput { pos: self.last_pos() }),
        }
    }

    /// The position of the last token in the stream, for end-of-input errors.
    #[must_use]
    pub fn last_pos(&self) -> Pos {
        self.tokens.last().map_or(Pos::default(), |(_, pos)| *pos)
    }

    /// Hands out the next resolver identity.
    pub fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Parses a full program: a list of declarations and statements.
///
/// The first syntax error aborts parsing immediately; no partial AST is
/// produced and no synchronization is attempted.
///
/// # Errors
/// The first `SyntaxError` encountered.
pub fn parse_program(tokens: &[(Token, Pos)]) -> ParseResult<Vec<Statement>> {
    let mut state = ParserState::new(tokens);
    let mut statements = Vec::new();
    while !state.at_end() {
        statements.push(parse_declaration(&mut state)?);
    }
    Ok(statements)
}

/// Requires a statement terminator: `;`, or end of input.
///
/// The implicit semicolon exists only at the very end of the source, so
/// every interior statement must be explicitly terminated.
///
/// # Errors
/// `MissingSemicolon` when another token follows unterminated.
pub fn expect_terminator(state: &mut ParserState) -> ParseResult<()> {
    if state.eat(&Token::Semicolon) || state.at_end() {
        return Ok(());
    }
    let pos = state.peek().map_or(state.last_pos(), |(_, pos)| *pos);
    Err(SyntaxError::MissingSemicolon { pos })
}
