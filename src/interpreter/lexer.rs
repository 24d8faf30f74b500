use logos::Logos;
use num_bigint::BigInt;

use crate::{
    error::{ErrorKind, LexError, Phase, TwineError},
    util::num::MAX_SAFE_INT,
};

/// A source position, 1-based in both coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Column number, starting at 1.
    pub column: usize,
}

/// The payload of a fraction literal.
///
/// A `n|d` literal whose numerator or denominator exceeds the safe integer
/// bound is promoted to the big form instead of being rejected; `#n|d`
/// literals are big from the start.
#[derive(Debug, Clone, PartialEq)]
pub enum FractionLit {
    /// Both components fit in the exactly-representable integer range.
    Small(i64, i64),
    /// At least one component required arbitrary precision.
    Big(BigInt, BigInt),
}

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum Token {
    /// Floating-point literal tokens, such as `3.14` or `.5`.
    #[regex(r"[0-9][0-9_]*\.[0-9]+", lex_float)]
    #[regex(r"\.[0-9]+", lex_float)]
    Float(f64),
    /// Integer literal tokens: `42`, `1_000`, `0xFF`, `0o17`, `0b1011`.
    #[regex(r"[0-9][0-9_]*", lex_integer)]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex_radix(lex, 16))]
    #[regex(r"0[oO][0-7]+", |lex| lex_radix(lex, 8))]
    #[regex(r"0[bB][01]+", |lex| lex_radix(lex, 2))]
    Int(i64),
    /// Scientific-notation literal, kept as a `(mantissa, exponent)` pair.
    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?E[+-]?[0-9]+", lex_scientific)]
    Scientific((f64, i32)),
    /// Fraction literal `n|d` or `#n|d`, promoted to the big form past the
    /// safe bound.
    #[regex(r"[0-9][0-9_]*\|[0-9][0-9_]*", lex_fraction)]
    #[regex(r"#[0-9][0-9_]*\|[0-9][0-9_]*", lex_big_fraction)]
    Fraction(FractionLit),
    /// Bignumber literal `#n`.
    #[regex(r"#[0-9][0-9_]*", lex_bignum)]
    BigNum(BigInt),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", |_| true)]
    #[token("false", |_| false)]
    Bool(bool),
    /// Double-quoted string literal.
    #[token("\"", lex_string)]
    Str(String),
    /// Single-quoted algebraic string, captured verbatim and re-tokenized by
    /// the algebra parser.
    #[token("'", lex_algebraic_string)]
    Algebraic(String),
    /// Identifier tokens: variable, function, or class names such as `x`,
    /// `area`, `Δt`, or `$tmp`.
    #[regex(r"[a-zA-Z_$\p{Greek}][a-zA-Z0-9_$\p{Greek}]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `let`
    #[token("let")]
    Let,
    /// `var`
    #[token("var")]
    Var,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `class`
    #[token("class")]
    Class,
    /// `return`
    #[token("return")]
    Return,
    /// `print`
    #[token("print")]
    Print,
    /// `this`
    #[token("this")]
    This,
    /// `super`
    #[token("super")]
    Super,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equal,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,
}

/// Fixed table of native function names.
///
/// These names lex as ordinary identifiers; the parser consults this table
/// to turn a call on one of them into a `NativeCall` node, and declaration
/// forms reject them as binding names.
pub const NATIVE_FUNCTIONS: &[&str] = &["sin", "cos", "tan", "ln", "lg", "log", "sqrt", "abs",
                                        "floor", "ceil", "exp", "gcd", "lcm", "max", "min",
                                        "simplify", "deriv", "subex"];

/// Returns `true` when `name` is a native function.
#[must_use]
pub fn is_native(name: &str) -> bool {
    NATIVE_FUNCTIONS.contains(&name)
}

/// Fixed table of named numeric constants.
///
/// A bare identifier matching one of these parses as a `Constant` node
/// instead of a variable reference.
#[must_use]
pub fn numeric_constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "π" => Some(std::f64::consts::PI),
        "tau" | "τ" => Some(std::f64::consts::TAU),
        "euler" => Some(std::f64::consts::E),
        _ => None,
    }
}

/// Byte offsets of every line start, for mapping token spans to positions.
///
/// Built once per scan; tokens (including multi-line strings) then report
/// the position of their first byte, not of wherever the lexer stopped.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(offset + 1);
            }
        }
        Self { starts }
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self.starts.partition_point(|&start| start <= offset);
        Pos { line,
              column: offset - self.starts[line - 1] + 1 }
    }
}

/// Converts source text into a stream of tokens with positions.
///
/// Scanning is error-first: the first malformed token aborts the scan and
/// is returned as a diagnostic. On success the stream has trailing commas
/// before closing delimiters already elided.
///
/// # Errors
/// Returns a `TwineError` of kind `Lexical` describing the first malformed
/// token.
///
/// # Example
/// ```
/// use twine::interpreter::lexer::{Token, scan};
///
/// let tokens = scan("let x = 2;").unwrap();
/// assert_eq!(tokens[0].0, Token::Let);
/// assert_eq!(tokens[2].0, Token::Equal);
/// assert_eq!(tokens[3].1.column, 9);
/// ```
pub fn scan(source: &str) -> Result<Vec<(Token, Pos)>, TwineError> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let pos = index.pos(lexer.span().start);
        match result {
            Ok(token) => tokens.push((token, pos)),
            Err(error) => {
                return Err(TwineError { kind: ErrorKind::Lexical,
                                        phase: Phase::Scanning,
                                        pos,
                                        message: error.to_string(),
                                        recommendation: error.recommendation() });
            },
        }
    }

    Ok(elide_trailing_commas(tokens))
}

/// Drops commas that sit immediately before a closing delimiter.
///
/// This makes `[1, 2, 3,]` and `f(a, b,)` legal without the parser having
/// to special-case every comma-separated construct.
fn elide_trailing_commas(tokens: Vec<(Token, Pos)>) -> Vec<(Token, Pos)> {
    let mut out: Vec<(Token, Pos)> = Vec::with_capacity(tokens.len());
    for entry in tokens {
        if matches!(entry.0, Token::RParen | Token::RBracket | Token::RBrace)
           && matches!(out.last(), Some((Token::Comma, _)))
        {
            out.pop();
        }
        out.push(entry);
    }
    out
}

/// Strips digit separators after validating their placement.
///
/// Separators must split the digit run into groups of exactly three, with a
/// leading group of one to three digits: `1_000_000` is legal, `10_00` and
/// `1_0000` are not.
fn strip_separators(digits: &str) -> Result<String, LexError> {
    if !digits.contains('_') {
        return Ok(digits.to_string());
    }
    let chunks: Vec<&str> = digits.split('_').collect();
    if chunks[0].is_empty() || chunks[0].len() > 3 {
        return Err(LexError::MisplacedSeparator);
    }
    if chunks[1..].iter().any(|chunk| chunk.len() != 3) {
        return Err(LexError::MisplacedSeparator);
    }
    Ok(chunks.concat())
}

/// Parses a decimal integer literal, enforcing the safe-integer bound.
fn lex_integer(lex: &logos::Lexer<Token>) -> Result<i64, LexError> {
    let digits = strip_separators(lex.slice())?;
    let value: i64 = digits.parse()
                           .map_err(|_| LexError::IntegerTooLarge { literal: digits.clone() })?;
    if value > MAX_SAFE_INT {
        return Err(LexError::IntegerTooLarge { literal: digits });
    }
    Ok(value)
}

/// Parses a hex, octal, or binary literal, enforcing the safe-integer bound.
fn lex_radix(lex: &logos::Lexer<Token>, radix: u32) -> Result<i64, LexError> {
    let digits = &lex.slice()[2..];
    let value =
        i64::from_str_radix(digits, radix).map_err(|_| {
                                              LexError::IntegerTooLarge { literal: lex.slice()
                                                                                     .to_string() }
                                          })?;
    if value > MAX_SAFE_INT {
        return Err(LexError::IntegerTooLarge { literal: value.to_string() });
    }
    Ok(value)
}

/// Parses a floating-point literal from the current token slice.
fn lex_float(lex: &logos::Lexer<Token>) -> Result<f64, LexError> {
    let slice = lex.slice();
    let cleaned = match slice.split_once('.') {
        Some((int_part, frac_part)) if !int_part.is_empty() => {
            format!("{}.{frac_part}", strip_separators(int_part)?)
        },
        _ => slice.to_string(),
    };
    cleaned.parse().map_err(|_| LexError::MalformedNumber)
}

/// Parses a scientific literal `aEb` into its `(mantissa, exponent)` pair.
fn lex_scientific(lex: &logos::Lexer<Token>) -> Result<(f64, i32), LexError> {
    let (mantissa_text, exponent_text) = lex.slice()
                                            .split_once('E')
                                            .ok_or(LexError::MalformedNumber)?;
    let cleaned = match mantissa_text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{frac_part}", strip_separators(int_part)?),
        None => strip_separators(mantissa_text)?,
    };
    let mantissa: f64 = cleaned.parse().map_err(|_| LexError::MalformedNumber)?;
    let exponent: i32 = exponent_text.parse()
                                     .map_err(|_| LexError::ExponentOutOfRange)?;
    if exponent.unsigned_abs() > 308 {
        return Err(LexError::ExponentOutOfRange);
    }
    Ok((mantissa, exponent))
}

/// Parses a fraction literal `n|d`.
///
/// Components above the safe-integer bound promote the whole literal to a
/// bigfraction instead of failing.
fn lex_fraction(lex: &logos::Lexer<Token>) -> Result<FractionLit, LexError> {
    let (numer_text, denom_text) = lex.slice()
                                      .split_once('|')
                                      .ok_or(LexError::MalformedNumber)?;
    let numer_digits = strip_separators(numer_text)?;
    let denom_digits = strip_separators(denom_text)?;

    let small = |digits: &str| -> Option<i64> {
        digits.parse::<i64>().ok().filter(|&v| v <= MAX_SAFE_INT)
    };

    match (small(&numer_digits), small(&denom_digits)) {
        (Some(numerator), Some(denominator)) => Ok(FractionLit::Small(numerator, denominator)),
        _ => Ok(FractionLit::Big(parse_bigint(&numer_digits)?, parse_bigint(&denom_digits)?)),
    }
}

/// Parses a bignumber literal `#n`.
fn lex_bignum(lex: &logos::Lexer<Token>) -> Result<BigInt, LexError> {
    parse_bigint(&strip_separators(&lex.slice()[1..])?)
}

/// Parses a bigfraction literal `#n|d`.
fn lex_big_fraction(lex: &logos::Lexer<Token>) -> Result<FractionLit, LexError> {
    let (numer_text, denom_text) = lex.slice()[1..].split_once('|')
                                                   .ok_or(LexError::MalformedNumber)?;
    Ok(FractionLit::Big(parse_bigint(&strip_separators(numer_text)?)?,
                        parse_bigint(&strip_separators(denom_text)?)?))
}

fn parse_bigint(digits: &str) -> Result<BigInt, LexError> {
    digits.parse().map_err(|_| LexError::MalformedNumber)
}

/// Consumes a double-quoted string body, handling escapes.
///
/// The opening `"` has already been matched; this callback walks the
/// remainder, bumps the lexer past the body and closing quote, and returns
/// the unescaped contents.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    let remainder = lex.remainder();
    let mut value = String::new();
    let mut chars = remainder.char_indices();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '"' => {
                lex.bump(offset + 1);
                return Ok(value);
            },
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                },
                None => return Err(LexError::UnterminatedString),
            },
            other => value.push(other),
        }
    }

    Err(LexError::UnterminatedString)
}

/// Consumes a single-quoted algebraic string verbatim.
///
/// No escapes: the body is handed to the algebra parser untouched.
fn lex_algebraic_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    let remainder = lex.remainder();
    match remainder.find('\'') {
        Some(end) => {
            lex.bump(end + 1);
            Ok(remainder[..end].to_string())
        },
        None => Err(LexError::UnterminatedAlgebraicString),
    }
}
