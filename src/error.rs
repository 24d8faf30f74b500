use crate::interpreter::lexer::Pos;

/// Lexical errors.
///
/// Defines all error types that can occur while scanning source text into
/// tokens: malformed literals, misplaced digit separators, unterminated
/// strings, and unknown characters.
pub mod lex_error;
/// Syntax errors.
///
/// Defines all error types that can occur while parsing the token stream
/// into an AST. The first syntax error aborts parsing; there is no recovery.
pub mod syntax_error;
/// Resolver errors.
///
/// Contains the errors raised by the static resolution pass: scoping
/// violations such as self-referential initializers, duplicate declarations,
/// and misplaced `return`/`this`/`super`.
pub mod resolve_error;
/// Runtime and environment errors.
///
/// Contains all error types that can be raised during evaluation: type
/// mismatches, division by zero, bad indices, undefined names, and
/// assignments to immutable bindings.
pub mod runtime_error;

pub use lex_error::LexError;
pub use resolve_error::ResolveError;
pub use runtime_error::RuntimeError;
pub use syntax_error::SyntaxError;

/// Classifies an error by the language rule it violates.
///
/// The kind decides the headline of the formatted report and which module
/// the report claims to speak for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source text (bad literal, unknown character).
    Lexical,
    /// Token stream does not match the grammar.
    Syntax,
    /// Static scoping violation found before execution.
    Resolver,
    /// Undefined name or assignment to an immutable binding.
    Environment,
    /// Any other failure during evaluation.
    Runtime,
    /// Malformed algebraic string.
    Algebraic,
}

impl ErrorKind {
    /// The module name used in the `Reporting from the <module>:` line.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::Lexical => "scanner",
            Self::Syntax => "parser",
            Self::Resolver => "resolver",
            Self::Environment => "environment",
            Self::Runtime => "interpreter",
            Self::Algebraic => "simplifier",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Lexical => "LEXICAL",
            Self::Syntax => "SYNTAX",
            Self::Resolver => "RESOLVER",
            Self::Environment => "ENVIRONMENT",
            Self::Runtime => "RUNTIME",
            Self::Algebraic => "ALGEBRAIC",
        };
        write!(f, "{label}")
    }
}

/// The pipeline phase that was active when an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Converting source text into tokens.
    Scanning,
    /// Building the AST from tokens.
    Parsing,
    /// Statically resolving variable scopes.
    Resolving,
    /// Executing the AST.
    Interpreting,
    /// Parsing or rewriting an algebraic string.
    Simplifying,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Scanning => "scanning",
            Self::Parsing => "parsing",
            Self::Resolving => "resolving",
            Self::Interpreting => "interpreting",
            Self::Simplifying => "simplifying",
        };
        write!(f, "{label}")
    }
}

/// The uniform error value surfaced by every entry point.
///
/// Each phase produces its own error enum internally; all of them convert
/// into a `TwineError` carrying the kind, phase, source position, message,
/// and an optional recommendation, so callers only ever handle one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwineError {
    /// The rule category the error belongs to.
    pub kind: ErrorKind,
    /// The pipeline phase that raised the error.
    pub phase: Phase,
    /// Source position the error points at.
    pub pos: Pos,
    /// Human-readable description of the failure.
    pub message: String,
    /// Optional hint on how to fix the source.
    pub recommendation: Option<String>,
}

impl TwineError {
    /// Renders the full diagnostic report.
    ///
    /// The shape is fixed:
    ///
    /// ```text
    /// LEXICAL ERROR.
    /// While scanning, an error occurred on line 1, column 14.
    /// Reporting from the scanner:
    /// Integer literal exceeds the safe range.
    /// Recommendation: rewrite the literal as a bignumber: `#9007199254740993`.
    /// ```
    ///
    /// The recommendation line is omitted when there is none.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = format!("{} ERROR.\nWhile {}, an error occurred on line {}, column {}.\nReporting from the {}:\n{}",
                              self.kind,
                              self.phase,
                              self.pos.line,
                              self.pos.column,
                              self.kind.module(),
                              self.message);
        if let Some(rec) = &self.recommendation {
            out.push_str("\nRecommendation: ");
            out.push_str(rec);
        }
        out
    }

    /// Wraps an algebra-string parse error.
    ///
    /// The algebra parser shares the script parser's error type, but its
    /// failures are reported as `Algebraic` so hosts can tell a broken
    /// quoted expression apart from a broken script.
    #[must_use]
    pub fn algebraic(error: &SyntaxError) -> Self {
        Self { kind: ErrorKind::Algebraic,
               phase: Phase::Simplifying,
               pos: error.pos(),
               message: error.to_string(),
               recommendation: None }
    }
}

impl std::fmt::Display for TwineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report())
    }
}

impl std::error::Error for TwineError {}

impl From<SyntaxError> for TwineError {
    fn from(error: SyntaxError) -> Self {
        Self { kind: ErrorKind::Syntax,
               phase: Phase::Parsing,
               pos: error.pos(),
               message: error.to_string(),
               recommendation: None }
    }
}

impl From<ResolveError> for TwineError {
    fn from(error: ResolveError) -> Self {
        Self { kind: ErrorKind::Resolver,
               phase: Phase::Resolving,
               pos: error.pos(),
               message: error.to_string(),
               recommendation: error.recommendation() }
    }
}

impl From<RuntimeError> for TwineError {
    fn from(error: RuntimeError) -> Self {
        let kind = error.kind();
        let phase = if kind == ErrorKind::Algebraic {
            Phase::Simplifying
        } else {
            Phase::Interpreting
        };
        Self { kind,
               phase,
               pos: error.pos(),
               message: error.to_string(),
               recommendation: None }
    }
}
