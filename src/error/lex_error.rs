use crate::util::num::MAX_SAFE_INT;

/// Represents all errors that can occur while scanning source text.
///
/// `LexError` carries no source position of its own; the scanner attaches
/// line and column when it converts the error into a diagnostic, because the
/// position of a failed token is only known at the scan loop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexError {
    /// A character that no token rule recognizes.
    #[default]
    UnknownCharacter,
    /// A double-quoted string was never closed.
    UnterminatedString,
    /// A single-quoted algebraic string was never closed.
    UnterminatedAlgebraicString,
    /// A digit separator `_` was not used in exact groups of three digits.
    MisplacedSeparator,
    /// An integer literal exceeds the exactly-representable range.
    IntegerTooLarge {
        /// The offending literal text, used to suggest the `#` rewrite.
        literal: String,
    },
    /// A scientific-notation exponent is outside the representable range.
    ExponentOutOfRange,
    /// A numeric literal failed to parse after separator validation.
    MalformedNumber,
}

impl LexError {
    /// A hint on how to repair the source, when one exists.
    #[must_use]
    pub fn recommendation(&self) -> Option<String> {
        match self {
            Self::IntegerTooLarge { literal } => {
                Some(format!("rewrite the literal as a bignumber: `#{literal}`."))
            },
            Self::MisplacedSeparator => {
                Some("digit separators must split the literal into groups of exactly three digits, as in `1_000_000`.".to_string())
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCharacter => {
                write!(f, "Unrecognized character.")
            },

            Self::UnterminatedString => {
                write!(f, "Unterminated string literal.")
            },

            Self::UnterminatedAlgebraicString => {
                write!(f, "Unterminated algebraic string.")
            },

            Self::MisplacedSeparator => {
                write!(f, "Digit separators are only legal in exact groups of three digits.")
            },

            Self::IntegerTooLarge { .. } => {
                write!(f,
                       "Integer literal exceeds the largest safe integer ({MAX_SAFE_INT}).")
            },

            Self::ExponentOutOfRange => {
                write!(f, "Scientific-notation exponent is out of range.")
            },

            Self::MalformedNumber => {
                write!(f, "Malformed numeric literal.")
            },
        }
    }
}

impl std::error::Error for LexError {}
