use crate::interpreter::lexer::Pos;

/// Represents all errors that can occur while parsing tokens into an AST.
///
/// The parser aborts at the first error; every variant therefore describes
/// exactly one failure at one source position.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    /// Found a token that cannot start or continue the current construct.
    UnexpectedToken {
        /// A rendering of the offending token.
        token: String,
        /// Where the token was found.
        pos:   Pos,
    },
    /// Reached the end of input while a construct was still open.
    UnexpectedEndOfInput {
        /// The last known position.
        pos: Pos,
    },
    /// A specific token was required but something else was found.
    ExpectedToken {
        /// Description of the expected token.
        expected: String,
        /// A rendering of the token actually found.
        found:    String,
        /// Where the mismatch occurred.
        pos:      Pos,
    },
    /// The left side of an `=` is not a variable or member access.
    InvalidAssignmentTarget {
        /// Where the assignment occurred.
        pos: Pos,
    },
    /// An expression statement was not terminated with `;`.
    MissingSemicolon {
        /// Where the statement ended.
        pos: Pos,
    },
    /// A matrix literal whose rows have differing lengths.
    RaggedMatrix {
        /// Where the matrix literal started.
        pos: Pos,
    },
    /// A parameter list declared the same name twice.
    DuplicateParameter {
        /// The repeated parameter name.
        name: String,
        /// Where the parameter list occurred.
        pos:  Pos,
    },
    /// A native function name was used where an identifier is required.
    ReservedName {
        /// The reserved name.
        name: String,
        /// Where the name was used.
        pos:  Pos,
    },
}

impl SyntaxError {
    /// The source position the error points at.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::UnexpectedToken { pos, .. }
            | Self::UnexpectedEndOfInput { pos }
            | Self::ExpectedToken { pos, .. }
            | Self::InvalidAssignmentTarget { pos }
            | Self::MissingSemicolon { pos }
            | Self::RaggedMatrix { pos }
            | Self::DuplicateParameter { pos, .. }
            | Self::ReservedName { pos, .. } => *pos,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, .. } => {
                write!(f, "Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { .. } => {
                write!(f, "Unexpected end of input.")
            },

            Self::ExpectedToken { expected, found, .. } => {
                write!(f, "Expected {expected}, found {found}.")
            },

            Self::InvalidAssignmentTarget { .. } => {
                write!(f, "Invalid assignment target.")
            },

            Self::MissingSemicolon { .. } => {
                write!(f, "Expected ';' after expression statement.")
            },

            Self::RaggedMatrix { .. } => {
                write!(f, "Matrix rows must all have the same length.")
            },

            Self::DuplicateParameter { name, .. } => {
                write!(f, "Parameter '{name}' is declared more than once.")
            },

            Self::ReservedName { name, .. } => {
                write!(f, "'{name}' is a native function name and cannot be redeclared.")
            },
        }
    }
}

impl std::error::Error for SyntaxError {}
