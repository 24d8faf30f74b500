use crate::{error::ErrorKind, interpreter::lexer::Pos};

/// Represents all errors that can occur during evaluation.
///
/// Environment failures (undefined names, writes to immutable bindings) are
/// folded into this enum but keep their own [`ErrorKind`] so reports can
/// distinguish a scoping mistake from a computational one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Tried to read a name that is not bound anywhere.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source position where the read occurred.
        pos:  Pos,
    },
    /// Tried to assign to a binding declared with `let`.
    AssignToImmutable {
        /// The name of the binding.
        name: String,
        /// The source position where the write occurred.
        pos:  Pos,
    },
    /// Read a property that the instance does not have.
    UndefinedProperty {
        /// The property name.
        name: String,
        /// The source position where the access occurred.
        pos:  Pos,
    },
    /// Accessed a property on a value that is not an instance.
    NotAnInstance {
        /// The source position where the access occurred.
        pos: Pos,
    },
    /// Called a value that is neither a function nor a class.
    NotCallable {
        /// The source position of the call.
        pos: Pos,
    },
    /// A call supplied more arguments than the function has parameters.
    TooManyArguments {
        /// The callee's parameter count.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source position of the call.
        pos:      Pos,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source position where the operation occurred.
        pos:     Pos,
    },
    /// Division or remainder by zero.
    DivisionByZero {
        /// The source position of the operation.
        pos: Pos,
    },
    /// Integer arithmetic overflowed.
    Overflow {
        /// The source position of the operation.
        pos: Pos,
    },
    /// Raising a fraction to a non-integer power.
    FractionalExponent {
        /// The source position of the operation.
        pos: Pos,
    },
    /// An index was negative, fractional, or past the end.
    IndexOutOfBounds {
        /// Details about the index and the collection size.
        details: String,
        /// The source position of the indexing expression.
        pos:     Pos,
    },
    /// Indexed a value that is not a vector, matrix, or tuple.
    NotIndexable {
        /// The source position of the indexing expression.
        pos: Pos,
    },
    /// Vector or matrix operands with incompatible shapes.
    ShapeMismatch {
        /// Details about the two shapes.
        details: String,
        /// The source position of the operation.
        pos:     Pos,
    },
    /// A condition expression did not evaluate to a boolean.
    ExpectedBoolean {
        /// The source position of the condition.
        pos: Pos,
    },
    /// A numeric value was expected, but not found.
    ExpectedNumber {
        /// The source position of the operation.
        pos: Pos,
    },
    /// A loop ran past the configured iteration ceiling.
    IterationLimit {
        /// The configured ceiling.
        limit: usize,
        /// The source position of the loop.
        pos:   Pos,
    },
    /// A native function was called with arguments it cannot accept.
    InvalidNativeArgument {
        /// The native function name.
        name:    String,
        /// Details about the rejected argument.
        details: String,
        /// The source position of the call.
        pos:     Pos,
    },
    /// A quoted algebraic string failed to parse during evaluation.
    MalformedAlgebra {
        /// The underlying diagnostic.
        message: String,
        /// The source position of the quoted string.
        pos:     Pos,
    },
}

impl RuntimeError {
    /// The source position the error points at.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::UndefinedVariable { pos, .. }
            | Self::AssignToImmutable { pos, .. }
            | Self::UndefinedProperty { pos, .. }
            | Self::NotAnInstance { pos }
            | Self::NotCallable { pos }
            | Self::TooManyArguments { pos, .. }
            | Self::TypeError { pos, .. }
            | Self::DivisionByZero { pos }
            | Self::Overflow { pos }
            | Self::FractionalExponent { pos }
            | Self::IndexOutOfBounds { pos, .. }
            | Self::NotIndexable { pos }
            | Self::ShapeMismatch { pos, .. }
            | Self::ExpectedBoolean { pos }
            | Self::ExpectedNumber { pos }
            | Self::IterationLimit { pos, .. }
            | Self::InvalidNativeArgument { pos, .. }
            | Self::MalformedAlgebra { pos, .. } => *pos,
        }
    }

    /// Whether this failure is an environment error or a general runtime one.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UndefinedVariable { .. } | Self::AssignToImmutable { .. } => {
                ErrorKind::Environment
            },
            Self::MalformedAlgebra { .. } => ErrorKind::Algebraic,
            _ => ErrorKind::Runtime,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, .. } => {
                write!(f, "Undefined variable '{name}'.")
            },

            Self::AssignToImmutable { name, .. } => {
                write!(f, "Cannot assign to '{name}': it was declared immutable with 'let'.")
            },

            Self::UndefinedProperty { name, .. } => {
                write!(f, "Undefined property '{name}'.")
            },

            Self::NotAnInstance { .. } => {
                write!(f, "Only instances have properties.")
            },

            Self::NotCallable { .. } => {
                write!(f, "Can only call functions and classes.")
            },

            Self::TooManyArguments { expected, found, .. } => {
                write!(f, "Expected at most {expected} arguments but got {found}.")
            },

            Self::TypeError { details, .. } => {
                write!(f, "Type error: {details}.")
            },

            Self::DivisionByZero { .. } => {
                write!(f, "Division by zero.")
            },

            Self::Overflow { .. } => {
                write!(f, "Integer arithmetic overflowed.")
            },

            Self::FractionalExponent { .. } => {
                write!(f, "A fraction base requires an integer exponent.")
            },

            Self::IndexOutOfBounds { details, .. } => {
                write!(f, "Index out of bounds: {details}.")
            },

            Self::NotIndexable { .. } => {
                write!(f, "Only vectors, matrices, and tuples can be indexed.")
            },

            Self::ShapeMismatch { details, .. } => {
                write!(f, "Shape mismatch: {details}.")
            },

            Self::ExpectedBoolean { .. } => {
                write!(f, "Condition must evaluate to a boolean.")
            },

            Self::ExpectedNumber { .. } => {
                write!(f, "A numeric value was expected.")
            },

            Self::IterationLimit { limit, .. } => {
                write!(f, "Loop exceeded the iteration ceiling of {limit}.")
            },

            Self::InvalidNativeArgument { name, details, .. } => {
                write!(f, "Invalid argument to '{name}': {details}.")
            },

            Self::MalformedAlgebra { message, .. } => {
                write!(f, "{message}")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
