use crate::interpreter::lexer::Pos;

/// Represents all scoping violations found by the static resolver.
///
/// Resolution runs to completion before any code executes, so each of these
/// is reported without side effects from the program itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A variable's initializer reads the variable being declared.
    SelfReference {
        /// The variable name.
        name: String,
        /// Where the read occurred.
        pos:  Pos,
    },
    /// Two declarations of the same name in one scope.
    DuplicateDeclaration {
        /// The redeclared name.
        name: String,
        /// Where the second declaration occurred.
        pos:  Pos,
    },
    /// A `return` statement outside any function body.
    ReturnOutsideFunction {
        /// Where the `return` occurred.
        pos: Pos,
    },
    /// A `return <value>` inside an `init` constructor.
    ReturnFromInitializer {
        /// Where the `return` occurred.
        pos: Pos,
    },
    /// A `this` expression outside a class body.
    ThisOutsideClass {
        /// Where the `this` occurred.
        pos: Pos,
    },
    /// A `super` expression; classes are single-level, so there is never a
    /// superclass to refer to.
    SuperWithoutSuperclass {
        /// Where the `super` occurred.
        pos: Pos,
    },
}

impl ResolveError {
    /// The source position the error points at.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::SelfReference { pos, .. }
            | Self::DuplicateDeclaration { pos, .. }
            | Self::ReturnOutsideFunction { pos }
            | Self::ReturnFromInitializer { pos }
            | Self::ThisOutsideClass { pos }
            | Self::SuperWithoutSuperclass { pos } => *pos,
        }
    }

    /// A hint on how to repair the source, when one exists.
    #[must_use]
    pub fn recommendation(&self) -> Option<String> {
        match self {
            Self::SelfReference { name, .. } => {
                Some(format!("initialize '{name}' from a different expression, then reassign it."))
            },
            Self::ReturnFromInitializer { .. } => {
                Some("constructors always return the new instance; drop the return value.".to_string())
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfReference { name, .. } => {
                write!(f, "Cannot read variable '{name}' in its own initializer.")
            },

            Self::DuplicateDeclaration { name, .. } => {
                write!(f, "A variable named '{name}' already exists in this scope.")
            },

            Self::ReturnOutsideFunction { .. } => {
                write!(f, "Cannot return from top-level code.")
            },

            Self::ReturnFromInitializer { .. } => {
                write!(f, "Cannot return a value from an initializer.")
            },

            Self::ThisOutsideClass { .. } => {
                write!(f, "Cannot use 'this' outside of a class.")
            },

            Self::SuperWithoutSuperclass { .. } => {
                write!(f, "Cannot use 'super': classes have no superclass.")
            },
        }
    }
}

impl std::error::Error for ResolveError {}
