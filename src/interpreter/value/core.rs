use std::{cell::RefCell, collections::HashMap, rc::Rc};

use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};

use crate::{
    algebra::{expr::AlgebraicExpression, infix},
    ast::FunctionDecl,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models every type that can appear in expressions,
/// assignments, function returns, and conditions. Aggregates share their
/// payload through `Rc`, so cloning a value never deep-copies a vector or
/// an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A double-precision floating-point number.
    Float(f64),
    /// A 64-bit integer, kept within the exactly-representable range by
    /// the lexer and checked arithmetic.
    Int(i64),
    /// A boolean, produced by comparisons and logical operators.
    Bool(bool),
    /// A string.
    Str(String),
    /// The absent value; also what missing call arguments bind to.
    Nil,
    /// An arbitrary-precision integer, from `#n` literals.
    BigInt(BigInt),
    /// An exact fraction over 64-bit components.
    Fraction(Rational64),
    /// An exact fraction over arbitrary-precision components.
    BigFraction(BigRational),
    /// A vector of values.
    Vector(Rc<Vec<Primitive>>),
    /// A row-major matrix of values.
    Matrix(Rc<Vec<Vec<Primitive>>>),
    /// A tuple of values.
    Tuple(Rc<Vec<Primitive>>),
    /// A function value: a declaration closed over its defining frame.
    Fn(Rc<FnValue>),
    /// A class value.
    Class(Rc<ClassValue>),
    /// A class instance: a field map plus its class.
    Instance(Rc<RefCell<InstanceValue>>),
    /// A canonical algebraic expression, so `simplify` results are
    /// first-class runtime values.
    Algebraic(Rc<AlgebraicExpression>),
}

/// A closure: a function declaration paired with the environment frame
/// that was active at its definition site.
#[derive(Debug, Clone, PartialEq)]
pub struct FnValue {
    /// The declaration being closed over.
    pub decl:           Rc<FunctionDecl>,
    /// Index of the defining frame in the environment arena.
    pub closure:        usize,
    /// `true` for a bound `init` method, which always yields the instance.
    pub is_initializer: bool,
}

/// A class: a name and its method table.
#[derive(Debug, PartialEq)]
pub struct ClassValue {
    /// The class name.
    pub name:    String,
    /// Methods by name; `init` is the constructor.
    pub methods: HashMap<String, Rc<FunctionDecl>>,
    /// Index of the frame the class was declared in; methods close over it.
    pub closure: usize,
}

/// An instance: its class and a single-level field map (no inheritance).
#[derive(Debug, PartialEq)]
pub struct InstanceValue {
    /// The instance's class.
    pub class:  Rc<ClassValue>,
    /// Fields set on this instance.
    pub fields: HashMap<String, Primitive>,
}

impl Primitive {
    /// `true` for the scalar numeric kinds.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self,
                 Self::Float(_)
                 | Self::Int(_)
                 | Self::Fraction(_)
                 | Self::BigInt(_)
                 | Self::BigFraction(_))
    }

    /// A short name for the value's type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::Nil => "nil",
            Self::BigInt(_) => "bignumber",
            Self::Fraction(_) => "fraction",
            Self::BigFraction(_) => "bigfraction",
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
            Self::Tuple(_) => "tuple",
            Self::Fn(_) => "function",
            Self::Class(_) => "class",
            Self::Instance(_) => "instance",
            Self::Algebraic(_) => "algebraic expression",
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Nil => write!(f, "nil"),
            Self::BigInt(v) => write!(f, "{v}"),
            Self::Fraction(v) => write!(f, "{}|{}", v.numer(), v.denom()),
            Self::BigFraction(v) => write!(f, "{}|{}", v.numer(), v.denom()),
            Self::Vector(elements) => {
                let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            },
            Self::Matrix(rows) => {
                let parts: Vec<String> =
                    rows.iter()
                        .map(|row| {
                            let cells: Vec<String> =
                                row.iter().map(ToString::to_string).collect();
                            format!("[{}]", cells.join(", "))
                        })
                        .collect();
                write!(f, "[{}]", parts.join(", "))
            },
            Self::Tuple(elements) => {
                let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            },
            Self::Fn(fun) => write!(f, "<fn {}>", fun.decl.name),
            Self::Class(class) => write!(f, "<class {}>", class.name),
            Self::Instance(instance) => {
                write!(f, "<{} instance>", instance.borrow().class.name)
            },
            Self::Algebraic(expr) => write!(f, "{}", infix::render_algebraic(expr)),
        }
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<Self>> for Primitive {
    fn from(value: Vec<Self>) -> Self {
        Self::Vector(Rc::new(value))
    }
}
