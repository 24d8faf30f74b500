use ordered_float::OrderedFloat;

/// A node in the algebraic expression tree.
///
/// Atoms are integers, reals, symbols, and named constants; compounds carry
/// an ordered operand list. Structural equality (`==`) is operator-tag
/// equality plus order-sensitive pairwise operand equality, which is what
/// the simplifier and the total order build on.
///
/// Trees are never mutated in place: the simplifier always returns new
/// trees, so shared subtrees stay valid.
#[derive(Debug, Clone, PartialEq)]
pub enum AlgebraicExpression {
    /// An integer atom.
    Int(i64),
    /// A real (floating-point) atom.
    Real(OrderedFloat<f64>),
    /// A symbol, such as `x`.
    Sym(String),
    /// A named constant. `value: None` is the `Undefined` sentinel, with the
    /// name carrying its diagnostic note.
    Constant {
        /// The constant's name, or the diagnostic note for `Undefined`.
        name:  String,
        /// The constant's numeric value; `None` marks `Undefined`.
        value: Option<OrderedFloat<f64>>,
    },
    /// A rational number atom `n/d`. The denominator is kept non-negative;
    /// the sign lives on the numerator.
    Fraction(i64, i64),
    /// A sum of two or more operands.
    Sum(Vec<AlgebraicExpression>),
    /// A product of two or more operands.
    Product(Vec<AlgebraicExpression>),
    /// A power `base ^ exponent`.
    Power {
        /// The base.
        base:     Box<AlgebraicExpression>,
        /// The exponent.
        exponent: Box<AlgebraicExpression>,
    },
    /// A difference: `[a, b]` is `a - b`, `[a]` is `-a`. Rewritten away by
    /// simplification.
    Difference(Vec<AlgebraicExpression>),
    /// A quotient `a / b`. Rewritten away by simplification.
    Quotient(Box<AlgebraicExpression>, Box<AlgebraicExpression>),
    /// A factorial `a!`.
    Factorial(Box<AlgebraicExpression>),
    /// A named function application, such as `sin(x)` or `f(x, y)`.
    Func {
        /// The function's name.
        name: String,
        /// The arguments, in order.
        args: Vec<AlgebraicExpression>,
    },
}

impl AlgebraicExpression {
    /// Builds an integer atom.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Int(value)
    }

    /// Builds a real atom.
    #[must_use]
    pub fn real(value: f64) -> Self {
        Self::Real(OrderedFloat(value))
    }

    /// Builds a symbol atom.
    #[must_use]
    pub fn sym(name: &str) -> Self {
        Self::Sym(name.to_string())
    }

    /// Builds a fraction atom. Not normalized; the simplifier reduces it.
    #[must_use]
    pub const fn fraction(numerator: i64, denominator: i64) -> Self {
        Self::Fraction(numerator, denominator)
    }

    /// Builds a sum.
    #[must_use]
    pub fn sum(operands: Vec<Self>) -> Self {
        Self::Sum(operands)
    }

    /// Builds a product.
    #[must_use]
    pub fn product(operands: Vec<Self>) -> Self {
        Self::Product(operands)
    }

    /// Builds a power.
    #[must_use]
    pub fn power(base: Self, exponent: Self) -> Self {
        Self::Power { base:     Box::new(base),
                      exponent: Box::new(exponent), }
    }

    /// Builds a factorial.
    #[must_use]
    pub fn factorial(operand: Self) -> Self {
        Self::Factorial(Box::new(operand))
    }

    /// Builds a function application.
    #[must_use]
    pub fn func(name: &str, args: Vec<Self>) -> Self {
        Self::Func { name: name.to_string(),
                     args }
    }

    /// Builds the `Undefined` sentinel, with a note describing why the
    /// value is undefined. `Undefined` is a value, not an error: the
    /// simplifier propagates it structurally and never panics or throws.
    #[must_use]
    pub fn undefined(note: &str) -> Self {
        Self::Constant { name:  note.to_string(),
                         value: None, }
    }

    /// `true` when this node is the `Undefined` sentinel.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Constant { value: None, .. })
    }

    /// `true` when this node is a numeric zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(0) => true,
            Self::Fraction(0, _) => true,
            Self::Real(r) => r.0 == 0.0,
            _ => false,
        }
    }

    /// `true` when this node is a numeric one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        match self {
            Self::Int(1) => true,
            Self::Real(r) => r.0 == 1.0,
            Self::Fraction(n, d) => n == d && *d != 0,
            _ => false,
        }
    }

    /// `true` for the numeric atoms: integers, fractions, and reals.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Fraction(_, _) | Self::Real(_))
    }

    /// The numeric value of an atom, when it has one.
    ///
    /// Used by the total order to compare numeric atoms by value and by the
    /// power rules to test exponent signs.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Fraction(n, d) => Some(*n as f64 / *d as f64),
            Self::Real(r) => Some(r.0),
            _ => None,
        }
    }

    /// Replaces every subtree structurally equal to `target` with
    /// `replacement`, returning a new tree.
    #[must_use]
    pub fn substitute(&self, target: &Self, replacement: &Self) -> Self {
        if self == target {
            return replacement.clone();
        }
        let recurse = |e: &Self| e.substitute(target, replacement);
        match self {
            Self::Sum(ops) => Self::Sum(ops.iter().map(recurse).collect()),
            Self::Product(ops) => Self::Product(ops.iter().map(recurse).collect()),
            Self::Difference(ops) => Self::Difference(ops.iter().map(recurse).collect()),
            Self::Power { base, exponent } => {
                Self::Power { base:     Box::new(recurse(base)),
                              exponent: Box::new(recurse(exponent)), }
            },
            Self::Quotient(numer, denom) => {
                Self::Quotient(Box::new(recurse(numer)), Box::new(recurse(denom)))
            },
            Self::Factorial(operand) => Self::Factorial(Box::new(recurse(operand))),
            Self::Func { name, args } => Self::Func { name: name.clone(),
                                                      args: args.iter()
                                                                .map(recurse)
                                                                .collect(), },
            _ => self.clone(),
        }
    }
}
