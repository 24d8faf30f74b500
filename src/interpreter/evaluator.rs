/// The tree-walking evaluator.
///
/// Declares the `Interpreter`, its statement/expression dispatch, the
/// `Flow` control signal that models `return`, and the print sink.
pub mod core;
/// Binary operations over structured values.
///
/// String concatenation, vector and matrix arithmetic (element-wise,
/// scalar scaling, dot products, matrix multiplication), and the
/// relational operators; scalar pairs fall through to the numeric tower.
pub mod binary;
/// Native function dispatch.
///
/// The fixed table of built-in functions: trigonometry, logarithms,
/// rounding, integer gcd/lcm, max/min, and the algebraic natives
/// `simplify`, `deriv`, and `subex`.
pub mod native;
