/// The `Primitive` runtime value and its payload types.
///
/// Declares every value the interpreter can produce, from numbers and
/// strings through vectors, matrices, closures, classes, instances, and
/// first-class algebraic expressions.
pub mod core;
/// Scalar numeric operations across the value tower.
///
/// Promotion between integers, floats, fractions, bignumbers, and
/// bigfractions, plus the fraction-aware arithmetic, comparison, and
/// negation the evaluator builds on.
pub mod numeric;
