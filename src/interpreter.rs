/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens,
/// each corresponding to a meaningful language element such as a numeric
/// literal, identifier, operator, delimiter, or keyword. This is the first
/// stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source positions.
/// - Handles the numeric literal family: integers, floats, scientific
///   notation, fractions, bignumbers, bigfractions, and radix literals.
/// - Captures single-quoted algebraic strings verbatim for the algebra
///   parser.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser is a Pratt (precedence-climbing) expression parser with a
/// statement grammar on top. A binding-power table drives infix operators;
/// implicit multiplication gets its own level so `2x` and `3(x+1)` parse
/// as products.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting the first error with location info.
/// - Desugars `for` loops and single-expression function bodies.
pub mod parser;
/// The resolver module statically binds names to scope depths.
///
/// A single pass over the AST runs before interpretation, mapping each
/// resolvable expression to the number of frames between its use site and
/// its declaration, and rejecting invalid scoping outright.
///
/// # Responsibilities
/// - Computes the depth table the evaluator's `get_at`/`assign_at` use.
/// - Rejects self-referential initializers and duplicate declarations.
/// - Rejects misplaced `return`, `this`, and `super`.
pub mod resolver;
/// The environment module stores variable bindings.
///
/// Scope frames live in an arena addressed by index; each frame maps names
/// to values, remembers which names are mutable, and points at its parent.
///
/// # Responsibilities
/// - Dynamic lookup and assignment walking enclosing frames.
/// - Direct `get_at`/`assign_at` access for resolver-recorded depths.
/// - Environment errors for undefined names and immutable assignment.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs arithmetic and logical operations, manages variable state, and
/// produces results. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Handles closures, classes, control flow, and native calls.
/// - Reports runtime errors such as division by zero or bad indexing.
pub mod evaluator;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares all the value types used during interpretation:
/// numbers across the exact/inexact tower, booleans, strings, vectors,
/// matrices, tuples, functions, classes, instances, and first-class
/// algebraic expressions.
///
/// # Responsibilities
/// - Defines the `Primitive` enum and all supported value variants.
/// - Implements numeric promotion, arithmetic, and comparison.
/// - Provides stringification for `print` and the REPL log.
pub mod value;
