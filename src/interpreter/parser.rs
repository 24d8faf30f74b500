/// Parser state, binding powers, and the program entry point.
///
/// Declares the explicit `ParserState` threaded through every parsing
/// function, the binding-power table that drives the Pratt expression
/// loop, and `parse_program`, the statement-list entry point.
pub mod core;
/// Expression parsing.
///
/// Prefix parselets for every literal and head token, the Pratt loop with
/// infix/postfix handling, and the implicit-multiplication rule that turns
/// `2x` and `3(x+1)` into explicit products.
pub mod expression;
/// Statement parsing.
///
/// Declarations (`let`, `var`, `fn`, `class`) and control flow (`if`,
/// `while`, `for`, `return`, `print`, blocks), including the `for` loop's
/// desugaring into a block around a `while`.
pub mod statement;
