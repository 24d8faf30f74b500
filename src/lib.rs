//! # twine
//!
//! Twine is an embedded expression and scripting language for diagramming
//! hosts. It evaluates algebraic strings and small scripts: a lexer, a
//! Pratt parser, a static resolver, a tree-walking interpreter with
//! lexical scoping, closures, and classes, and a symbolic-algebra
//! simplifier with a canonical total ordering over expressions.
//!
//! The pipeline is synchronous and single-threaded. Each execution builds
//! a fresh environment; nothing is shared between runs, and the only
//! non-termination guard is an optional loop-iteration ceiling.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::TwineError,
    interpreter::{
        evaluator::core::{Interpreter, Sink},
        lexer::scan,
        parser::core::parse_program,
        resolver::resolve,
        value::core::Primitive,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Statement` and `Expr` enums that represent
/// the syntactic structure of source code as a tree. The AST is built by
/// the parser and traversed by the resolver, the evaluator, and the
/// renderers; operations on nodes are external functions over the tagged
/// unions, not methods on a class hierarchy.
pub mod ast;
/// Provides unified error types for every phase.
///
/// Each phase has its own error enum with source positions; all of them
/// convert into the uniform `TwineError`, which carries a kind, phase,
/// position, message, and optional recommendation, and renders the fixed
/// report format hosts display.
pub mod error;
/// Orchestrates the process of script execution.
///
/// This module ties together lexing, parsing, resolution, evaluation,
/// value representations, and error handling to provide a complete runtime
/// for source code evaluation.
pub mod interpreter;
/// The symbolic-algebra subsystem.
///
/// A dedicated grammar parses single-quoted algebraic strings into
/// `AlgebraicExpression` trees; automatic simplification rewrites them to
/// canonical form under a strict total order; LaTeX and infix renderers
/// produce display strings without mutating what they render.
pub mod algebra;
/// General utilities for safe numeric conversion.
///
/// Checked conversions between `i64`, `usize`, and `f64` around the
/// `2^53 - 1` safe-integer bound, and the shared gcd.
pub mod util;

/// A configured execution of one source string.
///
/// The engine is the boundary surface consumed by hosts: feed it a script
/// or an algebraic string, then either [`Engine::execute`] for a value or
/// [`Engine::log`] for the ordered print log of a REPL-style session.
///
/// # Examples
/// ```
/// use twine::{Engine, interpreter::value::core::Primitive};
///
/// let result = Engine::new("let x = 1|2; x + 1|2;").execute();
/// assert_eq!(result.unwrap(), Primitive::Int(1));
///
/// // 'x' is not defined anywhere: the error is a formatted diagnostic.
/// let result = Engine::new("let y = x + 1;").execute();
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    source: String,
    max_iterations: Option<usize>,
}

impl Engine {
    /// Creates an engine over a source string.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(),
               max_iterations: None }
    }

    /// Caps every loop at `limit` iterations.
    ///
    /// This is the sole non-termination guard; without it, loops are
    /// unbounded and callers needing bounded execution must set it before
    /// invoking the engine.
    #[must_use]
    pub const fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// Runs the source and returns its final value.
    ///
    /// `print` output goes to the console. The final value is that of the
    /// last expression statement, `nil` otherwise.
    ///
    /// # Errors
    /// The first error from any phase, as a uniform `TwineError`.
    pub fn execute(&self) -> Result<Primitive, TwineError> {
        self.run(Sink::Console).map(|(value, _)| value)
    }

    /// Runs the source and returns the ordered list of printed strings.
    ///
    /// On any error the result is a single element: the formatted
    /// diagnostic report. Partial output is never returned.
    #[must_use]
    pub fn log(&self) -> Vec<String> {
        match self.run(Sink::Log(Vec::new())) {
            Ok((_, interpreter)) => interpreter.take_log(),
            Err(error) => vec![error.report()],
        }
    }

    /// The shared pipeline: scan, parse, resolve, interpret.
    ///
    /// Resolution must fully succeed before interpretation begins; every
    /// phase short-circuits on its first error.
    fn run(&self, sink: Sink) -> Result<(Primitive, Interpreter), TwineError> {
        let tokens = scan(&self.source)?;
        let program = parse_program(&tokens)?;
        let locals = resolve(&program)?;

        let mut interpreter = Interpreter::new(locals, sink, self.max_iterations);
        let value = interpreter.interpret(&program)?;
        Ok((value, interpreter))
    }
}
