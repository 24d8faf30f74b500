use std::{cell::RefCell, collections::HashMap, rc::Rc};

use num_rational::{BigRational, Rational64};
use num_traits::Zero;

use crate::{
    algebra::{parser::parse_algebraic, simplify::simplify},
    ast::{Expr, FunctionDecl, LogicalOperator, NodeId, Statement, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::{binary, native},
        lexer::Pos,
        value::{
            core::{ClassValue, FnValue, InstanceValue, Primitive},
            numeric,
        },
    },
    util::num::f64_to_i64_checked,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The control signal threaded through statement execution.
///
/// `return` is not an exception: every statement reports whether it ran
/// normally or is unwinding a `return`, and the call boundary is the only
/// place that consumes the `Return` case.
#[derive(Debug)]
pub enum Flow {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` is unwinding to the nearest call boundary.
    Return(Primitive),
}

/// Where `print` output goes.
///
/// Chosen per interpreter instance, not through global state: REPL-style
/// hosts collect lines, direct execution writes to the console.
#[derive(Debug)]
pub enum Sink {
    /// Write each printed value straight to stdout.
    Console,
    /// Accumulate printed values for the host to collect afterwards.
    Log(Vec<String>),
}

/// The tree-walking evaluator.
///
/// Holds the environment arena, the resolver's depth table, the active
/// frame, the print sink, and the optional loop-iteration ceiling. A fresh
/// interpreter is built per execution; nothing is shared across runs.
pub struct Interpreter {
    env: Environment,
    current: usize,
    locals: HashMap<NodeId, usize>,
    sink: Sink,
    max_iterations: Option<usize>,
}

impl Interpreter {
    /// Creates an interpreter from a resolver table.
    ///
    /// `max_iterations` is the only non-termination guard: `None` leaves
    /// loops unbounded.
    #[must_use]
    pub fn new(locals: HashMap<NodeId, usize>,
               sink: Sink,
               max_iterations: Option<usize>)
               -> Self {
        Self { env: Environment::new(),
               current: Environment::GLOBAL,
               locals,
               sink,
               max_iterations }
    }

    /// Executes a resolved program and returns its final value.
    ///
    /// The final value is that of the last expression statement, `nil`
    /// when the program ends with a declaration or control-flow statement.
    ///
    /// # Errors
    /// The first `RuntimeError` raised; execution stops immediately.
    pub fn interpret(&mut self, program: &[Statement]) -> EvalResult<Primitive> {
        let mut last = Primitive::Nil;
        for statement in program {
            if let Statement::Expression { expr } = statement {
                last = self.evaluate(expr)?;
            } else {
                self.execute(statement)?;
            }
        }
        Ok(last)
    }

    /// Consumes the interpreter and yields the accumulated print log.
    #[must_use]
    pub fn take_log(self) -> Vec<String> {
        match self.sink {
            Sink::Console => Vec::new(),
            Sink::Log(lines) => lines,
        }
    }

    /// Calls a callable primitive with already-evaluated arguments.
    ///
    /// This is the boundary used by plotting and layout collaborators:
    /// they hold a `Primitive::Fn` produced by a script and sample it
    /// across a domain without ever seeing tokens, AST, or the resolver
    /// table.
    ///
    /// # Errors
    /// `NotCallable` for values that are neither functions nor classes,
    /// plus whatever the body raises.
    pub fn call_value(&mut self,
                      callee: &Primitive,
                      arguments: Vec<Primitive>,
                      pos: Pos)
                      -> EvalResult<Primitive> {
        match callee {
            Primitive::Fn(fun) => self.call_function(fun, arguments, pos),
            Primitive::Class(class) => self.instantiate(class, arguments, pos),
            _ => Err(RuntimeError::NotCallable { pos }),
        }
    }

    fn execute(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            },

            Statement::Print { expr, .. } => {
                let value = self.evaluate(expr)?;
                match &mut self.sink {
                    Sink::Console => println!("{value}"),
                    Sink::Log(lines) => lines.push(value.to_string()),
                }
                Ok(Flow::Normal)
            },

            Statement::Variable { name, initializer, mutable, .. } => {
                let value = self.evaluate(initializer)?;
                self.env.define(self.current, name, value, *mutable);
                Ok(Flow::Normal)
            },

            Statement::Function(decl) => {
                let fun = FnValue { decl:           Rc::clone(decl),
                                    closure:        self.current,
                                    is_initializer: false, };
                self.env
                    .define(self.current, &decl.name, Primitive::Fn(Rc::new(fun)), false);
                Ok(Flow::Normal)
            },

            Statement::Class { name, methods, .. } => {
                let table = methods.iter()
                                   .map(|method| (method.name.clone(), Rc::clone(method)))
                                   .collect();
                let class = ClassValue { name:    name.clone(),
                                         methods: table,
                                         closure: self.current, };
                self.env
                    .define(self.current, name, Primitive::Class(Rc::new(class)), false);
                Ok(Flow::Normal)
            },

            Statement::Block { statements, .. } => {
                let frame = self.env.push_frame(self.current);
                self.execute_block(statements, frame)
            },

            Statement::If { condition, then_branch, else_branch, .. } => {
                if self.evaluate_condition(condition)? {
                    self.execute(then_branch)
                } else if let Some(branch) = else_branch {
                    self.execute(branch)
                } else {
                    Ok(Flow::Normal)
                }
            },

            Statement::While { condition, body, pos } => {
                let mut iterations: usize = 0;
                while self.evaluate_condition(condition)? {
                    if let Some(limit) = self.max_iterations {
                        iterations += 1;
                        if iterations > limit {
                            return Err(RuntimeError::IterationLimit { limit, pos: *pos });
                        }
                    }
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            },

            Statement::Return { value, .. } => {
                let result = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Primitive::Nil,
                };
                Ok(Flow::Return(result))
            },
        }
    }

    /// Runs `statements` inside `frame`, restoring the caller's frame on
    /// every exit path.
    fn execute_block(&mut self, statements: &[Statement], frame: usize) -> EvalResult<Flow> {
        let previous = self.current;
        self.current = frame;
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {},
                other => {
                    self.current = previous;
                    return other;
                },
            }
        }
        self.current = previous;
        Ok(Flow::Normal)
    }

    fn evaluate_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        let value = self.evaluate(condition)?;
        as_bool(&value, condition.pos())
    }

    #[allow(clippy::too_many_lines)]
    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Primitive> {
        match expr {
            Expr::Int { value, .. } => Ok(Primitive::Int(*value)),
            Expr::Float { value, .. } => Ok(Primitive::Float(*value)),
            Expr::Bool { value, .. } => Ok(Primitive::Bool(*value)),
            Expr::Str { value, .. } => Ok(Primitive::Str(value.clone())),
            Expr::Nil { .. } => Ok(Primitive::Nil),
            Expr::Constant { value, .. } => Ok(Primitive::Float(*value)),

            Expr::Fraction { numerator, denominator, pos } => {
                if *denominator == 0 {
                    return Err(RuntimeError::DivisionByZero { pos: *pos });
                }
                Ok(numeric::shrink_fraction(Rational64::new(*numerator, *denominator)))
            },
            Expr::BigNum { value, .. } => Ok(Primitive::BigInt(value.clone())),
            Expr::BigFraction { numerator, denominator, pos } => {
                if denominator.is_zero() {
                    return Err(RuntimeError::DivisionByZero { pos: *pos });
                }
                Ok(numeric::shrink_big_rational(BigRational::new(numerator.clone(),
                                                                 denominator.clone())))
            },

            Expr::Variable { name, id, pos } => self.lookup(name, *id, *pos),

            Expr::Assign { name, id, value, pos } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&depth) => {
                        self.env
                            .assign_at(self.current, depth, name, value.clone(), *pos)?;
                    },
                    None => {
                        self.env
                            .assign(Environment::GLOBAL, name, value.clone(), *pos)?;
                    },
                }
                Ok(value)
            },

            Expr::Binary { left, op, right, pos } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary::binary(*op, &left, &right, *pos)
            },

            Expr::Relational { left, op, right, pos } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary::relational(*op, &left, &right, *pos)
            },

            Expr::Logical { left, op, right, .. } => {
                let first = self.evaluate_condition(left)?;
                let short_circuit = match op {
                    LogicalOperator::And => !first,
                    LogicalOperator::Or => first,
                };
                if short_circuit {
                    return Ok(Primitive::Bool(first));
                }
                let second = self.evaluate_condition(right)?;
                Ok(Primitive::Bool(second))
            },

            Expr::Unary { op, expr: inner, pos } => {
                let value = self.evaluate(inner)?;
                match op {
                    UnaryOperator::Negate => numeric::negate(&value, *pos),
                    UnaryOperator::Not => Ok(Primitive::Bool(!as_bool(&value, *pos)?)),
                }
            },

            Expr::Group { expr: inner, .. } => self.evaluate(inner),

            Expr::Tuple { elements, .. } => {
                let values = self.evaluate_all(elements)?;
                Ok(Primitive::Tuple(Rc::new(values)))
            },
            Expr::Vector { elements, .. } => {
                let values = self.evaluate_all(elements)?;
                Ok(Primitive::Vector(Rc::new(values)))
            },
            Expr::Matrix { rows, .. } => {
                let mut values = Vec::with_capacity(rows.len());
                for row in rows {
                    values.push(self.evaluate_all(row)?);
                }
                Ok(Primitive::Matrix(Rc::new(values)))
            },

            Expr::Index { target, index, pos } => {
                let target = self.evaluate(target)?;
                let index = self.evaluate(index)?;
                index_into(&target, &index, *pos)
            },

            Expr::Call { callee, arguments, pos } => {
                let callee = self.evaluate(callee)?;
                let arguments = self.evaluate_all(arguments)?;
                self.call_value(&callee, arguments, *pos)
            },

            Expr::NativeCall { name, arguments, pos } => {
                let arguments = self.evaluate_all(arguments)?;
                native::call_native(name, &arguments, *pos)
            },

            Expr::Get { object, name, pos } => {
                let object = self.evaluate(object)?;
                self.property(&object, name, *pos)
            },

            Expr::Set { object, name, value, pos } => {
                let object = self.evaluate(object)?;
                let Primitive::Instance(instance) = object else {
                    return Err(RuntimeError::NotAnInstance { pos: *pos });
                };
                let value = self.evaluate(value)?;
                instance.borrow_mut().fields.insert(name.clone(), value.clone());
                Ok(value)
            },

            Expr::This { id, pos } => {
                match self.locals.get(id) {
                    Some(&depth) => self.env.get_at(self.current, depth, "this", *pos),
                    None => Err(RuntimeError::UndefinedVariable { name: "this".to_string(),
                                                                  pos:  *pos, }),
                }
            },

            // The resolver rejects `super` before execution can begin.
            Expr::Super { pos, .. } => {
                Err(RuntimeError::TypeError { details: "classes have no superclass".to_string(),
                                              pos:     *pos, })
            },

            Expr::AlgebraicString { source, pos } => {
                let raw = parse_algebraic(source).map_err(|error| {
                              RuntimeError::MalformedAlgebra { message: error.message,
                                                               pos:     *pos, }
                          })?;
                Ok(Primitive::Algebraic(Rc::new(simplify(&raw))))
            },
        }
    }

    fn evaluate_all(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Primitive>> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.evaluate(expr)?);
        }
        Ok(values)
    }

    /// Reads a variable: resolved names jump to their recorded frame,
    /// unresolved names fall back to the dynamic global frame.
    fn lookup(&self, name: &str, id: NodeId, pos: Pos) -> EvalResult<Primitive> {
        match self.locals.get(&id) {
            Some(&depth) => self.env.get_at(self.current, depth, name, pos),
            None => self.env.get(Environment::GLOBAL, name, pos),
        }
    }

    /// Reads a property: fields shadow methods; method reads produce a
    /// bound method closed over `this`.
    fn property(&mut self, object: &Primitive, name: &str, pos: Pos) -> EvalResult<Primitive> {
        let Primitive::Instance(instance) = object else {
            return Err(RuntimeError::NotAnInstance { pos });
        };

        if let Some(value) = instance.borrow().fields.get(name) {
            return Ok(value.clone());
        }

        let class = Rc::clone(&instance.borrow().class);
        match class.methods.get(name) {
            Some(method) => {
                let bound =
                    self.bind_method(method, &class, Primitive::Instance(Rc::clone(instance)));
                Ok(Primitive::Fn(Rc::new(bound)))
            },
            None => Err(RuntimeError::UndefinedProperty { name: name.to_string(),
                                                          pos }),
        }
    }

    /// Calls a function value with positional, permissive binding: missing
    /// arguments bind `nil`; surplus arguments are an error.
    fn call_function(&mut self,
                     fun: &FnValue,
                     arguments: Vec<Primitive>,
                     pos: Pos)
                     -> EvalResult<Primitive> {
        let params = &fun.decl.params;
        if arguments.len() > params.len() {
            return Err(RuntimeError::TooManyArguments { expected: params.len(),
                                                        found:    arguments.len(),
                                                        pos });
        }

        let frame = self.env.push_frame(fun.closure);
        let mut arguments = arguments.into_iter();
        for param in params {
            let value = arguments.next().unwrap_or(Primitive::Nil);
            self.env.define(frame, param, value, true);
        }

        let flow = self.execute_block(&fun.decl.body, frame)?;
        // Constructors always yield the instance, whatever the body did.
        if fun.is_initializer {
            return self.env.get(fun.closure, "this", pos);
        }
        match flow {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Primitive::Nil),
        }
    }

    /// Instantiates a class: builds the instance, then runs `init` when
    /// the class has one.
    fn instantiate(&mut self,
                   class: &Rc<ClassValue>,
                   arguments: Vec<Primitive>,
                   pos: Pos)
                   -> EvalResult<Primitive> {
        let instance = Rc::new(RefCell::new(InstanceValue { class:  Rc::clone(class),
                                                            fields: HashMap::new(), }));

        if let Some(init) = class.methods.get("init") {
            let init = Rc::clone(init);
            let bound =
                self.bind_method(&init, class, Primitive::Instance(Rc::clone(&instance)));
            self.call_function(&bound, arguments, pos)?;
        } else if !arguments.is_empty() {
            return Err(RuntimeError::TooManyArguments { expected: 0,
                                                        found:    arguments.len(),
                                                        pos });
        }

        Ok(Primitive::Instance(instance))
    }

    /// Binds a method to an instance: a fresh frame holding `this` sits
    /// between the class's defining frame and the eventual call frame.
    fn bind_method(&mut self,
                   decl: &Rc<FunctionDecl>,
                   class: &ClassValue,
                   instance: Primitive)
                   -> FnValue {
        let frame = self.env.push_frame(class.closure);
        self.env.define(frame, "this", instance, false);
        FnValue { decl:           Rc::clone(decl),
                  closure:        frame,
                  is_initializer: decl.name == "init", }
    }
}

fn as_bool(value: &Primitive, pos: Pos) -> EvalResult<bool> {
    match value {
        Primitive::Bool(b) => Ok(*b),
        _ => Err(RuntimeError::ExpectedBoolean { pos }),
    }
}

/// Indexes a vector, tuple, or matrix; a matrix row indexes as a vector so
/// `m[i][j]` reaches a cell.
fn index_into(target: &Primitive, index: &Primitive, pos: Pos) -> EvalResult<Primitive> {
    let position = as_index(index, pos)?;
    let out_of_bounds = |len: usize| RuntimeError::IndexOutOfBounds {
        details: format!("index {position} into a collection of length {len}"),
        pos,
    };

    match target {
        Primitive::Vector(elements) | Primitive::Tuple(elements) => {
            elements.get(position)
                    .cloned()
                    .ok_or_else(|| out_of_bounds(elements.len()))
        },
        Primitive::Matrix(rows) => {
            rows.get(position)
                .map(|row| Primitive::Vector(Rc::new(row.clone())))
                .ok_or_else(|| out_of_bounds(rows.len()))
        },
        _ => Err(RuntimeError::NotIndexable { pos }),
    }
}

/// Coerces an index value to `usize`: non-negative integers, or floats
/// with no fractional part.
fn as_index(index: &Primitive, pos: Pos) -> EvalResult<usize> {
    let whole = match index {
        Primitive::Int(v) => *v,
        Primitive::Float(v) => {
            f64_to_i64_checked(*v, RuntimeError::TypeError { details: format!("cannot index with {v}"),
                                                             pos })?
        },
        other => {
            return Err(RuntimeError::TypeError { details: format!("cannot index with {}",
                                                                  other.type_name()),
                                                 pos });
        },
    };
    usize::try_from(whole).map_err(|_| RuntimeError::IndexOutOfBounds { details: format!("negative index {whole}"),
                                                                        pos })
}
