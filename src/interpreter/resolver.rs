use std::collections::HashMap;

use crate::{
    ast::{Expr, FunctionDecl, NodeId, Statement},
    error::ResolveError,
};

pub type ResolveResult<T> = Result<T, ResolveError>;

/// The kind of function body currently being resolved.
///
/// Tracked so `return` statements can be rejected outside functions and
/// value-carrying returns rejected inside constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionContext {
    None,
    Function,
    Method,
    Initializer,
}

/// Whether resolution is currently inside a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassContext {
    None,
    Class,
}

/// The static resolution pass.
///
/// Walks the AST once before interpretation, computing for every
/// resolvable expression the number of environment frames between its use
/// site and the frame that declares its name. Names not found in any
/// lexical scope are left to dynamic global lookup.
///
/// Each lexical scope is a map from name to a defined flag: `declare`
/// inserts `false`, the initializer is resolved, then `define` flips the
/// entry to `true`. Reading a name whose entry is still `false` is the
/// self-referential-initializer error.
pub struct Resolver {
    scopes: Vec<HashMap<String, bool>>,
    locals: HashMap<NodeId, usize>,
    current_function: FunctionContext,
    current_class: ClassContext,
}

/// Resolves a whole program.
///
/// # Errors
/// The first `ResolveError` encountered; interpretation must not begin
/// unless resolution fully succeeds.
///
/// # Example
/// ```
/// use twine::interpreter::{lexer::scan, parser::core::parse_program, resolver::resolve};
///
/// let tokens = scan("let x = x;").unwrap();
/// let program = parse_program(&tokens).unwrap();
/// assert!(resolve(&program).is_err());
/// ```
pub fn resolve(program: &[Statement]) -> ResolveResult<HashMap<NodeId, usize>> {
    // The global scope is tracked like any other so that a top-level
    // `let x = x;` is still caught; names declared later in the program
    // stay unresolved here and fall back to dynamic global lookup.
    let mut resolver = Resolver { scopes: vec![HashMap::new()],
                                  locals: HashMap::new(),
                                  current_function: FunctionContext::None,
                                  current_class: ClassContext::None };
    for statement in program {
        resolver.resolve_statement(statement)?;
    }
    Ok(resolver.locals)
}

impl Resolver {
    fn resolve_statement(&mut self, statement: &Statement) -> ResolveResult<()> {
        match statement {
            Statement::Block { statements, .. } => {
                self.scopes.push(HashMap::new());
                for inner in statements {
                    self.resolve_statement(inner)?;
                }
                self.scopes.pop();
                Ok(())
            },

            Statement::Variable { name, initializer, pos, .. } => {
                self.declare(name, *pos)?;
                self.resolve_expr(initializer)?;
                self.define(name);
                Ok(())
            },

            Statement::Function(decl) => {
                self.declare(&decl.name, decl.pos)?;
                self.define(&decl.name);
                self.resolve_function(decl, FunctionContext::Function)
            },

            Statement::Class { name, methods, pos } => {
                self.declare(name, *pos)?;
                self.define(name);

                let enclosing = self.current_class;
                self.current_class = ClassContext::Class;

                self.scopes.push(HashMap::new());
                self.scopes
                    .last_mut()
                    .expect("scope just pushed")
                    .insert("this".to_string(), true);

                for method in methods {
                    let context = if method.name == "init" {
                        FunctionContext::Initializer
                    } else {
                        FunctionContext::Method
                    };
                    self.resolve_function(method, context)?;
                }

                self.scopes.pop();
                self.current_class = enclosing;
                Ok(())
            },

            Statement::Expression { expr } => self.resolve_expr(expr),

            Statement::Print { expr, .. } => self.resolve_expr(expr),

            Statement::If { condition, then_branch, else_branch, .. } => {
                self.resolve_expr(condition)?;
                self.resolve_statement(then_branch)?;
                if let Some(branch) = else_branch {
                    self.resolve_statement(branch)?;
                }
                Ok(())
            },

            Statement::While { condition, body, .. } => {
                self.resolve_expr(condition)?;
                self.resolve_statement(body)
            },

            Statement::Return { value, pos } => {
                if self.current_function == FunctionContext::None {
                    return Err(ResolveError::ReturnOutsideFunction { pos: *pos });
                }
                if let Some(expr) = value {
                    if self.current_function == FunctionContext::Initializer {
                        return Err(ResolveError::ReturnFromInitializer { pos: *pos });
                    }
                    self.resolve_expr(expr)?;
                }
                Ok(())
            },
        }
    }

    fn resolve_function(&mut self,
                        decl: &FunctionDecl,
                        context: FunctionContext)
                        -> ResolveResult<()> {
        let enclosing = self.current_function;
        self.current_function = context;

        self.scopes.push(HashMap::new());
        for param in &decl.params {
            self.declare(param, decl.pos)?;
            self.define(param);
        }
        for statement in &decl.body {
            self.resolve_statement(statement)?;
        }
        self.scopes.pop();

        self.current_function = enclosing;
        Ok(())
    }

    fn resolve_expr(&mut self, expr: &Expr) -> ResolveResult<()> {
        match expr {
            Expr::Variable { name, id, pos } => {
                if self.scopes
                       .last()
                       .is_some_and(|scope| scope.get(name) == Some(&false))
                {
                    return Err(ResolveError::SelfReference { name: name.clone(),
                                                             pos:  *pos, });
                }
                self.resolve_local(*id, name);
                Ok(())
            },

            Expr::Assign { name, id, value, .. } => {
                self.resolve_expr(value)?;
                self.resolve_local(*id, name);
                Ok(())
            },

            Expr::This { id, pos } => {
                if self.current_class == ClassContext::None {
                    return Err(ResolveError::ThisOutsideClass { pos: *pos });
                }
                self.resolve_local(*id, "this");
                Ok(())
            },

            // Classes are single-level; there is never a superclass.
            Expr::Super { pos, .. } => {
                Err(ResolveError::SuperWithoutSuperclass { pos: *pos })
            },

            Expr::Binary { left, right, .. }
            | Expr::Logical { left, right, .. }
            | Expr::Relational { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)
            },

            Expr::Unary { expr: inner, .. } | Expr::Group { expr: inner, .. } => {
                self.resolve_expr(inner)
            },

            Expr::Call { callee, arguments, .. } => {
                self.resolve_expr(callee)?;
                for argument in arguments {
                    self.resolve_expr(argument)?;
                }
                Ok(())
            },

            Expr::NativeCall { arguments, .. } => {
                for argument in arguments {
                    self.resolve_expr(argument)?;
                }
                Ok(())
            },

            Expr::Index { target, index, .. } => {
                self.resolve_expr(target)?;
                self.resolve_expr(index)
            },

            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(object)?;
                self.resolve_expr(value)
            },

            Expr::Tuple { elements, .. } | Expr::Vector { elements, .. } => {
                for element in elements {
                    self.resolve_expr(element)?;
                }
                Ok(())
            },

            Expr::Matrix { rows, .. } => {
                for row in rows {
                    for element in row {
                        self.resolve_expr(element)?;
                    }
                }
                Ok(())
            },

            Expr::Int { .. }
            | Expr::Float { .. }
            | Expr::Bool { .. }
            | Expr::Str { .. }
            | Expr::Nil { .. }
            | Expr::Constant { .. }
            | Expr::Fraction { .. }
            | Expr::BigNum { .. }
            | Expr::BigFraction { .. }
            | Expr::AlgebraicString { .. } => Ok(()),
        }
    }

    /// Records a declaration in the innermost scope.
    fn declare(&mut self, name: &str, pos: crate::interpreter::lexer::Pos) -> ResolveResult<()> {
        if let Some(scope) = self.scopes.last_mut() {
            if scope.contains_key(name) {
                return Err(ResolveError::DuplicateDeclaration { name: name.to_string(),
                                                                pos });
            }
            scope.insert(name.to_string(), false);
        }
        Ok(())
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), true);
        }
    }

    /// Walks the scope stack innermost-to-outermost and records the hop
    /// count for the first scope containing `name`. Unfound names fall back
    /// to the dynamic global frame at run time.
    fn resolve_local(&mut self, id: NodeId, name: &str) {
        for (hops, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, hops);
                return;
            }
        }
    }
}
