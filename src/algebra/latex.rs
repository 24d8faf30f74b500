use crate::{
    algebra::{expr::AlgebraicExpression, infix},
    ast::Expr,
};

/// Renders an algebraic expression as LaTeX.
///
/// Presentation only; the tree is never mutated. Quotients and fractions
/// become `\frac`, powers become `{b}^{e}`, and products use `\cdot` only
/// between two numeric factors, where juxtaposition would be ambiguous.
#[must_use]
pub fn render_algebraic(e: &AlgebraicExpression) -> String {
    render_at(e, 0)
}

fn render_at(e: &AlgebraicExpression, context: u8) -> String {
    use AlgebraicExpression as E;

    let (text, level) = match e {
        E::Int(n) => (n.to_string(), 4),
        E::Real(r) => (r.0.to_string(), 4),
        E::Sym(name) => (symbol_latex(name), 4),
        E::Constant { value: None, .. } => ("\\mathrm{Undefined}".to_string(), 4),
        E::Constant { name, .. } => (symbol_latex(name), 4),
        E::Fraction(n, d) => (format!("\\frac{{{n}}}{{{d}}}"), 4),

        E::Sum(ops) => {
            let parts: Vec<String> = ops.iter().map(|op| render_at(op, 1)).collect();
            (parts.join(" + "), 1)
        },
        E::Difference(ops) => match ops.as_slice() {
            [only] => (format!("-{}", render_at(only, 2)), 1),
            [a, b] => (format!("{} - {}", render_at(a, 1), render_at(b, 2)), 1),
            _ => (String::from("?"), 1),
        },
        E::Product(ops) => (render_product(ops), 2),
        E::Quotient(n, d) => {
            (format!("\\frac{{{}}}{{{}}}", render_at(n, 0), render_at(d, 0)), 4)
        },
        E::Power { base, exponent } => {
            (format!("{{{}}}^{{{}}}", render_at(base, 4), render_at(exponent, 0)), 3)
        },
        E::Factorial(op) => (format!("{}!", render_at(op, 4)), 4),
        E::Func { name, args } => {
            let parts: Vec<String> = args.iter().map(|arg| render_at(arg, 0)).collect();
            (format!("{}\\left({}\\right)", function_latex(name), parts.join(", ")), 4)
        },
    };

    if level < context {
        format!("\\left({text}\\right)")
    } else {
        text
    }
}

/// Joins product factors, inserting `\cdot` only where two numeric factors
/// would otherwise collide.
fn render_product(ops: &[AlgebraicExpression]) -> String {
    let mut out = String::new();
    for (i, op) in ops.iter().enumerate() {
        if i > 0 {
            if op.is_numeric() {
                out.push_str(" \\cdot ");
            } else {
                out.push(' ');
            }
        }
        out.push_str(&render_at(op, 2));
    }
    out
}

/// Maps well-known names to LaTeX commands; Greek letters pass through.
fn symbol_latex(name: &str) -> String {
    match name {
        "pi" => "\\pi".to_string(),
        "tau" => "\\tau".to_string(),
        "phi" => "\\phi".to_string(),
        "theta" => "\\theta".to_string(),
        _ => name.to_string(),
    }
}

fn function_latex(name: &str) -> String {
    match name {
        "sin" | "cos" | "tan" | "ln" | "lg" | "log" | "exp" | "min" | "max" => {
            format!("\\{name}")
        },
        "sqrt" => "\\sqrt".to_string(),
        _ => format!("\\operatorname{{{name}}}"),
    }
}

/// Renders a script AST expression as LaTeX.
///
/// Only the mathematical subset gets special treatment; other node kinds
/// fall back to their infix rendering inside `\mathtt`.
#[must_use]
pub fn render_expr(e: &Expr) -> String {
    use crate::ast::BinaryOperator;

    match e {
        Expr::Int { value, .. } => value.to_string(),
        Expr::Float { value, .. } => value.to_string(),
        Expr::Constant { name, .. } => symbol_latex(name),
        Expr::Fraction { numerator, denominator, .. } => {
            format!("\\frac{{{numerator}}}{{{denominator}}}")
        },
        Expr::BigNum { value, .. } => value.to_string(),
        Expr::BigFraction { numerator, denominator, .. } => {
            format!("\\frac{{{numerator}}}{{{denominator}}}")
        },
        Expr::Variable { name, .. } => symbol_latex(name),
        Expr::Binary { left, op: BinaryOperator::Div, right, .. } => {
            format!("\\frac{{{}}}{{{}}}", render_expr(left), render_expr(right))
        },
        Expr::Binary { left, op: BinaryOperator::Pow, right, .. } => {
            format!("{{{}}}^{{{}}}", render_expr(left), render_expr(right))
        },
        Expr::Binary { left, op, right, .. } => {
            let symbol = match op {
                BinaryOperator::Add => "+",
                BinaryOperator::Sub => "-",
                BinaryOperator::Mul => " \\cdot ",
                BinaryOperator::Mod => " \\bmod ",
                BinaryOperator::Div | BinaryOperator::Pow => unreachable!("handled above"),
            };
            format!("{}{symbol}{}", render_expr(left), render_expr(right))
        },
        Expr::Unary { op, expr: inner, .. } => {
            let symbol = match op {
                crate::ast::UnaryOperator::Negate => "-",
                crate::ast::UnaryOperator::Not => "\\lnot ",
            };
            format!("{symbol}{}", render_expr(inner))
        },
        Expr::Group { expr: inner, .. } => {
            format!("\\left({}\\right)", render_expr(inner))
        },
        Expr::NativeCall { name, arguments, .. } => {
            let parts: Vec<String> = arguments.iter().map(render_expr).collect();
            format!("{}\\left({}\\right)", function_latex(name), parts.join(", "))
        },
        other => format!("\\mathtt{{{}}}", infix::render_expr(other)),
    }
}
