use crate::{
    algebra::expr::AlgebraicExpression,
    ast::{BinaryOperator, Expr, LogicalOperator, RelationalOperator, UnaryOperator},
};

/// Renders an algebraic expression as plain infix text.
///
/// Presentation only: the tree is never mutated. Parentheses are inserted
/// exactly where a child binds looser than its context.
#[must_use]
pub fn render_algebraic(e: &AlgebraicExpression) -> String {
    render_at(e, 0)
}

fn render_at(e: &AlgebraicExpression, context: u8) -> String {
    use AlgebraicExpression as E;

    let (text, level) = match e {
        E::Int(n) => (n.to_string(), 4),
        E::Real(r) => (r.0.to_string(), 4),
        E::Sym(name) => (name.clone(), 4),
        E::Constant { value: None, .. } => ("Undefined".to_string(), 4),
        E::Constant { name, .. } => (name.clone(), 4),
        E::Fraction(n, d) => (format!("{n}/{d}"), 2),

        E::Sum(ops) => {
            let parts: Vec<String> = ops.iter().map(|op| render_at(op, 1)).collect();
            (parts.join(" + "), 1)
        },
        E::Difference(ops) => match ops.as_slice() {
            [only] => (format!("-{}", render_at(only, 2)), 1),
            [a, b] => (format!("{} - {}", render_at(a, 1), render_at(b, 2)), 1),
            _ => ("?".to_string(), 1),
        },
        E::Product(ops) => {
            let parts: Vec<String> = ops.iter().map(|op| render_at(op, 2)).collect();
            (parts.join("*"), 2)
        },
        E::Quotient(n, d) => (format!("{}/{}", render_at(n, 3), render_at(d, 3)), 2),
        E::Power { base, exponent } => {
            (format!("{}^{}", render_at(base, 4), render_at(exponent, 4)), 3)
        },
        E::Factorial(op) => (format!("{}!", render_at(op, 4)), 4),
        E::Func { name, args } => {
            let parts: Vec<String> = args.iter().map(|arg| render_at(arg, 0)).collect();
            (format!("{name}({})", parts.join(", ")), 4)
        },
    };

    if level < context {
        format!("({text})")
    } else {
        text
    }
}

/// Renders a script AST expression as plain infix text.
///
/// Used for diagnostics and echoing parsed input; like the algebraic
/// renderer, it is read-only.
#[must_use]
pub fn render_expr(e: &Expr) -> String {
    match e {
        Expr::Int { value, .. } => value.to_string(),
        Expr::Float { value, .. } => value.to_string(),
        Expr::Bool { value, .. } => value.to_string(),
        Expr::Str { value, .. } => format!("\"{value}\""),
        Expr::Nil { .. } => "nil".to_string(),
        Expr::Constant { name, .. } => name.clone(),
        Expr::Fraction { numerator, denominator, .. } => format!("{numerator}|{denominator}"),
        Expr::BigNum { value, .. } => format!("#{value}"),
        Expr::BigFraction { numerator, denominator, .. } => format!("#{numerator}|{denominator}"),
        Expr::Variable { name, .. } => name.clone(),
        Expr::Assign { name, value, .. } => format!("{name} = {}", render_expr(value)),
        Expr::Tuple { elements, .. } => {
            let parts: Vec<String> = elements.iter().map(render_expr).collect();
            format!("({})", parts.join(", "))
        },
        Expr::Vector { elements, .. } => {
            let parts: Vec<String> = elements.iter().map(render_expr).collect();
            format!("[{}]", parts.join(", "))
        },
        Expr::Matrix { rows, .. } => {
            let parts: Vec<String> = rows.iter()
                                         .map(|row| {
                                             let cells: Vec<String> =
                                                 row.iter().map(render_expr).collect();
                                             format!("[{}]", cells.join(", "))
                                         })
                                         .collect();
            format!("[{}]", parts.join(", "))
        },
        Expr::Index { target, index, .. } => {
            format!("{}[{}]", render_expr(target), render_expr(index))
        },
        Expr::Binary { left, op, right, .. } => {
            format!("{} {} {}", render_expr(left), binary_symbol(*op), render_expr(right))
        },
        Expr::Logical { left, op, right, .. } => {
            let symbol = match op {
                LogicalOperator::And => "and",
                LogicalOperator::Or => "or",
            };
            format!("{} {symbol} {}", render_expr(left), render_expr(right))
        },
        Expr::Relational { left, op, right, .. } => {
            format!("{} {} {}", render_expr(left), relational_symbol(*op), render_expr(right))
        },
        Expr::Unary { op, expr, .. } => {
            let symbol = match op {
                UnaryOperator::Negate => "-",
                UnaryOperator::Not => "!",
            };
            format!("{symbol}{}", render_expr(expr))
        },
        Expr::Call { callee, arguments, .. } => {
            let parts: Vec<String> = arguments.iter().map(render_expr).collect();
            format!("{}({})", render_expr(callee), parts.join(", "))
        },
        Expr::NativeCall { name, arguments, .. } => {
            let parts: Vec<String> = arguments.iter().map(render_expr).collect();
            format!("{name}({})", parts.join(", "))
        },
        Expr::Group { expr, .. } => format!("({})", render_expr(expr)),
        Expr::Get { object, name, .. } => format!("{}.{name}", render_expr(object)),
        Expr::Set { object, name, value, .. } => {
            format!("{}.{name} = {}", render_expr(object), render_expr(value))
        },
        Expr::This { .. } => "this".to_string(),
        Expr::Super { method, .. } => format!("super.{method}"),
        Expr::AlgebraicString { source, .. } => format!("'{source}'"),
    }
}

const fn binary_symbol(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "/",
        BinaryOperator::Mod => "%",
        BinaryOperator::Pow => "^",
    }
}

const fn relational_symbol(op: RelationalOperator) -> &'static str {
    match op {
        RelationalOperator::Equal => "==",
        RelationalOperator::NotEqual => "!=",
        RelationalOperator::Less => "<",
        RelationalOperator::LessEqual => "<=",
        RelationalOperator::Greater => ">",
        RelationalOperator::GreaterEqual => ">=",
    }
}
