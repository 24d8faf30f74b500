use std::fs;

use twine::{
    algebra::infix::render_expr,
    error::{ErrorKind, TwineError},
    interpreter::{lexer::scan, parser::core::parse_program, value::core::Primitive},
    Engine,
};
use walkdir::WalkDir;

fn execute(source: &str) -> Result<Primitive, TwineError> {
    Engine::new(source).execute()
}

fn assert_logs(source: &str, expected: &[&str]) {
    let logs = Engine::new(source).log();
    assert_eq!(logs, expected, "script: {source}");
}

fn assert_error_kind(source: &str, kind: ErrorKind) {
    match execute(source) {
        Ok(value) => panic!("script succeeded with {value} but should fail: {source}"),
        Err(error) => assert_eq!(error.kind, kind, "script: {source}\nreport: {}", error.report()),
    }
}

#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "twine")
                                      })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = Engine::new(&source).execute() {
            panic!("Demo script {path:?} failed:\n{}", e.report());
        }
    }

    assert!(count > 0, "No demo scripts found under demos/");
}

#[test]
fn arithmetic_basics() {
    assert_eq!(execute("1 + 2 * 3;").unwrap(), Primitive::Int(7));
    assert_eq!(execute("2^10;").unwrap(), Primitive::Int(1024));
    assert_eq!(execute("7 % 4;").unwrap(), Primitive::Int(3));
    assert_eq!(execute("10 / 2;").unwrap(), Primitive::Int(5));
}

#[test]
fn inexact_integer_division_stays_exact() {
    assert_logs("print 10/4;", &["5|2"]);
    assert_logs("print 1/3;", &["1|3"]);
}

#[test]
fn fraction_arithmetic() {
    assert_logs("print 1|3 + 1|6;", &["1|2"]);
    assert_logs("print 1|2 * 2|3;", &["1|3"]);
    assert_eq!(execute("1|2 + 1|2;").unwrap(), Primitive::Int(1));
    assert_logs("print (1|2)^2;", &["1|4"]);
    assert_logs("print abs(0 - 1|2);", &["1|2"]);
}

#[test]
fn mixed_number_and_fraction_promotes() {
    assert_logs("print 1 + 1|2;", &["3|2"]);
    assert_logs("print 1|2 + 1;", &["3|2"]);
    assert_eq!(execute("2 * 1|2;").unwrap(), Primitive::Int(1));
}

#[test]
fn fraction_power_requires_integer_exponent() {
    assert_error_kind("(1|2) ^ (1|3);", ErrorKind::Runtime);
}

#[test]
fn numeric_literal_forms() {
    assert_logs("print 0xFF;", &["255"]);
    assert_logs("print 0o17;", &["15"]);
    assert_logs("print 0b1011;", &["11"]);
    assert_logs("print 25E-1;", &["2.5"]);
    assert_logs("print 1_000_000;", &["1000000"]);
    assert_logs("print #10^20;", &["100000000000000000000"]);
}

#[test]
fn bigfraction_literals() {
    assert_logs("print #1|3;", &["1|3"]);
    // A fraction component past the safe bound promotes automatically.
    assert_logs("print 9007199254740993|2;", &["9007199254740993|2"]);
}

#[test]
fn misplaced_digit_separator_is_lexical() {
    assert_error_kind("let x = 1_00;", ErrorKind::Lexical);
    assert_error_kind("let x = 1_0000;", ErrorKind::Lexical);
}

#[test]
fn oversized_integer_recommends_bignumber() {
    let error = execute("let x = 9007199254740992;").unwrap_err();
    assert_eq!(error.kind, ErrorKind::Lexical);
    let recommendation = error.recommendation.expect("expected a recommendation");
    assert!(recommendation.contains("#9007199254740992"));
}

#[test]
fn unterminated_strings_are_lexical() {
    assert_error_kind("let s = \"abc;", ErrorKind::Lexical);
    assert_error_kind("let e = '2x + 1;", ErrorKind::Lexical);
}

#[test]
fn implicit_multiplication_matches_explicit() {
    let implicit = parse_program(&scan("2x;").unwrap()).unwrap();
    let explicit = parse_program(&scan("2*x;").unwrap()).unwrap();
    let render = |program: &[twine::ast::Statement]| match &program[0] {
        twine::ast::Statement::Expression { expr } => render_expr(expr),
        other => panic!("expected an expression statement, got {other:?}"),
    };
    assert_eq!(render(&implicit), render(&explicit));
}

#[test]
fn implicit_multiplication_evaluates() {
    assert_logs("var x = 3; print 2x;", &["6"]);
    assert_logs("var x = 3; print -2x;", &["-6"]);
    assert_logs("print 3(4 + 1);", &["15"]);
    assert_logs("print 2 sin(0);", &["0"]);
}

#[test]
fn mutability_rules() {
    assert_error_kind("let x = 1; x = 2;", ErrorKind::Environment);
    assert_logs("var x = 1; x = 2; print x;", &["2"]);
}

#[test]
fn undefined_names_are_environment_errors() {
    assert_error_kind("print missing;", ErrorKind::Environment);
    assert_error_kind("missing = 1;", ErrorKind::Environment);
}

#[test]
fn resolver_rejects_self_reference() {
    assert_error_kind("let x = x;", ErrorKind::Resolver);
    assert_error_kind("let x = 1; { let x = x; }", ErrorKind::Resolver);
}

#[test]
fn assignment_after_definition_is_not_self_reference() {
    // `x = x` after `x` is defined is legal assignment; on a `var` it
    // simply keeps the value.
    assert_logs("var x = 1; x = x; print x;", &["1"]);
}

#[test]
fn resolver_rejects_duplicate_declarations() {
    assert_error_kind("{ let x = 1; let x = 2; }", ErrorKind::Resolver);
}

#[test]
fn resolver_rejects_misplaced_keywords() {
    assert_error_kind("return 1;", ErrorKind::Resolver);
    assert_error_kind("print this;", ErrorKind::Resolver);
    assert_error_kind("class A { fn init(x) { return x; } }", ErrorKind::Resolver);
}

#[test]
fn first_parse_error_halts() {
    assert_error_kind("let = 3;", ErrorKind::Syntax);
    assert_error_kind("1 + ;", ErrorKind::Syntax);
    assert_error_kind("fn f(a, a) { return a; }", ErrorKind::Syntax);
}

#[test]
fn expression_statements_need_semicolons_except_at_eof() {
    assert_eq!(execute("1 + 1").unwrap(), Primitive::Int(2));
    assert_error_kind("1 + 1 print 2;", ErrorKind::Syntax);
}

#[test]
fn native_names_are_reserved() {
    assert_error_kind("let sin = 1;", ErrorKind::Syntax);
    assert_error_kind("fn gcd(a, b) { return a; }", ErrorKind::Syntax);
}

#[test]
fn functions_and_returns() {
    assert_logs("fn add(a, b) { return a + b; } print add(2, 3);", &["5"]);
    assert_logs("fn square(x) = x * x; print square(7);", &["49"]);
    assert_logs("fn nothing() { } print nothing();", &["nil"]);
}

#[test]
fn recursion() {
    assert_logs("fn fact(n) {\n\
                     if (n <= 1) { return 1; }\n\
                     return n * fact(n - 1);\n\
                 }\n\
                 print fact(5);",
                &["120"]);
}

#[test]
fn missing_arguments_bind_nil() {
    assert_logs("fn first(a, b) { return a; } print first(1);", &["1"]);
    assert_logs("fn second(a, b) { return b; } print second(1);", &["nil"]);
}

#[test]
fn surplus_arguments_are_runtime_errors() {
    assert_error_kind("fn f(a) = a; f(1, 2);", ErrorKind::Runtime);
}

#[test]
fn closures_share_their_defining_frame() {
    assert_logs("fn counter() {\n\
                     var i = 0;\n\
                     fn inc() {\n\
                         i = i + 1;\n\
                         return i;\n\
                     }\n\
                     return inc;\n\
                 }\n\
                 let c = counter();\n\
                 c();\n\
                 print c();",
                &["2"]);
}

#[test]
fn closure_observes_mutation_of_captured_variable() {
    assert_logs("var message = \"before\";\n\
                 fn read() = message;\n\
                 message = \"after\";\n\
                 print read();",
                &["after"]);
}

#[test]
fn while_and_for_loops() {
    assert_logs("var i = 0; var total = 0;\n\
                 while (i < 5) { total = total + i; i = i + 1; }\n\
                 print total;",
                &["10"]);
    assert_logs("var total = 0;\n\
                 for (var i = 0; i < 5; i = i + 1) { total = total + i; }\n\
                 print total;",
                &["10"]);
}

#[test]
fn loop_iteration_ceiling() {
    let result = Engine::new("var i = 0; while (true) { i = i + 1; }").with_max_iterations(10)
                                                                      .execute();
    assert_eq!(result.unwrap_err().kind, ErrorKind::Runtime);

    // Within the ceiling, loops run normally.
    let result = Engine::new("var i = 0; while (i < 5) { i = i + 1; } i;").with_max_iterations(10)
                                                                          .execute();
    assert_eq!(result.unwrap(), Primitive::Int(5));
}

#[test]
fn conditions_must_be_boolean() {
    assert_error_kind("if (1) { print 1; }", ErrorKind::Runtime);
    assert_error_kind("while (1) { }", ErrorKind::Runtime);
}

#[test]
fn classes_and_instances() {
    assert_logs("class Point {\n\
                     fn init(x, y) {\n\
                         this.x = x;\n\
                         this.y = y;\n\
                     }\n\
                     fn norm2() = this.x * this.x + this.y * this.y;\n\
                 }\n\
                 let p = Point(3, 4);\n\
                 print p.x;\n\
                 print p.norm2();",
                &["3", "25"]);
}

#[test]
fn constructors_always_yield_the_instance() {
    assert_logs("class Tag {\n\
                     fn init() {\n\
                         this.kind = \"tag\";\n\
                         return;\n\
                     }\n\
                 }\n\
                 print Tag().kind;",
                &["tag"]);
}

#[test]
fn undefined_property_is_a_runtime_error() {
    assert_error_kind("class A { } let a = A(); print a.missing;", ErrorKind::Runtime);
}

#[test]
fn strings_concatenate() {
    assert_logs("print \"ab\" + \"cd\";", &["abcd"]);
    assert_logs("print \"a\\tb\";", &["a\tb"]);
}

#[test]
fn vectors_and_matrices() {
    assert_logs("print [1, 2] + [2, 2];", &["[3, 4]"]);
    assert_logs("print [1, 2] * [3, 4];", &["11"]);
    assert_logs("print 2 * [1, 2, 3];", &["[2, 4, 6]"]);
    assert_logs("print [[1, 0], [0, 1]] * [[2], [3]];", &["[[2], [3]]"]);
    assert_logs("let m = [[1, 2], [3, 4]]; print m[1][0];", &["3"]);
    assert_logs("let v = [10, 20, 30]; print v[2];", &["30"]);
}

#[test]
fn tuples_hold_mixed_values() {
    assert_logs("print (1, \"two\", 3|4);", &["(1, two, 3|4)"]);
    assert_logs("let pair = (10, 20); print pair[1];", &["20"]);
}

#[test]
fn shape_mismatches_are_runtime_errors() {
    assert_error_kind("[1, 2] + [1, 2, 3];", ErrorKind::Runtime);
    assert_error_kind("[[1, 2]] * [[1, 2]];", ErrorKind::Runtime);
    assert_error_kind("[1, 2][5];", ErrorKind::Runtime);
}

#[test]
fn ragged_matrix_is_a_syntax_error() {
    assert_error_kind("[[1, 2], [3]];", ErrorKind::Syntax);
}

#[test]
fn trailing_commas_are_elided() {
    assert_logs("print [1, 2, 3,];", &["[1, 2, 3]"]);
    assert_logs("fn f(a, b,) = a + b; print f(1, 2,);", &["3"]);
}

#[test]
fn comments_are_dropped() {
    assert_logs("// leading comment\nprint 1; /* inline */ print 2;", &["1", "2"]);
}

#[test]
fn bignumber_arithmetic() {
    assert_logs("print #2^64;", &["18446744073709551616"]);
    assert_logs("print #1|3 + 1|6;", &["1|2"]);
}

#[test]
fn division_by_zero_is_a_runtime_error() {
    assert_error_kind("1 / 0;", ErrorKind::Runtime);
    assert_error_kind("1|2 / 0|1;", ErrorKind::Runtime);
}

#[test]
fn algebraic_strings_become_canonical_values() {
    assert_logs("print '2x + 1';", &["2*x + 1"]);
    assert_logs("print 'x + 0';", &["x"]);
    assert_logs("print simplify('2 * 3');", &["6"]);
    assert_logs("print deriv('x^2');", &["x^2"]);
    // Canonical sums order ascending powers first.
    assert_logs("print subex('x^2 + x', 'x', 'y');", &["y + y^2"]);
}

#[test]
fn malformed_algebraic_string_is_an_algebraic_error() {
    assert_error_kind("'2 +';", ErrorKind::Algebraic);
}

#[test]
fn log_mode_returns_one_report_on_error() {
    let logs = Engine::new("print 1; print missing;").log();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("ENVIRONMENT ERROR."));
    assert!(logs[0].contains("line 1"));
}

#[test]
fn error_reports_carry_position_and_phase() {
    let error = execute("let x = 1;\nlet y = @;").unwrap_err();
    let report = error.report();
    assert!(report.starts_with("LEXICAL ERROR."));
    assert!(report.contains("While scanning, an error occurred on line 2, column 9."));
    assert!(report.contains("Reporting from the scanner:"));
}

#[test]
fn execute_returns_last_expression_value() {
    assert_eq!(execute("let x = 2; x * 3; x * 4;").unwrap(), Primitive::Int(8));
    assert_eq!(execute("let x = 2;").unwrap(), Primitive::Nil);
}

#[test]
fn greek_identifiers() {
    assert_logs("let Δt = 5; print Δt * 2;", &["10"]);
}
