// tests/analyze.rs
//! End-to-end checks through the public API: parse, analyze, inspect the
//! annotated tree, the diagnostics and the scope dump.

use decaf::errors::SemanticError;
use decaf::frontend::ast::{ExprKind, FieldDef, Program, StmtKind};
use decaf::frontend::{Interner, Parser};
use decaf::sema::pretty::pretty_scopes;
use decaf::sema::{Analysis, Type, TypeError, analyze};

fn run(source: &str) -> (Program, Result<Analysis, Vec<TypeError>>, Interner) {
    let mut parser = Parser::new(source);
    let mut program = parser.parse_program().expect("parse failed");
    let mut interner = parser.into_interner();
    let result = analyze(&mut program, &mut interner);
    (program, result, interner)
}

#[test]
fn linear_hierarchy_analyzes_and_dumps() {
    let source = "class A {} class B extends A {} class C extends B {} \
                  class Main { static void main() {} }";
    let (program, result, interner) = run(source);
    let analysis = result.expect("clean program");
    assert!(program.main_class.is_some());

    let dump = pretty_scopes(&analysis, &interner);
    assert!(dump.starts_with("GLOBAL SCOPE:"));
    for needle in [
        "CLASS SCOPE OF 'A':",
        "CLASS SCOPE OF 'B':",
        "CLASS SCOPE OF 'C':",
        "class B : A",
        "class C : B",
        "FORMAL SCOPE OF 'main':",
        "STATIC function main : () => void",
    ] {
        assert!(dump.contains(needle), "missing {needle:?} in:\n{dump}");
    }
}

#[test]
fn inheritance_cycle_reports_exactly_one_error() {
    let source = "class A extends B {} class B extends A {}";
    let (_, result, _) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].error,
        SemanticError::BadInheritance { .. }
    ));
}

#[test]
fn unimplemented_abstract_method_flags_subclass() {
    let source = "abstract class A { abstract int f(); } class B extends A { } \
                  class Main { static void main() {} }";
    let (_, result, _) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].error.to_string(),
        "'B' is not abstract and does not override all abstract methods"
    );
}

#[test]
fn var_self_reference_is_undeclared() {
    let source = "class Main { static void main() { var x = x + 1; } }";
    let (_, result, _) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(
        matches!(&errors[0].error, SemanticError::UndeclVar { name, .. } if name == "x")
    );
}

#[test]
fn lambda_gets_function_type_and_empty_capture() {
    let source =
        "class Main { static void main() { var f = fun(int x) => x + 1; Print(f(2)); } }";
    let (program, result, _) = run(source);
    let analysis = result.expect("clean program");

    let FieldDef::Method(main) = &program.classes[0].fields[0] else {
        panic!("expected method");
    };
    let StmtKind::LocalVarDef(def) = &main.body.as_ref().unwrap().stmts[0].kind else {
        panic!("expected local def");
    };
    let ExprKind::Lambda(lambda) = &def.init.as_ref().unwrap().kind else {
        panic!("expected lambda");
    };
    assert!(lambda.captures.is_empty());

    let info = analysis
        .scopes
        .symbol(lambda.symbol.unwrap())
        .as_lambda()
        .unwrap();
    assert_eq!(info.params, vec![Type::Int]);
    assert_eq!(info.ret, Some(Type::Int));
}

#[test]
fn captured_assignment_rejected_and_capture_recorded() {
    let source = "class Main { static void main() { \
                      int y = 0; var f = fun() { y = 1; return y; }; } }";
    let (program, result, interner) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].error.to_string(),
        "cannot assign value to captured variables in lambda expression"
    );

    let FieldDef::Method(main) = &program.classes[0].fields[0] else {
        panic!("expected method");
    };
    let StmtKind::LocalVarDef(def) = &main.body.as_ref().unwrap().stmts[1].kind else {
        panic!("expected local def");
    };
    let ExprKind::Lambda(lambda) = &def.init.as_ref().unwrap().kind else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.captures.len(), 1);
    let _ = interner;
}

#[test]
fn analysis_is_idempotent_across_fresh_runs() {
    let source = "class A { int x; } class B extends A { int f() { return x; } } \
                  class Main { static void main() { var b = new B(); Print(b.f()); } }";
    let (_, first, first_interner) = run(source);
    let (_, second, second_interner) = run(source);
    let first_dump = pretty_scopes(&first.unwrap(), &first_interner);
    let second_dump = pretty_scopes(&second.unwrap(), &second_interner);
    assert_eq!(first_dump, second_dump);
}

#[test]
fn namer_errors_suppress_typing_diagnostics() {
    // the body would produce type errors, but the unknown parent class
    // stops the analysis before typing starts
    let source = "class A extends Zap { void f() { int x = true; } } \
                  class Main { static void main() {} }";
    let (_, result, _) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0].error,
        SemanticError::ClassNotFound { .. }
    ));
}

#[test]
fn diagnostics_arrive_in_source_order() {
    let source = "class Main { static void main() {\n\
                  int a = true;\n\
                  break;\n\
                  Print(new int[2]); } }";
    let (_, result, _) = run(source);
    let errors = result.unwrap_err();
    assert_eq!(errors.len(), 3);
    let lines: Vec<u32> = errors.iter().map(|e| e.span.line).collect();
    let mut sorted = lines.clone();
    sorted.sort_unstable();
    assert_eq!(lines, sorted);
}

#[test]
fn scope_dump_shows_lambda_frames() {
    let source =
        "class Main { static void main() { var f = fun(int x) { return x; }; } }";
    let (_, result, interner) = run(source);
    let analysis = result.expect("clean program");
    let dump = pretty_scopes(&analysis, &interner);
    assert!(dump.contains("LAMBDA SCOPE OF 'lambda@"), "{dump}");
    assert!(dump.contains("LOCAL SCOPE:"), "{dump}");
    assert!(dump.contains("variable x : int"), "{dump}");
}

#[test]
fn no_main_class_message_is_verbatim() {
    let (_, result, _) = run("class A {}");
    let errors = result.unwrap_err();
    assert_eq!(
        errors[0].error.to_string(),
        "no legal Main class named 'Main' was found"
    );
}
