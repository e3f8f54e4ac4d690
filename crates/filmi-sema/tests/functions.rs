use filmi_parse::{parse, tokenize};
use filmi_sema::{analyze, SemaError, SemaErrorKind};

fn check(body: &str) -> Result<(), SemaError> {
    let toks = tokenize(&format!("action!\n{body}\npaisa vasool")).expect("lex ok");
    let program = parse(&toks).expect("parse ok");
    analyze(&program)
}

#[test]
fn arity_is_checked_for_named_functions() {
    let err = check("climax add(a, b) { dialogue wapas do a + b }\nek baat bataun: add(1)")
        .expect_err("should fail");
    assert_eq!(
        err.kind,
        SemaErrorKind::ArityMismatch {
            name: "add".into(),
            expected: 2,
            found: 1,
        }
    );
}

#[test]
fn exact_arity_passes() {
    assert!(check("climax add(a, b) { dialogue wapas do a + b }\nek baat bataun: add(1, 2)").is_ok());
}

#[test]
fn top_level_functions_may_be_called_before_their_declaration() {
    // hoisting makes forward references legal
    assert!(check(
        "climax is_even(n) { \
           agar kismat rahi (n == 0) { dialogue wapas do sach } \
           dialogue wapas do is_odd(n - 1) \
         } \
         climax is_odd(n) { \
           agar kismat rahi (n == 0) { dialogue wapas do galat } \
           dialogue wapas do is_even(n - 1) \
         } \
         ek baat bataun: is_even(4)"
    )
    .is_ok());
}

#[test]
fn redeclaring_a_function_is_rejected() {
    let err = check(
        "climax f() { dialogue wapas do 1 }\nclimax f() { dialogue wapas do 2 }",
    )
    .expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::DuplicateFunction("f".into()));
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let err = check("climax f(a, a) { dialogue wapas do a }").expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::DuplicateParameter("a".into()));
}

#[test]
fn calling_an_unknown_name_is_rejected() {
    let err = check("ek baat bataun: mystery()").expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::UndefinedFunction("mystery".into()));
}

#[test]
fn calls_through_variables_skip_the_static_arity_check() {
    // `g` is a variable holding a function value; its arity is a runtime
    // concern
    assert!(check(
        "climax f(a) { dialogue wapas do a }\n\
         maan lo g = f\n\
         ek baat bataun: g(1, 2, 3)"
    )
    .is_ok());
}

#[test]
fn parameters_resolve_inside_the_body_only() {
    let err = check("climax f(a) { dialogue wapas do a }\nek baat bataun: a")
        .expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::UndefinedVariable("a".into()));
}

#[test]
fn nested_functions_may_recurse() {
    assert!(check(
        "climax outer() { \
           climax inner(n) { \
             agar kismat rahi (n <= 0) { dialogue wapas do 0 } \
             dialogue wapas do inner(n - 1) \
           } \
           dialogue wapas do inner(3) \
         }"
    )
    .is_ok());
}

#[test]
fn nested_function_arity_is_also_static() {
    let err = check(
        "climax outer() { \
           climax inner(n) { dialogue wapas do n } \
           dialogue wapas do inner(1, 2) \
         }",
    )
    .expect_err("should fail");
    assert!(matches!(err.kind, SemaErrorKind::ArityMismatch { .. }));
}

#[test]
fn return_outside_a_function_is_rejected() {
    let err = check("dialogue wapas do 1").expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::ReturnOutsideFunction);
}
