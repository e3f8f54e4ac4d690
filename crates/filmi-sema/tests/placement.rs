use filmi_parse::{parse, tokenize};
use filmi_sema::{analyze, SemaError, SemaErrorKind};

fn check(body: &str) -> Result<(), SemaError> {
    let toks = tokenize(&format!("action!\n{body}\npaisa vasool")).expect("lex ok");
    let program = parse(&toks).expect("parse ok");
    analyze(&program)
}

#[test]
fn break_outside_a_loop_is_rejected() {
    let err = check("me bahar ja raha hu").expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::BreakOutsideLoop);
}

#[test]
fn break_inside_a_loop_passes() {
    assert!(check("jab tak hai jaan (sach) { me bahar ja raha hu }").is_ok());
}

#[test]
fn break_inside_a_nested_block_of_a_loop_passes() {
    assert!(check(
        "jab tak hai jaan (sach) { agar kismat rahi (sach) { me bahar ja raha hu } }"
    )
    .is_ok());
}

#[test]
fn break_cannot_cross_a_function_boundary() {
    // the function body is analysed with a fresh loop depth
    let err = check(
        "jab tak hai jaan (sach) { \
           climax f() { me bahar ja raha hu } \
           me bahar ja raha hu \
         }",
    )
    .expect_err("should fail");
    assert_eq!(err.kind, SemaErrorKind::BreakOutsideLoop);
}

#[test]
fn return_inside_a_loop_inside_a_function_passes() {
    assert!(check(
        "climax f() { \
           jab tak hai jaan (sach) { dialogue wapas do 1 } \
         }"
    )
    .is_ok());
}
