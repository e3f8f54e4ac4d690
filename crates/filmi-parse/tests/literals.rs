use filmi_ast::ast::{Expr, Lit, Stmt};
use filmi_parse::{parse, tokenize};

fn val(src: &str) -> Expr {
    let toks = tokenize(&format!("action!\nmaan lo v = {src}\npaisa vasool")).expect("lex ok");
    let p = parse(&toks).expect("parse ok");
    let Stmt::VarDecl { init, .. } = &p.stmts[0] else {
        panic!("expected a variable declaration");
    };
    init.clone()
}

#[test]
fn numbers_bools_nil_and_strings() {
    assert!(matches!(val("42"), Expr::Literal { value: Lit::Num(n), .. } if n == 42.0));
    assert!(matches!(val("3.5"), Expr::Literal { value: Lit::Num(n), .. } if (n - 3.5).abs() < 1e-9));
    assert!(matches!(
        val("sach"),
        Expr::Literal {
            value: Lit::Bool(true),
            ..
        }
    ));
    assert!(matches!(
        val("galat"),
        Expr::Literal {
            value: Lit::Bool(false),
            ..
        }
    ));
    assert!(matches!(
        val("khaali"),
        Expr::Literal {
            value: Lit::Unit,
            ..
        }
    ));
}

#[test]
fn string_escapes_are_translated() {
    let e = val(r#""hi\n\t\r\"there\"\\""#);
    let Expr::Literal {
        value: Lit::Str(s), ..
    } = e
    else {
        panic!("expected a string literal");
    };
    assert_eq!(s, "hi\n\t\r\"there\"\\");
}

#[test]
fn unknown_escape_keeps_the_character() {
    let e = val(r#""a\qb""#);
    let Expr::Literal {
        value: Lit::Str(s), ..
    } = e
    else {
        panic!("expected a string literal");
    };
    assert_eq!(s, "aqb");
}

#[test]
fn fractional_number_needs_digits_after_the_dot() {
    // `1.` is the number 1 followed by a stray dot
    let toks = tokenize("action! maan lo v = 1. paisa vasool");
    assert!(toks.is_err());
}
