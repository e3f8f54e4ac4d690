use filmi_ast::ast::{Expr, Stmt};
use filmi_parse::{parse, tokenize, ParseErrorKind};

fn val(src: &str) -> Expr {
    let toks = tokenize(&format!("action!\nmaan lo v = {src}\npaisa vasool")).expect("lex ok");
    let p = parse(&toks).expect("parse ok");
    let Stmt::VarDecl { init, .. } = &p.stmts[0] else {
        panic!("expected a variable declaration");
    };
    init.clone()
}

fn val_err(src: &str) -> ParseErrorKind {
    let toks = tokenize(&format!("action!\nmaan lo v = {src}\npaisa vasool")).expect("lex ok");
    parse(&toks).expect_err("parse should fail").kind
}

#[test]
fn call_binds_tighter_than_infix() {
    // f(1) + 2 parses as (f(1)) + 2
    match val("f(1) + 2") {
        Expr::Binary { lhs, .. } => assert!(matches!(*lhs, Expr::Call { .. })),
        _ => panic!("lhs should be a call"),
    }
    // f(1 + 2) keeps the sum inside the argument list
    match val("f(1 + 2)") {
        Expr::Call { args, .. } => assert!(matches!(args[0], Expr::Binary { .. })),
        _ => panic!("should be a call"),
    }
}

#[test]
fn nested_calls_in_argument_lists() {
    match val("f(g(1), h(2, 3))") {
        Expr::Call { callee, args, .. } => {
            assert_eq!(callee, "f");
            assert!(matches!(&args[0], Expr::Call { .. }));
            assert!(matches!(&args[1], Expr::Call { args, .. } if args.len() == 2));
        }
        _ => panic!("expected top-level call"),
    }
}

#[test]
fn zero_argument_call() {
    match val("f()") {
        Expr::Call { args, .. } => assert!(args.is_empty()),
        _ => panic!("expected a call"),
    }
}

#[test]
fn the_callee_is_a_bare_name() {
    // a literal cannot be called
    assert_eq!(val_err("5(3)"), ParseErrorKind::InvalidCallTarget);
    // neither can a call result; there are no higher-order call chains
    assert_eq!(val_err("f(1)(2)"), ParseErrorKind::InvalidCallTarget);
    // nor a parenthesised expression
    assert_eq!(val_err("(f)(1)"), ParseErrorKind::InvalidCallTarget);
}
