use filmi_ast::ast::{BinOp, Expr, Lit, Stmt, UnOp};
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
fn multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3 parses as 1 + (2 * 3)
    let Expr::Binary {
        op: BinOp::Add,
        lhs,
        rhs,
        ..
    } = val("1 + 2 * 3")
    else {
        panic!("top should be Add");
    };
    assert!(matches!(*lhs, Expr::Literal { .. }));
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn grouping_overrides_precedence() {
    let Expr::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = val("(1 + 2) * 3")
    else {
        panic!("top should be Mul");
    };
    assert!(matches!(*lhs, Expr::Grouping { .. }));
}

#[test]
fn arithmetic_relational_equality_logical_layers() {
    // 1 + 2*3 == 7 && 4 < 5 || 0 == 1
    let e = val("1 + 2*3 == 7 && 4 < 5 || 0 == 1");
    if let Expr::Binary {
        op: BinOp::Or,
        lhs,
        rhs,
        ..
    } = e
    {
        assert!(matches!(*lhs, Expr::Binary { op: BinOp::And, .. }));
        assert!(matches!(*rhs, Expr::Binary { op: BinOp::Eq, .. }));
    } else {
        panic!("top should be Or");
    }
}

#[test]
fn binary_operators_are_left_associative() {
    // 1 - 2 - 3 parses as (1 - 2) - 3
    let Expr::Binary {
        op: BinOp::Sub,
        lhs,
        rhs,
        ..
    } = val("1 - 2 - 3")
    else {
        panic!("top should be Sub");
    };
    assert!(matches!(*lhs, Expr::Binary { op: BinOp::Sub, .. }));
    assert!(matches!(*rhs, Expr::Literal { .. }));
}

#[test]
fn remainder_sits_with_the_multiplicative_operators() {
    let Expr::Binary {
        op: BinOp::Add,
        rhs,
        ..
    } = val("1 + 7 % 2")
    else {
        panic!("top should be Add");
    };
    assert!(matches!(*rhs, Expr::Binary { op: BinOp::Rem, .. }));
}

#[test]
fn unary_is_right_associative_and_binds_tight() {
    let Expr::Unary {
        op: UnOp::Not,
        operand,
        ..
    } = val("!!sach")
    else {
        panic!("top should be Not");
    };
    assert!(matches!(*operand, Expr::Unary { op: UnOp::Not, .. }));

    // -1 * 2 parses as (-1) * 2
    let Expr::Binary {
        op: BinOp::Mul,
        lhs,
        ..
    } = val("-1 * 2")
    else {
        panic!("top should be Mul");
    };
    assert!(matches!(*lhs, Expr::Unary { op: UnOp::Neg, .. }));
}

#[test]
fn assignment_is_an_expression_and_right_associative() {
    // a = b = 1 parses as a = (b = 1)
    let Expr::Assign { name, value, .. } = val("a = b = 1") else {
        panic!("top should be Assign");
    };
    assert_eq!(name, "a");
    let Expr::Assign { name, value, .. } = *value else {
        panic!("nested Assign expected");
    };
    assert_eq!(name, "b");
    assert!(matches!(*value, Expr::Literal { value: Lit::Num(n), .. } if n == 1.0));
}

#[test]
fn statement_level_assignment_is_lowered_to_a_statement() {
    let toks = tokenize("action!\nmaan lo x = 1\nx = x + 1\npaisa vasool").expect("lex ok");
    let p = parse(&toks).expect("parse ok");
    let Stmt::Assign { name, value, .. } = &p.stmts[1] else {
        panic!("expected an assignment statement");
    };
    assert_eq!(name, "x");
    assert!(matches!(value, Expr::Binary { op: BinOp::Add, .. }));
}
