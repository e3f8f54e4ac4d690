use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Tok, TokKind};
use filmi_ast::ast::{BinOp, Block, Expr, Lit, Program, Stmt, UnOp};
use filmi_ast::loc::Loc;

/// Maximum nesting depth for blocks, conditionals, and grouped/unary
/// expressions. This prevents stack overflow from pathological input.
const MAX_NESTING_DEPTH: u32 = 512;

/// Parse a token stream (as produced by [`crate::tokenize`]) into a
/// [`Program`]. The first syntactic error halts the parse.
pub fn parse(tokens: &[Tok]) -> Result<Program, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MissingProgramStart,
            Loc::new(1, 1),
        ));
    }
    let mut p = Parser::new(tokens);
    p.parse_program()
}

struct Parser<'a> {
    toks: &'a [Tok],
    pos: usize,
    /// Current nesting depth for blocks/conditionals/groups
    depth: u32,
}

impl<'a> Parser<'a> {
    fn new(toks: &'a [Tok]) -> Self {
        Self {
            toks,
            pos: 0,
            depth: 0,
        }
    }

    fn enter_nesting(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                self.loc(),
            ));
        }
        Ok(())
    }

    fn exit_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn cur(&self) -> &Tok {
        &self.toks[self.pos.min(self.toks.len() - 1)]
    }

    fn loc(&self) -> Loc {
        Loc::new(self.cur().line, self.cur().column)
    }

    fn bump(&mut self) {
        if !matches!(self.cur().kind, TokKind::Eof) {
            self.pos += 1;
        }
    }

    fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur().kind) == std::mem::discriminant(k)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.cur().kind.to_string(),
            },
            self.loc(),
        )
    }

    fn expect(&mut self, k: &TokKind) -> Result<Tok, ParseError> {
        if self.at(k) {
            let t = self.cur().clone();
            self.bump();
            Ok(t)
        } else {
            Err(self.unexpected(&k.to_string()))
        }
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        match &self.cur().kind {
            TokKind::Ident(s) => {
                let name = s.clone();
                self.bump();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    // ======= program / declarations =======

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        if !self.at(&TokKind::KwStart) {
            return Err(ParseError::new(
                ParseErrorKind::MissingProgramStart,
                self.loc(),
            ));
        }
        self.bump();

        let mut stmts = Vec::new();
        loop {
            match self.cur().kind {
                TokKind::KwEnd => {
                    self.bump();
                    break;
                }
                TokKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::MissingProgramEnd,
                        self.loc(),
                    ))
                }
                _ => stmts.push(self.parse_declaration()?),
            }
        }

        // tokens after the end keyword are ignored
        Ok(Program { stmts })
    }

    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        match self.cur().kind {
            TokKind::KwVar => self.parse_var_decl(),
            TokKind::KwFn => self.parse_func_decl(),
            _ => self.parse_statement(),
        }
    }

    fn parse_var_decl(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // maan lo
        let name = self.parse_name()?;
        self.expect(&TokKind::Eq)?;
        let init = self.parse_expr()?;
        Ok(Stmt::VarDecl { name, init, line })
    }

    fn parse_func_decl(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // climax
        let name = self.parse_name()?;

        self.expect(&TokKind::LParen)?;
        let mut params = Vec::new();
        if !self.at(&TokKind::RParen) {
            loop {
                params.push(self.parse_name()?);
                if self.at(&TokKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(&TokKind::RParen)?;

        let body = self.parse_block()?;
        Ok(Stmt::FuncDecl {
            name,
            params,
            body,
            line,
        })
    }

    // ======= statements =======

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.cur().kind {
            TokKind::KwIf => self.parse_if(),
            TokKind::KwWhile => self.parse_while(),
            TokKind::KwReturn => self.parse_return(),
            TokKind::KwPrint => self.parse_print(),
            TokKind::KwBreak => {
                let line = self.cur().line;
                self.bump();
                Ok(Stmt::Break { line })
            }
            TokKind::LBrace => {
                let line = self.cur().line;
                let block = self.parse_block()?;
                Ok(Stmt::Block { block, line })
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// `{ declaration* }` — the statement list only; scoping is decided by
    /// whichever construct owns the block.
    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.enter_nesting()?;
        let result = self.parse_block_inner();
        self.exit_nesting();
        result
    }

    fn parse_block_inner(&mut self) -> Result<Block, ParseError> {
        self.expect(&TokKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.at(&TokKind::RBrace) {
            if self.at(&TokKind::Eof) {
                return Err(self.unexpected("'}'"));
            }
            stmts.push(self.parse_declaration()?);
        }
        self.expect(&TokKind::RBrace)?;
        Ok(Block { stmts })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // agar kismat rahi

        self.expect(&TokKind::LParen)?;
        let first = self.parse_expr()?;
        self.expect(&TokKind::RParen)?;
        let mut conds = vec![first];
        let mut branches = vec![self.parse_block()?];

        while self.at(&TokKind::KwElseIf) {
            self.bump();
            self.expect(&TokKind::LParen)?;
            conds.push(self.parse_expr()?);
            self.expect(&TokKind::RParen)?;
            branches.push(self.parse_block()?);
        }

        let alt = if self.at(&TokKind::KwElse) {
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            conds,
            branches,
            alt,
            line,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // jab tak hai jaan
        self.expect(&TokKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body, line })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // dialogue wapas do
        let value = match self.cur().kind {
            TokKind::RBrace | TokKind::KwEnd | TokKind::Eof => None,
            _ => Some(self.parse_expr()?),
        };
        Ok(Stmt::Return { value, line })
    }

    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        self.bump(); // ek baat bataun:
        let mut args = vec![self.parse_expr()?];
        while self.at(&TokKind::Comma) {
            self.bump();
            args.push(self.parse_expr()?);
        }
        Ok(Stmt::Print { args, line })
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.cur().line;
        match self.parse_expr()? {
            // an assignment that is the whole statement gets its own node
            Expr::Assign { name, value, line } => Ok(Stmt::Assign {
                name,
                value: *value,
                line,
            }),
            expr => Ok(Stmt::Expr { expr, line }),
        }
    }

    // ======= expressions =======
    //
    // Precedence, lowest to highest; every binary level is left-associative:
    //   assignment (right-assoc)
    //   ||
    //   &&
    //   == !=
    //   < > <= >=
    //   + -
    //   * / %
    //   unary ! - (right-assoc)
    //   call
    //   primary

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logic_or()?;
        if self.at(&TokKind::Eq) {
            let eq_loc = self.loc();
            self.bump();
            let value = self.parse_assignment()?;
            return match expr {
                Expr::Ident { name, line } => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                    line,
                }),
                _ => Err(ParseError::new(
                    ParseErrorKind::InvalidAssignmentTarget,
                    eq_loc,
                )),
            };
        }
        Ok(expr)
    }

    fn parse_logic_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_logic_and()?;
        while self.at(&TokKind::OrOr) {
            self.bump();
            let rhs = self.parse_logic_and()?;
            lhs = binary(BinOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_logic_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_equality()?;
        while self.at(&TokKind::AndAnd) {
            self.bump();
            let rhs = self.parse_equality()?;
            lhs = binary(BinOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.cur().kind {
                TokKind::EqEq => BinOp::Eq,
                TokKind::BangEq => BinOp::Ne,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.cur().kind {
                TokKind::Lt => BinOp::Lt,
                TokKind::Le => BinOp::Le,
                TokKind::Gt => BinOp::Gt,
                TokKind::Ge => BinOp::Ge,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.cur().kind {
                TokKind::Plus => BinOp::Add,
                TokKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.cur().kind {
                TokKind::Star => BinOp::Mul,
                TokKind::Slash => BinOp::Div,
                TokKind::Percent => BinOp::Rem,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cur().kind {
            TokKind::Bang => Some(UnOp::Not),
            TokKind::Minus => Some(UnOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let line = self.cur().line;
            self.enter_nesting()?;
            self.bump();
            let operand = self.parse_unary();
            self.exit_nesting();
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand?),
                line,
            });
        }
        self.parse_call()
    }

    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.at(&TokKind::LParen) {
            let lparen_loc = self.loc();
            let (callee, line) = match expr {
                Expr::Ident { name, line } => (name, line),
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidCallTarget,
                        lparen_loc,
                    ))
                }
            };
            self.bump(); // (
            let mut args = Vec::new();
            if !self.at(&TokKind::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if self.at(&TokKind::Comma) {
                        self.bump();
                        continue;
                    }
                    break;
                }
            }
            self.expect(&TokKind::RParen)?;
            expr = Expr::Call { callee, args, line };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let line = self.cur().line;
        let kind = self.cur().kind.clone();
        match kind {
            TokKind::KwTrue => {
                self.bump();
                Ok(Expr::Literal {
                    value: Lit::Bool(true),
                    line,
                })
            }
            TokKind::KwFalse => {
                self.bump();
                Ok(Expr::Literal {
                    value: Lit::Bool(false),
                    line,
                })
            }
            TokKind::KwNil => {
                self.bump();
                Ok(Expr::Literal {
                    value: Lit::Unit,
                    line,
                })
            }
            TokKind::Num(v) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Lit::Num(v),
                    line,
                })
            }
            TokKind::Str(s) => {
                self.bump();
                Ok(Expr::Literal {
                    value: Lit::Str(s),
                    line,
                })
            }
            TokKind::Ident(name) => {
                self.bump();
                Ok(Expr::Ident { name, line })
            }
            TokKind::LParen => {
                self.enter_nesting()?;
                self.bump();
                let inner = self.parse_expr();
                let inner = inner.and_then(|e| {
                    self.expect(&TokKind::RParen)?;
                    Ok(e)
                });
                self.exit_nesting();
                Ok(Expr::Grouping {
                    inner: Box::new(inner?),
                    line,
                })
            }
            other => Err(ParseError::new(
                ParseErrorKind::ExpectedExpression(other.to_string()),
                self.loc(),
            )),
        }
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    let line = lhs.line();
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        line,
    }
}
