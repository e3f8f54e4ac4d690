//! Evaluator for Filmi programs
//!
//! Implements a tree-walking interpreter with lexical scoping, closures,
//! and non-local control flow (return, break).

use std::collections::HashMap;
use std::rc::Rc;

use filmi_ast::ast::{BinOp, Block, Expr, Lit, Program, Stmt, UnOp};
use thiserror::Error;

/// Default iteration cap for `jab tak hai jaan` loops. A safety rail against
/// runaway programs, not a language feature.
pub const DEFAULT_LOOP_LIMIT: usize = 100_000;

/// Maximum call depth to prevent stack overflow from deep recursion
const MAX_CALL_DEPTH: u32 = 255;

/// The kind of runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("'{0}' is not a function")]
    NotAFunction(String),

    #[error("unary '-' needs a number")]
    NegateNonNumber,

    #[error("operands of '{0}' must be numbers")]
    NumericOperands(&'static str),

    #[error("operands of '+' must be numbers, or one of them a string")]
    AddOperands,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("loop limit exceeded (limit: {0})")]
    LoopLimitExceeded(usize),

    #[error("maximum call depth exceeded (limit: {0})")]
    CallDepthExceeded(u32),

    #[error("'me bahar ja raha hu' escaped its loop")]
    StrayBreak,

    #[error("'dialogue wapas do' escaped its function")]
    StrayReturn,
}

/// A runtime error with the line it was raised on
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: u32,
}

impl RuntimeError {
    #[must_use]
    pub fn new(kind: RuntimeErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at Line {}", self.kind, self.line)
    }
}

impl std::error::Error for RuntimeError {}

/// Runtime values
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    /// The language's null, printed as `khaali`
    Unit,
    /// Function closure holding its defining environment
    Function(Rc<FuncValue>),
}

#[derive(Debug)]
pub struct FuncValue {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    /// Environment active at the declaration — the closure observes later
    /// mutations of that scope, it is not a snapshot.
    pub env: EnvId,
}

impl Value {
    /// `khaali` and `galat` are falsy; everything else (including `0` and
    /// the empty string) is truthy.
    #[must_use]
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Unit | Value::Bool(false))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // f64's shortest-roundtrip formatting prints whole numbers
            // without a decimal point, which is exactly the surface rule
            Value::Number(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("sach"),
            Value::Bool(false) => f.write_str("galat"),
            Value::Unit => f.write_str("khaali"),
            Value::Function(func) => write!(f, "<function {}>", func.name),
        }
    }
}

/// Deep value equality: same type and same scalar value. Functions compare
/// by identity.
fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Unit, Value::Unit) => true,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Completion of a statement
///
/// `Return` bubbles up to the enclosing call frame, `Break` to the
/// enclosing loop. Expressions evaluate to plain values; only statements
/// carry a completion.
#[derive(Debug)]
pub enum ControlFlow {
    Normal,
    Return(Value),
    Break,
}

/// Index into the interpreter's environment arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvId(usize);

/// One scope: bindings plus a parent link
#[derive(Debug, Default)]
struct EnvFrame {
    vars: HashMap<String, Value>,
    parent: Option<EnvId>,
}

/// The tree-walking interpreter.
///
/// Environments live in an arena indexed by [`EnvId`]: frames are never
/// freed during a run, so a closure's captured scope stays valid for as
/// long as the function value is reachable, and the cycles closures create
/// through their defining scope are harmless.
pub struct Interpreter {
    envs: Vec<EnvFrame>,
    output: Vec<String>,
    loop_limit: usize,
    call_depth: u32,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_loop_limit(DEFAULT_LOOP_LIMIT)
    }

    #[must_use]
    pub fn with_loop_limit(loop_limit: usize) -> Self {
        Self {
            envs: Vec::new(),
            output: Vec::new(),
            loop_limit,
            call_depth: 0,
        }
    }

    /// Execute a validated program and return its printed lines in order.
    pub fn run(mut self, program: &Program) -> Result<Vec<String>, RuntimeError> {
        let globals = self.new_frame(None);
        for stmt in &program.stmts {
            // the analyser rejects programs where break/return could reach
            // the top level; convert a leak into an error rather than unwind
            // past the host boundary
            match self.exec_stmt(stmt, globals)? {
                ControlFlow::Normal => {}
                ControlFlow::Return(_) => {
                    return Err(RuntimeError::new(RuntimeErrorKind::StrayReturn, stmt.line()))
                }
                ControlFlow::Break => {
                    return Err(RuntimeError::new(RuntimeErrorKind::StrayBreak, stmt.line()))
                }
            }
        }
        Ok(self.output)
    }

    // ======= environments =======

    fn new_frame(&mut self, parent: Option<EnvId>) -> EnvId {
        self.envs.push(EnvFrame {
            vars: HashMap::new(),
            parent,
        });
        EnvId(self.envs.len() - 1)
    }

    /// Insert into the given scope. Duplicates were rejected by the
    /// analyser, so this overwrites unconditionally.
    fn define(&mut self, env: EnvId, name: &str, value: Value) {
        self.envs[env.0].vars.insert(name.to_string(), value);
    }

    /// Look a name up the parent chain
    fn lookup(&self, env: EnvId, name: &str) -> Option<Value> {
        let mut cur = Some(env);
        while let Some(EnvId(i)) = cur {
            if let Some(v) = self.envs[i].vars.get(name) {
                return Some(v.clone());
            }
            cur = self.envs[i].parent;
        }
        None
    }

    /// Write into the nearest binding up the parent chain
    fn assign(&mut self, env: EnvId, name: &str, value: Value) -> bool {
        let mut cur = Some(env);
        while let Some(EnvId(i)) = cur {
            if self.envs[i].vars.contains_key(name) {
                self.envs[i].vars.insert(name.to_string(), value);
                return true;
            }
            cur = self.envs[i].parent;
        }
        false
    }

    // ======= statements =======

    /// Run a statement list in the given scope. The caller decides whether
    /// that scope is fresh, so the bodies of if/while/functions are not
    /// double-scoped.
    fn exec_block(&mut self, block: &Block, env: EnvId) -> Result<ControlFlow, RuntimeError> {
        for stmt in &block.stmts {
            match self.exec_stmt(stmt, env)? {
                ControlFlow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: EnvId) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::VarDecl { name, init, .. } => {
                let value = self.eval_expr(init, env)?;
                self.define(env, name, value);
                Ok(ControlFlow::Normal)
            }

            Stmt::Assign { name, value, line } => {
                let value = self.eval_expr(value, env)?;
                if !self.assign(env, name, value) {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::UndefinedVariable(name.clone()),
                        *line,
                    ));
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::Print { args, .. } => {
                let mut parts = Vec::with_capacity(args.len());
                for arg in args {
                    parts.push(self.eval_expr(arg, env)?.to_string());
                }
                self.output.push(parts.join(" "));
                Ok(ControlFlow::Normal)
            }

            Stmt::If {
                conds,
                branches,
                alt,
                ..
            } => {
                for (cond, branch) in conds.iter().zip(branches) {
                    if self.eval_expr(cond, env)?.truthy() {
                        let branch_env = self.new_frame(Some(env));
                        return self.exec_block(branch, branch_env);
                    }
                }
                if let Some(alt) = alt {
                    let alt_env = self.new_frame(Some(env));
                    return self.exec_block(alt, alt_env);
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::While { cond, body, line } => {
                let mut iterations = 0usize;
                while self.eval_expr(cond, env)?.truthy() {
                    iterations += 1;
                    if iterations > self.loop_limit {
                        return Err(RuntimeError::new(
                            RuntimeErrorKind::LoopLimitExceeded(self.loop_limit),
                            *line,
                        ));
                    }
                    let body_env = self.new_frame(Some(env));
                    match self.exec_block(body, body_env)? {
                        ControlFlow::Normal => {}
                        ControlFlow::Break => break,
                        ret @ ControlFlow::Return(_) => return Ok(ret),
                    }
                }
                Ok(ControlFlow::Normal)
            }

            Stmt::Break { .. } => Ok(ControlFlow::Break),

            Stmt::FuncDecl {
                name, params, body, ..
            } => {
                let func = FuncValue {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    env,
                };
                self.define(env, name, Value::Function(Rc::new(func)));
                Ok(ControlFlow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Unit,
                };
                Ok(ControlFlow::Return(value))
            }

            Stmt::Expr { expr, .. } => {
                self.eval_expr(expr, env)?;
                Ok(ControlFlow::Normal)
            }

            Stmt::Block { block, .. } => {
                let block_env = self.new_frame(Some(env));
                self.exec_block(block, block_env)
            }
        }
    }

    // ======= expressions =======

    fn eval_expr(&mut self, expr: &Expr, env: EnvId) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                Lit::Num(v) => Value::Number(*v),
                Lit::Str(s) => Value::Str(s.clone()),
                Lit::Bool(b) => Value::Bool(*b),
                Lit::Unit => Value::Unit,
            }),

            Expr::Ident { name, line } => self.lookup(env, name).ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::UndefinedVariable(name.clone()), *line)
            }),

            Expr::Assign { name, value, line } => {
                let value = self.eval_expr(value, env)?;
                if !self.assign(env, name, value.clone()) {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::UndefinedVariable(name.clone()),
                        *line,
                    ));
                }
                Ok(value)
            }

            Expr::Grouping { inner, .. } => self.eval_expr(inner, env),

            Expr::Unary { op, operand, line } => {
                let value = self.eval_expr(operand, env)?;
                match op {
                    UnOp::Not => Ok(Value::Bool(!value.truthy())),
                    UnOp::Neg => match value {
                        Value::Number(v) => Ok(Value::Number(-v)),
                        _ => Err(RuntimeError::new(RuntimeErrorKind::NegateNonNumber, *line)),
                    },
                }
            }

            Expr::Binary { op, lhs, rhs, line } => self.eval_binary(*op, lhs, rhs, *line, env),

            Expr::Call { callee, args, line } => self.eval_call(callee, args, *line, env),
        }
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        line: u32,
        env: EnvId,
    ) -> Result<Value, RuntimeError> {
        // logical operators combine truthiness and short-circuit
        match op {
            BinOp::And => {
                if !self.eval_expr(lhs, env)?.truthy() {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval_expr(rhs, env)?.truthy()));
            }
            BinOp::Or => {
                if self.eval_expr(lhs, env)?.truthy() {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval_expr(rhs, env)?.truthy()));
            }
            _ => {}
        }

        let l = self.eval_expr(lhs, env)?;
        let r = self.eval_expr(rhs, env)?;

        match op {
            BinOp::Eq => Ok(Value::Bool(value_eq(&l, &r))),
            BinOp::Ne => Ok(Value::Bool(!value_eq(&l, &r))),

            // `+` concatenates as soon as either side is a string
            BinOp::Add => match (&l, &r) {
                (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{l}{r}"))),
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                _ => Err(RuntimeError::new(RuntimeErrorKind::AddOperands, line)),
            },

            BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem => {
                let (a, b) = self.numeric_operands(op, &l, &r, line)?;
                match op {
                    BinOp::Sub => Ok(Value::Number(a - b)),
                    BinOp::Mul => Ok(Value::Number(a * b)),
                    BinOp::Div | BinOp::Rem => {
                        if b == 0.0 {
                            return Err(RuntimeError::new(
                                RuntimeErrorKind::DivisionByZero,
                                line,
                            ));
                        }
                        if matches!(op, BinOp::Div) {
                            Ok(Value::Number(a / b))
                        } else {
                            Ok(Value::Number(a % b))
                        }
                    }
                    _ => unreachable!("outer match covers the arithmetic operators"),
                }
            }

            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let (a, b) = self.numeric_operands(op, &l, &r, line)?;
                let result = match op {
                    BinOp::Lt => a < b,
                    BinOp::Le => a <= b,
                    BinOp::Gt => a > b,
                    BinOp::Ge => a >= b,
                    _ => unreachable!("outer match covers the comparisons"),
                };
                Ok(Value::Bool(result))
            }

            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }

    fn numeric_operands(
        &self,
        op: BinOp,
        l: &Value,
        r: &Value,
        line: u32,
    ) -> Result<(f64, f64), RuntimeError> {
        match (l, r) {
            (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
            _ => Err(RuntimeError::new(
                RuntimeErrorKind::NumericOperands(op.symbol()),
                line,
            )),
        }
    }

    fn eval_call(
        &mut self,
        callee: &str,
        args: &[Expr],
        line: u32,
        env: EnvId,
    ) -> Result<Value, RuntimeError> {
        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expr(arg, env)?);
        }

        let target = self.lookup(env, callee).ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::UndefinedVariable(callee.to_string()), line)
        })?;
        let Value::Function(func) = target else {
            return Err(RuntimeError::new(
                RuntimeErrorKind::NotAFunction(callee.to_string()),
                line,
            ));
        };

        self.call_depth += 1;
        if self.call_depth > MAX_CALL_DEPTH {
            self.call_depth -= 1;
            return Err(RuntimeError::new(
                RuntimeErrorKind::CallDepthExceeded(MAX_CALL_DEPTH),
                line,
            ));
        }

        // the frame's parent is the captured environment, not the caller's:
        // this is what makes name resolution lexical
        let frame = self.new_frame(Some(func.env));
        for (i, param) in func.params.iter().enumerate() {
            // indirect calls may arrive with too few arguments; the missing
            // ones bind to khaali, extras are dropped
            let value = arg_vals.get(i).cloned().unwrap_or(Value::Unit);
            self.define(frame, param, value);
        }

        let flow = self.exec_block(&func.body, frame);
        self.call_depth -= 1;

        match flow? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal => Ok(Value::Unit),
            ControlFlow::Break => Err(RuntimeError::new(RuntimeErrorKind::StrayBreak, line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Expr {
        Expr::Literal {
            value: Lit::Num(v),
            line: 1,
        }
    }

    fn eval(expr: &Expr) -> Result<Value, RuntimeError> {
        let mut interp = Interpreter::new();
        let env = interp.new_frame(None);
        interp.eval_expr(expr, env)
    }

    #[test]
    fn truthiness_table() {
        assert!(!Value::Unit.truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(Value::Bool(true).truthy());
        assert!(Value::Number(0.0).truthy());
        assert!(Value::Str(String::new()).truthy());
    }

    #[test]
    fn stringification() {
        assert_eq!(Value::Unit.to_string(), "khaali");
        assert_eq!(Value::Bool(true).to_string(), "sach");
        assert_eq!(Value::Bool(false).to_string(), "galat");
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let expr = Expr::Binary {
            op: BinOp::Div,
            lhs: Box::new(num(10.0)),
            rhs: Box::new(num(0.0)),
            line: 3,
        };
        let err = eval(&expr).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::DivisionByZero);
        assert_eq!(err.line, 3);
    }

    #[test]
    fn plus_concatenates_with_a_string_side() {
        let expr = Expr::Binary {
            op: BinOp::Add,
            lhs: Box::new(Expr::Literal {
                value: Lit::Str("Count: ".into()),
                line: 1,
            }),
            rhs: Box::new(num(42.0)),
            line: 1,
        };
        let Value::Str(s) = eval(&expr).unwrap() else {
            panic!("expected a string");
        };
        assert_eq!(s, "Count: 42");
    }

    #[test]
    fn assignment_walks_the_parent_chain() {
        let mut interp = Interpreter::new();
        let outer = interp.new_frame(None);
        let inner = interp.new_frame(Some(outer));
        interp.define(outer, "x", Value::Number(1.0));
        assert!(interp.assign(inner, "x", Value::Number(2.0)));
        let Some(Value::Number(v)) = interp.lookup(outer, "x") else {
            panic!("x should still resolve in the outer scope");
        };
        assert_eq!(v, 2.0);
        assert!(!interp.assign(inner, "missing", Value::Unit));
    }
}
