#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Semantic analysis. One walk over the AST rejects ill-formed programs
//! before the evaluator runs: unknown names, same-scope redeclaration,
//! wrong argument counts for statically-known functions, and misplaced
//! `dialogue wapas do` / `me bahar ja raha hu`. No type inference happens
//! here; operand typing is a runtime concern.

use std::collections::HashMap;

use filmi_ast::ast::{Block, Expr, Program, Stmt};
use thiserror::Error;

/// The kind of semantic error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemaErrorKind {
    #[error("function '{0}' is already defined")]
    DuplicateFunction(String),

    #[error("'{0}' is already declared in this scope")]
    DuplicateBinding(String),

    #[error("duplicate parameter name '{0}'")]
    DuplicateParameter(String),

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("undefined function '{0}'")]
    UndefinedFunction(String),

    #[error("function '{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("'dialogue wapas do' outside of a function")]
    ReturnOutsideFunction,

    #[error("'me bahar ja raha hu' outside of a loop")]
    BreakOutsideLoop,
}

/// A semantic error with the line of the offending node
#[derive(Debug, Clone, PartialEq)]
pub struct SemaError {
    pub kind: SemaErrorKind,
    pub line: u32,
}

impl SemaError {
    #[must_use]
    pub fn new(kind: SemaErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl std::fmt::Display for SemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at Line {}", self.kind, self.line)
    }
}

impl std::error::Error for SemaError {}

/// What a name is bound to in some lexical scope
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Variable,
    Parameter,
    Function { arity: usize },
}

/// Check a whole program, reporting the first semantic issue found.
pub fn analyze(program: &Program) -> Result<(), SemaError> {
    Analyzer::new().check_program(program)
}

pub struct Analyzer {
    /// Lexical scopes, innermost last. Lookup is scope-first: an inner
    /// variable may shadow an outer function.
    scopes: Vec<HashMap<String, Binding>>,
    /// Side table of top-level function signatures (name -> parameter count)
    functions: HashMap<String, usize>,
    loop_depth: u32,
    fn_depth: u32,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
            functions: HashMap::new(),
            loop_depth: 0,
            fn_depth: 0,
        }
    }

    /// Two passes over the top level: the first hoists function names so
    /// programs may call forward, the second walks every statement.
    pub fn check_program(&mut self, program: &Program) -> Result<(), SemaError> {
        for stmt in &program.stmts {
            if let Stmt::FuncDecl {
                name, params, line, ..
            } = stmt
            {
                if self.functions.contains_key(name) {
                    return Err(SemaError::new(
                        SemaErrorKind::DuplicateFunction(name.clone()),
                        *line,
                    ));
                }
                self.functions.insert(name.clone(), params.len());
                self.scopes[0].insert(
                    name.clone(),
                    Binding::Function {
                        arity: params.len(),
                    },
                );
            }
        }

        for stmt in &program.stmts {
            self.check_stmt(stmt, true)?;
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn declare(&mut self, name: &str, binding: Binding, line: u32) -> Result<(), SemaError> {
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if scope.contains_key(name) {
            let kind = match binding {
                Binding::Function { .. } => SemaErrorKind::DuplicateFunction(name.to_string()),
                Binding::Parameter => SemaErrorKind::DuplicateParameter(name.to_string()),
                Binding::Variable => SemaErrorKind::DuplicateBinding(name.to_string()),
            };
            return Err(SemaError::new(kind, line));
        }
        scope.insert(name.to_string(), binding);
        Ok(())
    }

    fn check_scoped_block(&mut self, block: &Block) -> Result<(), SemaError> {
        self.scopes.push(HashMap::new());
        let result = block.stmts.iter().try_for_each(|s| self.check_stmt(s, false));
        self.scopes.pop();
        result
    }

    fn check_stmt(&mut self, stmt: &Stmt, top_level: bool) -> Result<(), SemaError> {
        match stmt {
            Stmt::VarDecl { name, init, line } => {
                self.check_expr(init)?;
                self.declare(name, Binding::Variable, *line)
            }

            Stmt::Assign { name, value, line } => {
                self.check_expr(value)?;
                if self.resolve(name).is_none() {
                    return Err(SemaError::new(
                        SemaErrorKind::UndefinedVariable(name.clone()),
                        *line,
                    ));
                }
                Ok(())
            }

            Stmt::Print { args, .. } => args.iter().try_for_each(|a| self.check_expr(a)),

            Stmt::If {
                conds,
                branches,
                alt,
                ..
            } => {
                for (cond, branch) in conds.iter().zip(branches) {
                    self.check_expr(cond)?;
                    self.check_scoped_block(branch)?;
                }
                if let Some(alt) = alt {
                    self.check_scoped_block(alt)?;
                }
                Ok(())
            }

            Stmt::While { cond, body, .. } => {
                self.check_expr(cond)?;
                self.loop_depth += 1;
                let result = self.check_scoped_block(body);
                self.loop_depth -= 1;
                result
            }

            Stmt::Break { line } => {
                if self.loop_depth == 0 {
                    return Err(SemaError::new(SemaErrorKind::BreakOutsideLoop, *line));
                }
                Ok(())
            }

            Stmt::FuncDecl {
                name,
                params,
                body,
                line,
            } => {
                // top-level names were hoisted already; nested functions are
                // visible from their declaration onward
                if !top_level {
                    self.declare(
                        name,
                        Binding::Function {
                            arity: params.len(),
                        },
                        *line,
                    )?;
                }
                self.check_function(params, body, *line)
            }

            Stmt::Return { value, line } => {
                if self.fn_depth == 0 {
                    return Err(SemaError::new(SemaErrorKind::ReturnOutsideFunction, *line));
                }
                if let Some(value) = value {
                    self.check_expr(value)?;
                }
                Ok(())
            }

            Stmt::Expr { expr, .. } => self.check_expr(expr),

            Stmt::Block { block, .. } => self.check_scoped_block(block),
        }
    }

    fn check_function(&mut self, params: &[String], body: &Block, line: u32) -> Result<(), SemaError> {
        self.scopes.push(HashMap::new());
        let mut result = params
            .iter()
            .try_for_each(|param| self.declare(param, Binding::Parameter, line));

        if result.is_ok() {
            // a break may not cross the function boundary into an outer loop
            let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
            self.fn_depth += 1;
            result = body.stmts.iter().try_for_each(|s| self.check_stmt(s, false));
            self.fn_depth -= 1;
            self.loop_depth = saved_loop_depth;
        }

        self.scopes.pop();
        result
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<(), SemaError> {
        match expr {
            Expr::Literal { .. } => Ok(()),

            Expr::Ident { name, line } => {
                if self.resolve(name).is_none() {
                    return Err(SemaError::new(
                        SemaErrorKind::UndefinedVariable(name.clone()),
                        *line,
                    ));
                }
                Ok(())
            }

            Expr::Assign { name, value, line } => {
                self.check_expr(value)?;
                if self.resolve(name).is_none() {
                    return Err(SemaError::new(
                        SemaErrorKind::UndefinedVariable(name.clone()),
                        *line,
                    ));
                }
                Ok(())
            }

            Expr::Unary { operand, .. } => self.check_expr(operand),

            Expr::Binary { lhs, rhs, .. } => {
                self.check_expr(lhs)?;
                self.check_expr(rhs)
            }

            Expr::Grouping { inner, .. } => self.check_expr(inner),

            Expr::Call { callee, args, line } => {
                match self.resolve(callee) {
                    // a statically known function must be called with the
                    // declared number of arguments
                    Some(Binding::Function { arity }) => {
                        if args.len() != *arity {
                            return Err(SemaError::new(
                                SemaErrorKind::ArityMismatch {
                                    name: callee.clone(),
                                    expected: *arity,
                                    found: args.len(),
                                },
                                *line,
                            ));
                        }
                    }
                    // a function-valued variable or parameter is checked at
                    // call time by the evaluator
                    Some(_) => {}
                    None => {
                        return Err(SemaError::new(
                            SemaErrorKind::UndefinedFunction(callee.clone()),
                            *line,
                        ));
                    }
                }
                args.iter().try_for_each(|a| self.check_expr(a))
            }
        }
    }
}
