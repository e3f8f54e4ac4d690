#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! The Filmi pipeline: lexer, parser, analyser, evaluator, wired together
//! behind [`run`]. Each stage halts the pipeline with its own error class;
//! rendering is uniform: `<class> (Line L[, Column C]): <message>`.

pub mod eval;

use eval::{Interpreter, RuntimeError, DEFAULT_LOOP_LIMIT};
use filmi_parse::{LexError, ParseError};
use filmi_sema::SemaError;

/// A failure from any of the four pipeline stages.
#[derive(Debug)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Sema(SemaError),
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "Lexer Error ({}): {}", e.loc, e.kind),
            Error::Parse(e) => write!(f, "Parser Error ({}): {}", e.loc, e.kind),
            Error::Sema(e) => write!(f, "Semantic Error (Line {}): {}", e.line, e.kind),
            Error::Runtime(e) => write!(f, "Runtime Error (Line {}): {}", e.line, e.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Lex(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Sema(e) => Some(e),
            Error::Runtime(e) => Some(e),
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<SemaError> for Error {
    fn from(e: SemaError) -> Self {
        Error::Sema(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}

/// Run a whole source string and return its printed lines, in order and
/// without trailing newlines. The first error from any stage halts the
/// pipeline.
pub fn run(source: &str) -> Result<Vec<String>, Error> {
    run_with_limit(source, DEFAULT_LOOP_LIMIT)
}

/// [`run`], with a caller-chosen `jab tak hai jaan` iteration cap.
pub fn run_with_limit(source: &str, loop_limit: usize) -> Result<Vec<String>, Error> {
    let tokens = filmi_parse::tokenize(source)?;
    let program = filmi_parse::parse(&tokens)?;
    filmi_sema::analyze(&program)?;
    Ok(Interpreter::with_loop_limit(loop_limit).run(&program)?)
}
