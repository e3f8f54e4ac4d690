#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

mod error;
mod lexer;
mod parser;
mod token;

pub use error::{LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::tokenize;
pub use parser::parse;
pub use token::{Tok, TokKind};
