use filmi_ast::loc::Loc;
use thiserror::Error;

/// The kind of lexical error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("'{0}' must be doubled as '{0}{0}'")]
    HalfOperator(char),
}

/// A lexical error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub loc: Loc,
}

impl LexError {
    #[must_use]
    pub fn new(kind: LexErrorKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.loc)
    }
}

impl std::error::Error for LexError {}

/// The kind of parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("a program must open with 'action!' (or 'chal bhai suru kar')")]
    MissingProgramStart,

    #[error("a program must close with 'paisa vasool' (or 'bas khatam karo')")]
    MissingProgramEnd,

    #[error("expected an expression, found {0}")]
    ExpectedExpression(String),

    #[error("only a plain name can be assigned to")]
    InvalidAssignmentTarget,

    #[error("only a function name can be called")]
    InvalidCallTarget,

    #[error("maximum nesting depth exceeded (limit: {0})")]
    NestingTooDeep(u32),
}

/// A parse error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub loc: Loc,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, loc: Loc) -> Self {
        Self { kind, loc }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.loc)
    }
}

impl std::error::Error for ParseError {}
