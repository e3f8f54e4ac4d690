#[derive(Debug, Clone, PartialEq)]
pub enum TokKind {
    Eof,
    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    // assignment
    Eq,
    // arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // equality
    EqEq,
    BangEq,
    // relational
    Lt,
    Le,
    Gt,
    Ge,
    // logical
    AndAnd,
    OrOr,
    Bang,
    // idents / keywords
    Ident(String),
    /// `action!` / `chal bhai suru kar`
    KwStart,
    /// `paisa vasool` / `bas khatam karo`
    KwEnd,
    /// `maan lo`
    KwVar,
    /// `agar kismat rahi`
    KwIf,
    /// `nahi to`
    KwElseIf,
    /// `warna`
    KwElse,
    /// `jab tak hai jaan`
    KwWhile,
    /// `me bahar ja raha hu`
    KwBreak,
    /// `climax`
    KwFn,
    /// `dialogue wapas do`
    KwReturn,
    /// `ek baat bataun:`
    KwPrint,
    /// `sach`
    KwTrue,
    /// `galat`
    KwFalse,
    /// `khaali`
    KwNil,
    // literals
    Num(f64),
    Str(String),
}

impl std::fmt::Display for TokKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokKind::Eof => "end of input",
            TokKind::LParen => "'('",
            TokKind::RParen => "')'",
            TokKind::LBrace => "'{'",
            TokKind::RBrace => "'}'",
            TokKind::Comma => "','",
            TokKind::Colon => "':'",
            TokKind::Eq => "'='",
            TokKind::Plus => "'+'",
            TokKind::Minus => "'-'",
            TokKind::Star => "'*'",
            TokKind::Slash => "'/'",
            TokKind::Percent => "'%'",
            TokKind::EqEq => "'=='",
            TokKind::BangEq => "'!='",
            TokKind::Lt => "'<'",
            TokKind::Le => "'<='",
            TokKind::Gt => "'>'",
            TokKind::Ge => "'>='",
            TokKind::AndAnd => "'&&'",
            TokKind::OrOr => "'||'",
            TokKind::Bang => "'!'",
            TokKind::Ident(name) => return write!(f, "identifier '{name}'"),
            TokKind::KwStart => "'action!'",
            TokKind::KwEnd => "'paisa vasool'",
            TokKind::KwVar => "'maan lo'",
            TokKind::KwIf => "'agar kismat rahi'",
            TokKind::KwElseIf => "'nahi to'",
            TokKind::KwElse => "'warna'",
            TokKind::KwWhile => "'jab tak hai jaan'",
            TokKind::KwBreak => "'me bahar ja raha hu'",
            TokKind::KwFn => "'climax'",
            TokKind::KwReturn => "'dialogue wapas do'",
            TokKind::KwPrint => "'ek baat bataun:'",
            TokKind::KwTrue => "'sach'",
            TokKind::KwFalse => "'galat'",
            TokKind::KwNil => "'khaali'",
            TokKind::Num(v) => return write!(f, "number {v}"),
            TokKind::Str(_) => "string literal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Tok {
    pub kind: TokKind,
    /// Exact source slice the token was scanned from
    pub lexeme: String,
    /// 1-based line of the first character
    pub line: u32,
    /// 1-based column of the first character
    pub column: u32,
}
