use crate::error::{LexError, LexErrorKind};
use crate::token::{Tok, TokKind};
use filmi_ast::loc::Loc;

/// Multi-word keyword phrases, longest first. The scanner tries these before
/// anything else at each token position, so ordering by descending length is
/// what makes the match greedy: a phrase that is a prefix of a longer phrase
/// can never win while the longer one matches.
const PHRASES: &[(&str, TokKind)] = &[
    ("me bahar ja raha hu", TokKind::KwBreak),
    ("chal bhai suru kar", TokKind::KwStart),
    ("dialogue wapas do", TokKind::KwReturn),
    ("jab tak hai jaan", TokKind::KwWhile),
    ("agar kismat rahi", TokKind::KwIf),
    ("ek baat bataun:", TokKind::KwPrint),
    ("bas khatam karo", TokKind::KwEnd),
    ("paisa vasool", TokKind::KwEnd),
    ("action!", TokKind::KwStart),
    ("maan lo", TokKind::KwVar),
    ("nahi to", TokKind::KwElseIf),
];

/// Tokenize a whole source string. The result always ends with an `Eof`
/// token carrying the trailing line/column; the first malformed input stops
/// the scan.
pub fn tokenize(src: &str) -> Result<Vec<Tok>, LexError> {
    Lexer::new(src).scan_all()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
                self.bump();
            }
            // line comment: // ... up to (not including) the newline
            if self.peek() == Some('/') && self.peek2() == Some('/') {
                self.bump();
                self.bump();
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }
            break;
        }
    }

    fn scan_all(mut self) -> Result<Vec<Tok>, LexError> {
        let mut toks = Vec::new();
        loop {
            self.skip_ws_and_comments();
            if self.peek().is_none() {
                toks.push(Tok {
                    kind: TokKind::Eof,
                    lexeme: String::new(),
                    line: self.line,
                    column: self.column,
                });
                return Ok(toks);
            }
            toks.push(self.next_tok()?);
        }
    }

    /// Case-insensitive longest match against the phrase table. A phrase
    /// ending in `!` or `:` matches on character equality alone; any other
    /// phrase must be followed by end-of-input or a non-identifier
    /// character, so `maan lo` never swallows the front of `maanager`.
    fn match_phrase(&self) -> Option<(TokKind, usize)> {
        'phrases: for (phrase, kind) in PHRASES {
            let mut len = 0;
            for pc in phrase.chars() {
                match self.chars.get(self.pos + len) {
                    Some(c) if c.to_ascii_lowercase() == pc => len += 1,
                    _ => continue 'phrases,
                }
            }
            let self_terminating = phrase.ends_with('!') || phrase.ends_with(':');
            if !self_terminating {
                if let Some(c) = self.chars.get(self.pos + len) {
                    if is_ident_char(*c) {
                        continue 'phrases;
                    }
                }
            }
            return Some((kind.clone(), len));
        }
        None
    }

    fn next_tok(&mut self) -> Result<Tok, LexError> {
        let line = self.line;
        let column = self.column;
        let start = self.pos;

        let tok = |kind: TokKind, lexeme: String| Tok {
            kind,
            lexeme,
            line,
            column,
        };

        if let Some((kind, len)) = self.match_phrase() {
            for _ in 0..len {
                self.bump();
            }
            let lexeme: String = self.chars[start..self.pos].iter().collect();
            return Ok(tok(kind, lexeme));
        }

        let Some(c) = self.bump() else {
            return Ok(tok(TokKind::Eof, String::new()));
        };

        // two-char operators first
        let kind = match c {
            '=' if self.peek() == Some('=') => {
                self.bump();
                TokKind::EqEq
            }
            '!' if self.peek() == Some('=') => {
                self.bump();
                TokKind::BangEq
            }
            '<' if self.peek() == Some('=') => {
                self.bump();
                TokKind::Le
            }
            '>' if self.peek() == Some('=') => {
                self.bump();
                TokKind::Ge
            }
            '&' if self.peek() == Some('&') => {
                self.bump();
                TokKind::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.bump();
                TokKind::OrOr
            }
            '&' | '|' => {
                return Err(LexError::new(LexErrorKind::HalfOperator(c), Loc::new(line, column)))
            }
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '{' => TokKind::LBrace,
            '}' => TokKind::RBrace,
            ',' => TokKind::Comma,
            ':' => TokKind::Colon,
            '=' => TokKind::Eq,
            '+' => TokKind::Plus,
            '-' => TokKind::Minus,
            '*' => TokKind::Star,
            '/' => TokKind::Slash,
            '%' => TokKind::Percent,
            '<' => TokKind::Lt,
            '>' => TokKind::Gt,
            '!' => TokKind::Bang,
            '"' => return self.scan_string(line, column, start),
            c if c.is_ascii_digit() => return self.scan_number(line, column, start),
            c if is_ident_start(c) => return Ok(self.scan_ident(line, column, start)),
            other => {
                return Err(LexError::new(LexErrorKind::UnexpectedChar(other), Loc::new(line, column)))
            }
        };

        let lexeme: String = self.chars[start..self.pos].iter().collect();
        Ok(tok(kind, lexeme))
    }

    fn scan_string(&mut self, line: u32, column: u32, start: usize) -> Result<Tok, LexError> {
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LexError::new(LexErrorKind::UnterminatedString, Loc::new(line, column)));
            };
            match c {
                '"' => break,
                '\\' => {
                    let Some(esc) = self.bump() else {
                        return Err(
                            LexError::new(LexErrorKind::UnterminatedString, Loc::new(line, column))
                        );
                    };
                    let real = match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '"' => '"',
                        '\\' => '\\',
                        other => other,
                    };
                    value.push(real);
                }
                other => value.push(other),
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        Ok(Tok {
            kind: TokKind::Str(value),
            lexeme,
            line,
            column,
        })
    }

    fn scan_number(&mut self, line: u32, column: u32, start: usize) -> Result<Tok, LexError> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        // a dot only belongs to the number when digits follow it
        if self.peek() == Some('.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit()) {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let value: f64 = lexeme.parse().map_err(|_| {
            LexError::new(
                LexErrorKind::InvalidNumber(lexeme.clone()),
                Loc::new(line, column),
            )
        })?;
        Ok(Tok {
            kind: TokKind::Num(value),
            lexeme,
            line,
            column,
        })
    }

    fn scan_ident(&mut self, line: u32, column: u32, start: usize) -> Tok {
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.bump();
        }
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let kind = match lexeme.to_ascii_lowercase().as_str() {
            "sach" => TokKind::KwTrue,
            "galat" => TokKind::KwFalse,
            "khaali" => TokKind::KwNil,
            "climax" => TokKind::KwFn,
            "warna" => TokKind::KwElse,
            _ => TokKind::Ident(lexeme.clone()),
        };
        Tok {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn phrase_table_is_sorted_longest_first() {
        for pair in PHRASES.windows(2) {
            assert!(
                pair[0].0.len() >= pair[1].0.len(),
                "'{}' must come before '{}'",
                pair[1].0,
                pair[0].0
            );
        }
    }

    #[test]
    fn phrases_lex_as_single_tokens() {
        assert_eq!(
            kinds("action! maan lo paisa vasool"),
            vec![TokKind::KwStart, TokKind::KwVar, TokKind::KwEnd, TokKind::Eof]
        );
    }

    #[test]
    fn phrase_matching_is_case_insensitive() {
        assert_eq!(
            kinds("Chal Bhai Suru Kar JAB TAK HAI JAAN"),
            vec![TokKind::KwStart, TokKind::KwWhile, TokKind::Eof]
        );
    }

    #[test]
    fn keyword_prefix_of_identifier_stays_identifier() {
        // 'maan lo' must not swallow the front of a longer word
        assert_eq!(
            kinds("maanager"),
            vec![TokKind::Ident("maanager".into()), TokKind::Eof]
        );
        assert_eq!(
            kinds("sachin"),
            vec![TokKind::Ident("sachin".into()), TokKind::Eof]
        );
    }

    #[test]
    fn phrase_followed_by_ident_char_falls_back_to_words() {
        // 'nahi tox' is two identifiers, not KwElseIf + junk
        assert_eq!(
            kinds("nahi tox"),
            vec![
                TokKind::Ident("nahi".into()),
                TokKind::Ident("tox".into()),
                TokKind::Eof
            ]
        );
    }

    #[test]
    fn terminator_phrases_need_no_word_boundary() {
        // the ':' terminator means the phrase matches even when glued to text
        assert_eq!(
            kinds("ek baat bataun:x"),
            vec![TokKind::KwPrint, TokKind::Ident("x".into()), TokKind::Eof]
        );
    }

    #[test]
    fn columns_point_at_lexeme_start() {
        let toks = tokenize("maan lo x = 12\n  x").unwrap();
        assert_eq!((toks[0].line, toks[0].column), (1, 1)); // maan lo
        assert_eq!((toks[1].line, toks[1].column), (1, 9)); // x
        assert_eq!((toks[2].line, toks[2].column), (1, 11)); // =
        assert_eq!((toks[3].line, toks[3].column), (1, 13)); // 12
        assert_eq!((toks[4].line, toks[4].column), (2, 3)); // x
        assert_eq!((toks[5].line, toks[5].column), (2, 4)); // eof
    }

    #[test]
    fn newlines_inside_strings_advance_lines() {
        let toks = tokenize("\"a\nb\" x").unwrap();
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[1].line, 2);
    }

    #[test]
    fn stray_half_operator_is_an_error() {
        let err = tokenize("1 & 2").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::HalfOperator('&'));
        assert_eq!((err.loc.line, err.loc.column), (1, 3));
    }

    #[test]
    fn number_dot_without_digits_is_not_consumed() {
        let err = tokenize("1.").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('.'));
    }
}
