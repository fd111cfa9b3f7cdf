//! Análisis léxico.
//!
//! Convierte el texto fuente completo en un flujo de [`Token`]s bajo
//! demanda. No hay retroceso más allá del lookahead de un carácter en
//! [`Lexer::peek`], usado para reconocer operadores de dos caracteres:
//! el lexer nunca rebobina, es un único recorrido O(n) sin búfer de
//! tokens.

use crate::error::LexError;
use crate::source::{Located, SourceLines};

/// The closed set of lexical unit kinds (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Newline,
    Number,
    Identifier,
    String,

    // Keywords
    Print,
    Println,
    /// Supplemental statement keyword, see SPEC_FULL.md §3/§4.3 — not
    /// present in the distilled grammar, ported from the original
    /// implementation's `FMTPRINT` token kind.
    Fmt,
    Input,
    Let,
    Var,
    If,
    Then,
    Else,
    Elsif,
    End,
    While,
    Repeat,
    For,
    To,
    By,
    Do,

    // Type names
    Nat,
    Int,
    Real,
    Str,

    // Operators
    Eq,
    Plus,
    Minus,
    Asterisk,
    Slash,
    ColonEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    NotEq,
    Colon,
    ModSign,
}

impl TokenKind {
    /// Matches a lowercased identifier lexeme against the keyword
    /// table.
    ///
    /// Keyword matching is case-sensitive on the *captured* text: the
    /// keyword table itself is defined in lowercase, so `IF`/`If` lex
    /// as plain identifiers, only `if` is the keyword. This reproduces
    /// `calci/lex.py::checkIfKeyword`'s behavior — decided
    /// intentionally, see DESIGN.md Open Question 1.
    fn keyword(text: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match text {
            "print" => Print,
            "println" => Println,
            "fmt" => Fmt,
            "input" => Input,
            "let" => Let,
            "var" => Var,
            "if" => If,
            "then" => Then,
            "else" => Else,
            "elsif" => Elsif,
            "end" => End,
            "while" => While,
            "repeat" => Repeat,
            "for" => For,
            "to" => To,
            "by" => By,
            "do" => Do,
            "nat" => Nat,
            "int" => Int,
            "real" => Real,
            "str" => Str,
            _ => return None,
        })
    }
}

/// An indivisible lexical unit: a kind plus the literal text that
/// produced it. Tokens are ephemeral — the parser holds at most two at
/// a time (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }
}

/// Lexer state: the full source text (with a trailing newline appended
/// to guarantee terminator handling), the 0-based cursor, the current
/// byte (0 is the NUL sentinel past the end), a line-split view for
/// diagnostics, and the current 1-based line number.
///
/// Calci source is specified as UTF-8-compatible ASCII (identifiers,
/// operators, and keywords are all ASCII), so the cursor walks bytes
/// rather than `char`s — this avoids re-validating UTF-8 boundaries on
/// every advance, matching the "byte-slice lexing" design target.
pub struct Lexer {
    src: Vec<u8>,
    pos: usize,
    cur: u8,
    pub lines: SourceLines,
    pub line: u32,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut src = source.as_bytes().to_vec();
        src.push(b'\n');
        let lines = SourceLines::new(source);
        let cur = src.first().copied().unwrap_or(0);

        Lexer {
            src,
            pos: 0,
            cur,
            lines,
            line: 1,
        }
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.cur = self.src.get(self.pos).copied().unwrap_or(0);
    }

    /// One-character lookahead, without modifying any state.
    fn peek(&self) -> u8 {
        self.src.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn lex_error(&self, error: LexError) -> Located<LexError> {
        Located::new(error, self.line)
    }

    /// Returns the next token in source order. Once `Eof` is reached it
    /// is returned on every subsequent call.
    pub fn next_token(&mut self) -> Result<Token, Located<LexError>> {
        self.skip_whitespace();
        self.skip_comment();

        let token = match self.cur {
            b'+' => Token::new(TokenKind::Plus, "+"),
            b'-' => Token::new(TokenKind::Minus, "-"),
            b'*' => Token::new(TokenKind::Asterisk, "*"),
            b'/' => Token::new(TokenKind::Slash, "/"),
            b'%' => Token::new(TokenKind::ModSign, "%"),
            b'=' => Token::new(TokenKind::Eq, "="),

            b':' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::new(TokenKind::ColonEq, ":=")
                } else {
                    Token::new(TokenKind::Colon, ":")
                }
            }

            b'!' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::new(TokenKind::NotEq, "!=")
                } else {
                    return Err(self.lex_error(LexError::ExpectedNotEq));
                }
            }

            b'>' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::new(TokenKind::GtEq, ">=")
                } else {
                    Token::new(TokenKind::Gt, ">")
                }
            }

            b'<' => {
                if self.peek() == b'=' {
                    self.advance();
                    Token::new(TokenKind::LtEq, "<=")
                } else {
                    Token::new(TokenKind::Lt, "<")
                }
            }

            b'"' => {
                self.advance();
                let start = self.pos;
                while self.cur != b'"' {
                    if self.cur == 0 {
                        return Err(self.lex_error(LexError::UnterminatedString));
                    }
                    self.advance();
                }
                let text = ascii_slice(&self.src, start, self.pos);
                Token::new(TokenKind::String, text)
            }

            c if c.is_ascii_digit() || (c == b'.' && self.peek().is_ascii_digit()) => {
                self.lex_number()?
            }

            c if c.is_ascii_alphabetic() => {
                let start = self.pos;
                while self.peek().is_ascii_alphanumeric() {
                    self.advance();
                }
                let text = ascii_slice(&self.src, start, self.pos + 1);
                match TokenKind::keyword(&text) {
                    Some(kind) => Token::new(kind, text),
                    None => Token::new(TokenKind::Identifier, text),
                }
            }

            b'\n' => Token::new(TokenKind::Newline, "\n"),

            0 => Token::new(TokenKind::Eof, ""),

            other => return Err(self.lex_error(LexError::InvalidToken(other as char))),
        };

        self.advance();
        Ok(token)
    }

    /// Lexes a NUMBER starting at the current digit, or at a `.`
    /// immediately followed by a digit. A leading `.` also starting a
    /// number (not just a trailing one) means a fragment like `.14`
    /// lexes as its own literal wherever it appears on its own,
    /// e.g. after whitespace has split it from a preceding number.
    fn lex_number(&mut self) -> Result<Token, Located<LexError>> {
        let start = self.pos;
        if self.cur.is_ascii_digit() {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
            if self.peek() == b'.' {
                self.advance();
                if !self.peek().is_ascii_digit() {
                    return Err(self.lex_error(LexError::IllegalNumberChar));
                }
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        } else {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let text = ascii_slice(&self.src, start, self.pos + 1);
        Ok(Token::new(TokenKind::Number, text))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cur, b' ' | b'\t' | b'\r') {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        if self.cur == b'#' {
            while self.cur != b'\n' {
                self.advance();
            }
        }
    }
}

fn ascii_slice(src: &[u8], start: usize, end: usize) -> String {
    String::from_utf8_lossy(&src[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().expect("lex error");
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn whitespace_only_yields_newline_then_eof() {
        assert_eq!(kinds("   \t  "), vec![TokenKind::Newline, TokenKind::Eof]);
    }

    #[test]
    fn comment_only_yields_newline_then_eof() {
        assert_eq!(
            kinds("# just a comment"),
            vec![TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn coloneq_lexes_as_one_token() {
        assert_eq!(
            kinds(":="),
            vec![TokenKind::ColonEq, TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn eof_repeats() {
        let mut lexer = Lexer::new("");
        let _ = lexer.next_token().unwrap();
        let a = lexer.next_token().unwrap();
        let b = lexer.next_token().unwrap();
        assert_eq!(a.kind, TokenKind::Eof);
        assert_eq!(b.kind, TokenKind::Eof);
    }

    #[test]
    fn decimal_number_is_one_token() {
        let mut lexer = Lexer::new("3.14");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number);
        assert_eq!(tok.text, "3.14");
    }

    #[test]
    fn trailing_dot_is_a_lex_error() {
        let mut lexer = Lexer::new("3.");
        assert_eq!(
            lexer.next_token().unwrap_err().value,
            LexError::IllegalNumberChar
        );
    }

    #[test]
    fn split_number_lexes_as_two_numbers() {
        assert_eq!(
            kinds("3 .14"),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn bare_bang_is_a_lex_error() {
        let mut lexer = Lexer::new("!");
        assert_eq!(
            lexer.next_token().unwrap_err().value,
            LexError::ExpectedNotEq
        );
    }

    #[test]
    fn keyword_must_be_lowercase() {
        assert_eq!(kinds("IF"), vec![TokenKind::Identifier, TokenKind::Newline, TokenKind::Eof]);
        assert_eq!(kinds("if"), vec![TokenKind::If, TokenKind::Newline, TokenKind::Eof]);
    }

    #[test]
    fn string_literal_keeps_inner_text_only() {
        let mut lexer = Lexer::new("\"hello\"");
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.text, "hello");
    }

    #[test]
    fn unterminated_string_is_a_lex_error() {
        let mut lexer = Lexer::new("\"hello");
        assert_eq!(
            lexer.next_token().unwrap_err().value,
            LexError::UnterminatedString
        );
    }
}
