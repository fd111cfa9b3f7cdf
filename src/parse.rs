//! Análisis sintáctico descendente recursivo y emisor de C en una sola
//! pasada.
//!
//! Lookahead de dos tokens (`cur`, `peek`), sin retroceso: cada regla
//! gramatical consume exactamente los tokens que nombra antes de
//! retornar. El parser es dueño de la tabla de símbolos (nombres de
//! identificadores declarados) durante la vida de una única llamada a
//! `program()`, y la descarta al terminar — no hay tabla de símbolos
//! persistente entre archivos.

use std::collections::HashSet;

use crate::emit::Emitter;
use crate::error::{CalciError, ParseError};
use crate::lex::{Lexer, Token, TokenKind};
use crate::source::{Located, SourceLines};

type PResult<T> = Result<T, CalciError>;

pub struct Parser {
    lexer: Lexer,
    vars: HashSet<String>,
    cur: Token,
    peek: Token,
}

impl Parser {
    pub fn new(source: &str) -> PResult<Self> {
        let mut lexer = Lexer::new(source);
        let cur = lexer.next_token().map_err(CalciError::Lex)?;
        let peek = lexer.next_token().map_err(CalciError::Lex)?;
        Ok(Parser {
            lexer,
            vars: HashSet::new(),
            cur,
            peek,
        })
    }

    /// The source, split into lines, for use in diagnostics after
    /// `program()` returns an error.
    pub fn lines(&self) -> &SourceLines {
        &self.lexer.lines
    }

    fn parse_err(&self, error: ParseError) -> CalciError {
        CalciError::Parse(Located::new(error, self.lexer.line))
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    #[allow(dead_code)]
    fn check_peek(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn is_comparison_op(&self) -> bool {
        matches!(
            self.cur.kind,
            TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Eq
                | TokenKind::NotEq
        )
    }

    fn is_type(&self) -> bool {
        matches!(
            self.cur.kind,
            TokenKind::Nat | TokenKind::Int | TokenKind::Real | TokenKind::Str
        )
    }

    /// Shifts `peek` into `cur` and pulls a new `peek` from the lexer.
    /// The lexer's line counter advances when the outgoing `peek` (the
    /// token about to become `cur`) is a NEWLINE, so a diagnostic
    /// raised against the freshly-shifted `cur` still reports the line
    /// that token ended, not the line after it.
    fn advance(&mut self) -> PResult<()> {
        if self.peek.kind == TokenKind::Newline {
            self.lexer.line += 1;
        }
        let next = self.lexer.next_token().map_err(CalciError::Lex)?;
        self.cur = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    fn match_tok(&mut self, kind: TokenKind) -> PResult<Token> {
        if !self.check(kind) {
            return Err(self.parse_err(ParseError::UnexpectedToken {
                expected: kind,
                found: self.cur.kind,
            }));
        }
        let tok = self.cur.clone();
        self.advance()?;
        Ok(tok)
    }

    fn match_ident(&mut self) -> PResult<String> {
        Ok(self.match_tok(TokenKind::Identifier)?.text)
    }

    fn declared(&self, name: &str) -> PResult<()> {
        if !self.vars.contains(name) {
            return Err(self.parse_err(ParseError::UndeclaredVariable(name.to_owned())));
        }
        Ok(())
    }

    /// Matches an identifier already present in the symbol table,
    /// erroring on either a non-identifier token or an undeclared name.
    fn declared_ident(&mut self) -> PResult<String> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.parse_err(ParseError::UnexpectedToken {
                expected: TokenKind::Identifier,
                found: self.cur.kind,
            }));
        }
        let name = self.cur.text.clone();
        self.declared(&name)?;
        self.advance()?;
        Ok(name)
    }

    /// Entry point: `program = {nl}, {statement}, EOF` (spec.md §4.3).
    /// Emits the translation unit's fixed prologue and epilogue around
    /// the statement stream.
    pub fn program(&mut self, emitter: &mut Emitter) -> PResult<()> {
        emitter.header_line("#include <stdio.h>");
        emitter.header_line("int main(void){");

        while self.check(TokenKind::Newline) {
            self.advance()?;
        }

        while !self.check(TokenKind::Eof) {
            self.statement(emitter)?;
        }

        emitter.emit_line("return 0;");
        emitter.emit_line("}");
        Ok(())
    }

    fn statement(&mut self, emitter: &mut Emitter) -> PResult<()> {
        match self.cur.kind {
            TokenKind::Print => self.print_stmt(emitter, false)?,
            TokenKind::Println => self.print_stmt(emitter, true)?,
            TokenKind::Fmt => self.fmtprint_stmt(emitter)?,
            TokenKind::Input => self.input_stmt(emitter)?,
            TokenKind::Var => self.assign_stmt(emitter)?,
            TokenKind::Let => self.decl_stmt(emitter)?,
            TokenKind::If => self.if_stmt(emitter)?,
            TokenKind::While => self.while_stmt(emitter)?,
            TokenKind::For => self.for_stmt(emitter)?,
            _ => {
                return Err(self.parse_err(ParseError::InvalidStatement(
                    self.cur.text.clone(),
                    self.cur.kind,
                )))
            }
        }
        self.nl()
    }

    /// `nl = NEWLINE, {NEWLINE}`. Every statement ends on at least one.
    fn nl(&mut self) -> PResult<()> {
        self.match_tok(TokenKind::Newline)?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    /// `print_stmt = ("PRINT" | "PRINTLN") , (STRING | expression)`.
    ///
    /// A string literal is emitted verbatim. Otherwise the format
    /// specifier is derived from the *text* of the expression's first
    /// token rather than its declared type — kept intentionally, see
    /// DESIGN.md Open Question 4. Since that text is always an
    /// identifier or a numeric literal, never the literal string
    /// `"nat"`/`"int"`/`"real"` (those are reserved keywords and so can
    /// never be identifier text), [`dispatch_fmt`] always falls
    /// through to `%s` in practice.
    fn print_stmt(&mut self, emitter: &mut Emitter, newline: bool) -> PResult<()> {
        self.advance()?;

        if self.check(TokenKind::String) {
            emitter.emit_line(&format!("printf(\"{}\");", self.cur.text));
            self.advance()?;
        } else {
            let fmt = dispatch_fmt(&self.cur.text);
            emitter.emit(&format!("printf(\"{}\",", fmt));
            self.expression(emitter)?;
            emitter.emit_line(");");
        }

        if newline {
            emitter.emit_line("printf(\"\\n\");");
        }
        Ok(())
    }

    /// `fmtprint_stmt = "FMT" , STRING , {IDENT}` — the supplemental
    /// statement carried over from the original implementation's
    /// `FMTPRINT` token, dropped from the distilled grammar but
    /// restored here (SPEC_FULL.md §3/§4.3).
    fn fmtprint_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        let text = self.match_tok(TokenKind::String)?.text;
        emitter.emit(&format!("printf(\"{}\"", text));

        while self.check(TokenKind::Identifier) {
            self.declared(&self.cur.text)?;
            emitter.emit(&format!(", {}", self.cur.text));
            self.advance()?;
        }
        emitter.emit_line(");");
        Ok(())
    }

    /// `input_stmt = "INPUT" , type_tag , IDENT`.
    fn input_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        if !self.is_type() {
            return Err(self.parse_err(ParseError::ExpectedType(self.cur.text.clone())));
        }
        let fmt = input_fmt(self.cur.kind);
        self.advance()?;

        let name = self.declared_ident()?;
        emitter.emit_line(&format!("scanf(\"{}\", &{});", fmt, name));
        Ok(())
    }

    /// `assign_stmt = "VAR" , IDENT , ":=" , expression`.
    fn assign_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        let name = self.declared_ident()?;
        self.match_tok(TokenKind::ColonEq)?;

        emitter.emit(&format!("{} = ", name));
        self.expression(emitter)?;
        emitter.emit_line(";");
        Ok(())
    }

    /// `decl_stmt = "LET" , IDENT , {IDENT} , COLON , type_tag`. Every
    /// name is recorded in the symbol table before the type tag is
    /// read, and redeclaring any one of them is an error.
    fn decl_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        let mut names = Vec::new();
        while !self.check(TokenKind::Colon) {
            let name = self.match_ident()?;
            if !self.vars.insert(name.clone()) {
                return Err(self.parse_err(ParseError::Redeclaration(name)));
            }
            names.push(name);
        }
        self.match_tok(TokenKind::Colon)?;

        if !self.is_type() {
            return Err(self.parse_err(ParseError::ExpectedType(self.cur.text.clone())));
        }
        emitter.header_line(&format!("{} {};", c_type_of(self.cur.kind), names.join(",")));
        self.advance()?;
        Ok(())
    }

    /// `if_stmt = "IF" , if_chain , "END"`, closed by exactly one `}`
    /// regardless of how many `ELSIF` branches it recursed through.
    fn if_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        self.if_chain(emitter)?;
        self.match_tok(TokenKind::End)?;
        emitter.emit_line("}");
        Ok(())
    }

    /// `comparison , "THEN" , nl , {statement}`, then either an `ELSE`
    /// block or a recursive `ELSIF` chain — never both at the same
    /// level, since whichever token stopped the statement loop decides
    /// which branch runs.
    fn if_chain(&mut self, emitter: &mut Emitter) -> PResult<()> {
        emitter.emit("if(");
        self.comparison(emitter)?;
        self.match_tok(TokenKind::Then)?;
        self.nl()?;
        emitter.emit_line("){");

        while !(self.check(TokenKind::Else) || self.check(TokenKind::End) || self.check(TokenKind::Elsif)) {
            self.statement(emitter)?;
        }

        if self.check(TokenKind::Else) {
            self.advance()?;
            emitter.emit("} else ");
            self.nl()?;
            emitter.emit_line("{");
            while !self.check(TokenKind::End) {
                self.statement(emitter)?;
            }
        } else if self.check(TokenKind::Elsif) {
            self.advance()?;
            emitter.emit("}else ");
            self.if_chain(emitter)?;
        }

        Ok(())
    }

    /// `while_stmt = "WHILE" , comparison , "REPEAT" , nl , {statement} , "END"`.
    fn while_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        emitter.emit("while(");
        self.comparison(emitter)?;
        self.match_tok(TokenKind::Repeat)?;
        self.nl()?;
        emitter.emit_line("){");

        while !self.check(TokenKind::End) {
            self.statement(emitter)?;
        }
        self.match_tok(TokenKind::End)?;
        emitter.emit_line("}");
        Ok(())
    }

    /// `for_stmt = "FOR" , IDENT , ":=" , expression , "TO" , expression ,
    /// "BY" , expression , "DO" , nl , {statement} , "END"`. The
    /// counter must already be declared, same as any other identifier.
    fn for_stmt(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.advance()?;
        emitter.emit("for(");

        let ctr = self.declared_ident()?;
        self.match_tok(TokenKind::ColonEq)?;
        emitter.emit(&format!("{} = ", ctr));
        self.expression(emitter)?;
        emitter.emit(";");

        self.match_tok(TokenKind::To)?;
        emitter.emit(&format!("{}<", ctr));
        self.expression(emitter)?;
        emitter.emit(";");

        self.match_tok(TokenKind::By)?;
        emitter.emit(&format!("{}+=", ctr));
        self.expression(emitter)?;

        self.match_tok(TokenKind::Do)?;
        self.nl()?;
        emitter.emit_line("){");

        while !self.check(TokenKind::End) {
            self.statement(emitter)?;
        }
        self.match_tok(TokenKind::End)?;
        emitter.emit_line("}");
        Ok(())
    }

    /// `comparison = expression , comparison_op , expression , {comparison_op , expression}`.
    /// A bare `=` between two expressions is rewritten to C's `==` —
    /// `=` never survives as a lone token into the emitted C, it only
    /// ever appears here, inside a comparison.
    fn comparison(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.expression(emitter)?;
        if !self.is_comparison_op() {
            return Err(self.parse_err(ParseError::ExpectedComparisonOperator(
                self.cur.text.clone(),
            )));
        }
        while self.is_comparison_op() {
            emitter.emit(if self.check(TokenKind::Eq) { "==" } else { self.cur.text.as_str() });
            self.advance()?;
            self.expression(emitter)?;
        }
        Ok(())
    }

    /// `expression = term , {("+" | "-" | "%") , term}`.
    fn expression(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.term(emitter)?;
        while matches!(self.cur.kind, TokenKind::Plus | TokenKind::Minus | TokenKind::ModSign) {
            emitter.emit(self.cur.text.as_str());
            self.advance()?;
            self.term(emitter)?;
        }
        Ok(())
    }

    /// `term = unary , {("*" | "/") , unary}`.
    fn term(&mut self, emitter: &mut Emitter) -> PResult<()> {
        self.unary(emitter)?;
        while matches!(self.cur.kind, TokenKind::Asterisk | TokenKind::Slash) {
            emitter.emit(self.cur.text.as_str());
            self.advance()?;
            self.unary(emitter)?;
        }
        Ok(())
    }

    /// `unary = ["+" | "-"] , primary`.
    fn unary(&mut self, emitter: &mut Emitter) -> PResult<()> {
        if matches!(self.cur.kind, TokenKind::Plus | TokenKind::Minus) {
            emitter.emit(self.cur.text.as_str());
            self.advance()?;
        }
        self.primary(emitter)
    }

    /// `primary = NUMBER | IDENT`. An identifier must already be
    /// declared — this is where the declare-before-use invariant is
    /// actually enforced for the right-hand side of an expression.
    fn primary(&mut self, emitter: &mut Emitter) -> PResult<()> {
        match self.cur.kind {
            TokenKind::Number => {
                emitter.emit(self.cur.text.as_str());
                self.advance()?;
            }
            TokenKind::Identifier => {
                self.declared(&self.cur.text)?;
                emitter.emit(self.cur.text.as_str());
                self.advance()?;
            }
            _ => {
                return Err(self.parse_err(ParseError::UnexpectedPrimary(self.cur.text.clone())))
            }
        }
        Ok(())
    }
}

/// PRINT/PRINTLN's buggy format-specifier dispatch (see
/// [`Parser::print_stmt`]): derived from the literal text of a token
/// that is never actually one of these four keywords in practice.
fn dispatch_fmt(token_text: &str) -> &'static str {
    match token_text {
        "nat" | "int" => "%d",
        "real" => "%lf",
        _ => "%s",
    }
}

/// INPUT's format specifier, derived from the type tag it was
/// actually declared with — unlike [`dispatch_fmt`], this one is
/// correct.
fn input_fmt(type_kind: TokenKind) -> &'static str {
    match type_kind {
        TokenKind::Nat | TokenKind::Int => "%d",
        TokenKind::Real => "%lf",
        TokenKind::Str => "%[^\\n]%*c",
        _ => unreachable!("caller already checked is_type()"),
    }
}

/// Maps a Calci type tag to its C declaration type. `str` maps to a
/// fixed 100-byte buffer with no bounds enforcement anywhere in this
/// compiler — see DESIGN.md Open Question 2.
fn c_type_of(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Nat => "unsigned int",
        TokenKind::Int => "int",
        TokenKind::Real => "double",
        TokenKind::Str => "char[100]",
        _ => unreachable!("caller already checked is_type()"),
    }
}
