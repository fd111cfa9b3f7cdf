//! Taxonomía de diagnósticos compartida por el lexer y el parser.
//!
//! Cada etapa de compilación posee su propio tipo de error; un
//! envoltorio delgado adjunta la posición de origen antes de reportar
//! el error y terminar el proceso. Calci tiene un único formato de
//! reporte, usado para los tres tipos de error, así que hay una sola
//! función `report` en lugar de una por etapa.

use std::fmt;
use std::process::ExitStatus;

use thiserror::Error;

use crate::lex::TokenKind;
use crate::source::{Located, SourceLines};

/// Lexical errors (spec.md §7: unrecognized character, malformed
/// number, unterminated string, bare `!`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Expected !=")]
    ExpectedNotEq,

    #[error("Illegal Character in Number")]
    IllegalNumberChar,

    #[error("Invalid Token: {0}")]
    InvalidToken(char),

    #[error("Unterminated string literal")]
    UnterminatedString,
}

/// Parse errors (spec.md §7: unexpected token, undeclared identifier,
/// redeclaration, missing type, missing comparison operator, invalid
/// statement opener).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected:?}, got {found:?}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("Referencing variable before declaration: {0}")]
    UndeclaredVariable(String),

    #[error("Redeclaring variable: {0}")]
    Redeclaration(String),

    #[error("Expected type name at: {0}")]
    ExpectedType(String),

    #[error("Expected comparison operator at: {0}")]
    ExpectedComparisonOperator(String),

    #[error("Invalid statement at {0} ({1:?})")]
    InvalidStatement(String, TokenKind),

    #[error("Unexpected token at {0}")]
    UnexpectedPrimary(String),

    #[error("Unexpected end of file")]
    UnexpectedEof,
}

/// Failure to invoke the external C compiler (spec.md §6).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("I/O error launching external compiler")]
    Io(#[from] std::io::Error),

    #[error("external C compiler exited with status {0}")]
    Failed(ExitStatus),
}

/// Top-level error type threaded through `compile()` and `main()`.
#[derive(Debug, Error)]
pub enum CalciError {
    #[error("cannot open file {0}")]
    Io(String, #[source] std::io::Error),

    #[error("lex error")]
    Lex(Located<LexError>),

    #[error("parse error")]
    Parse(Located<ParseError>),

    #[error("build error")]
    Build(#[from] BuildError),
}

/// The compilation phase a diagnostic originated in, used only for the
/// `<Phase>` slot of the reported message.
///
/// spec.md §7 notes that the original tool names phases "Compile Time"
/// / "Runtime", conflating "runtime of the compiler" with the compiled
/// program's own runtime. This reimplementation renames the phase to
/// the stage name itself (`Lex`/`Parse`/`IO`), per spec.md's explicit
/// instruction.
enum Phase {
    Io,
    Lex,
    Parse,
    Build,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Io => "IO",
            Phase::Lex => "Lex",
            Phase::Parse => "Parse",
            Phase::Build => "Build",
        };
        f.write_str(name)
    }
}

impl CalciError {
    fn phase(&self) -> Phase {
        match self {
            CalciError::Io(..) => Phase::Io,
            CalciError::Lex(_) => Phase::Lex,
            CalciError::Parse(_) => Phase::Parse,
            CalciError::Build(_) => Phase::Build,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CalciError::Io(..) => "IOError",
            CalciError::Lex(_) => "LexError",
            CalciError::Parse(_) => "ParseError",
            CalciError::Build(_) => "BuildError",
        }
    }
}

/// Renders a diagnostic to the exact format mandated by spec.md §4.4:
///
/// ```text
/// Calci - <Phase> Error:
///         <Kind> : <message>
/// <source line>
/// (line <lineno>)
/// ```
///
/// `source` is only consulted for `Lex`/`Parse` errors, which carry a
/// line number; `IOError`/`BuildError` have none and the last two
/// lines are omitted.
pub fn report(err: &CalciError, source: &SourceLines) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Calci - {} Error:", err.phase());

    match err {
        CalciError::Io(path, cause) => {
            let _ = writeln!(out, "        {} : cannot open file {}", err.kind(), path);
            let _ = write!(out, "({cause})");
        }
        CalciError::Lex(located) => {
            let _ = writeln!(out, "        {} : {}", err.kind(), located.value);
            let _ = writeln!(out, "{}", source.line(located.line));
            let _ = write!(out, "(line {})", located.line);
        }
        CalciError::Parse(located) => {
            let _ = writeln!(out, "        {} : {}", err.kind(), located.value);
            let _ = writeln!(out, "{}", source.line(located.line));
            let _ = write!(out, "(line {})", located.line);
        }
        CalciError::Build(cause) => {
            let _ = write!(out, "        {} : {}", err.kind(), cause);
        }
    }

    out
}

/// Prints the diagnostic to stderr and terminates the process, per
/// spec.md §7's "no local recovery" policy. Never returns.
pub fn report_and_exit(err: CalciError, source: &SourceLines) -> ! {
    eprintln!("{}", report(&err, source));
    std::process::exit(1);
}
