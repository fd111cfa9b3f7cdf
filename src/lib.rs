//! Ties the lexer, parser, and emitter into a single source-to-C
//! pipeline. `main.rs` is a thin CLI wrapper around [`translate`] and
//! [`link::compile`].

pub mod config;
pub mod emit;
pub mod error;
pub mod lex;
pub mod link;
pub mod parse;
pub mod source;

use std::path::Path;

use config::Lang;
use error::CalciError;

/// Parses `source` and, when `lang` is [`Lang::C`], writes the
/// translated C file to `c_path`. For [`Lang::Java`] parsing still
/// runs (so diagnostics surface the same way), but nothing is written
/// — matching `calci/tools.py::runProgram`'s `java` no-op branch.
pub fn translate(source: &str, c_path: &Path, lang: Lang) -> Result<(), CalciError> {
    let mut emitter = emit::Emitter::new(c_path);
    let mut parser = parse::Parser::new(source)?;
    parser.program(&mut emitter)?;

    if lang == Lang::C {
        emitter
            .write_file()
            .map_err(|e| CalciError::Io(c_path.display().to_string(), e))?;
    }

    Ok(())
}
