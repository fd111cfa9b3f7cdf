//! Invocación del compilador de C externo.
//!
//! Calci nunca ensambla ni enlaza nada por sí mismo. Una vez que el
//! parser ha escrito una unidad de traducción C completa en disco,
//! convertirla en un ejecutable queda delegado a quien sea que `$CC`
//! nombre en el entorno.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BuildError;

/// The executable path the external compiler will be asked to
/// produce from `source`: the source path with its extension dropped,
/// plus `.exe` on Windows (`calci/tools.py::runProgram`'s `os.name ==
/// 'nt'` check).
pub fn executable_path(source: &Path) -> PathBuf {
    let mut exe = source.with_extension("");
    if cfg!(windows) {
        exe.set_extension("exe");
    }
    exe
}

/// Runs `$cc <source> -o <exe>`. On a nonzero exit, removes the
/// generated C file (there is nothing useful left to keep — mirrors
/// `runProgram`'s `os.remove(cfname)` on failure) and reports
/// [`BuildError::Failed`].
pub fn compile(cc: &str, source: &Path, exe: &Path) -> Result<(), BuildError> {
    let status = Command::new(cc).arg(source).arg("-o").arg(exe).status()?;

    if status.success() {
        Ok(())
    } else {
        let _ = std::fs::remove_file(source);
        Err(BuildError::Failed(status))
    }
}
