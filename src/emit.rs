//! Sumidero de texto de dos búferes para la unidad de traducción C
//! generada.
//!
//! El emisor no tiene conocimiento sintáctico de C: es un sumidero
//! tonto para dos regiones de solo-append. Toda la corrección del C
//! generado es responsabilidad del parser. Separar `header` de `body`
//! permite emitir directivas `#include` y declaraciones de variables
//! después de haber recorrido las sentencias que las necesitan, ya que
//! C exige declarar antes de usar pero las declaraciones de Calci
//! pueden aparecer en cualquier parte del código fuente.

use std::path::{Path, PathBuf};

pub struct Emitter {
    header: String,
    body: String,
    output: PathBuf,
}

impl Emitter {
    pub fn new<P: AsRef<Path>>(output: P) -> Self {
        Emitter {
            header: String::new(),
            body: String::new(),
            output: output.as_ref().to_owned(),
        }
    }

    /// Appends `text` to the body.
    pub fn emit(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Appends `text` followed by a newline to the body.
    pub fn emit_line(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Appends `text` followed by a newline to the header.
    pub fn header_line(&mut self, text: &str) {
        self.header.push_str(text);
        self.header.push('\n');
    }

    /// Writes `header ++ body` to the destination path in one shot.
    pub fn write_file(&self) -> std::io::Result<()> {
        std::fs::write(&self.output, self.contents())
    }

    /// The full `header ++ body` text, useful for tests and for `-S`
    /// emission to stdout.
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.body.len());
        out.push_str(&self.header);
        out.push_str(&self.body);
        out
    }
}
