//! Translates a Calci source file read from stdin and prints the
//! generated C to stdout, without ever invoking the external
//! compiler. A quick way to inspect what `calci -S` would have
//! written.

use std::io::Read;
use std::path::Path;

use calci::emit::Emitter;
use calci::error::report;
use calci::parse::Parser;
use calci::source::SourceLines;

fn main() {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .expect("failed to read stdin");

    let lines = SourceLines::new(&source);
    let mut emitter = Emitter::new(Path::new("<stdout>"));

    let result = Parser::new(&source).and_then(|mut parser| parser.program(&mut emitter));

    match result {
        Ok(()) => print!("{}", emitter.contents()),
        Err(err) => eprint!("{}", report(&err, &lines)),
    }
}
