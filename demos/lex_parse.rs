//! Dumps the token stream produced by the lexer for a Calci source
//! file read from stdin. Useful for eyeballing how a snippet tokenizes
//! without running the full translation pipeline.

use std::io::Read;

use calci::error::{report, CalciError};
use calci::lex::{Lexer, TokenKind};
use calci::source::SourceLines;

fn main() {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .expect("failed to read stdin");

    let lines = SourceLines::new(&source);
    let mut lexer = Lexer::new(&source);

    loop {
        match lexer.next_token() {
            Ok(token) => {
                let done = token.kind == TokenKind::Eof;
                println!("{:?} {:?}", token.kind, token.text);
                if done {
                    break;
                }
            }
            Err(located) => {
                eprint!("{}", report(&CalciError::Lex(located), &lines));
                break;
            }
        }
    }
}
