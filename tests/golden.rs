//! The six golden parser/emitter scenarios from spec.md §8, plus the
//! property-style invariants that accompany them.

use std::path::Path;

use calci::emit::Emitter;
use calci::parse::Parser;

fn translate(source: &str) -> String {
    let mut emitter = Emitter::new(Path::new("<test>"));
    let mut parser = Parser::new(source).expect("lex error constructing parser");
    parser.program(&mut emitter).expect("parse error");
    emitter.contents()
}

#[test]
fn hello_world() {
    let out = translate("PRINT \"Hello, world\"\n");
    assert_eq!(
        out,
        "#include <stdio.h>\nint main(void){\nprintf(\"Hello, world\");\nreturn 0;\n}\n"
    );
}

#[test]
fn declaration_and_assignment() {
    let out = translate("LET x : int\nVAR x := 1 + 2\n");
    assert!(out.contains("int x;"));
    assert!(out.contains("x = 1+2;"));
}

#[test]
fn input_with_string() {
    let out = translate("LET s : str\nINPUT str s\n");
    assert!(out.contains("char[100] s;"));
    assert!(out.contains("scanf(\"%[^\\n]%*c\", &s);"));
}

#[test]
fn if_elsif_else() {
    let out = translate(
        "LET n : int\nIF n = 0 THEN\nPRINTLN \"zero\"\nELSIF n > 0 THEN\nPRINTLN \"pos\"\nELSE\nPRINTLN \"neg\"\nEND\n",
    );
    assert!(out.contains("if(n==0){"));
    assert!(out.contains("}else if(n>0){"));
    assert!(out.contains("} else {"));
    assert!(out.trim_end().ends_with('}'));
}

#[test]
fn while_counting() {
    let out = translate("LET i : int\nVAR i := 0\nWHILE i < 10 REPEAT\nVAR i := i + 1\nEND\n");
    assert!(out.contains("while(i<10){"));
}

#[test]
fn for_loop() {
    let out = translate("LET i : int\nFOR i := 0 TO 10 BY 1 DO\nPRINTLN i\nEND\n");
    let body_start = out.find("for(").expect("for loop emitted");
    assert!(out[body_start..].starts_with("for(i = 0;i<10;i+=1){"));
}

#[test]
fn brace_count_balances() {
    let out = translate(
        "LET n : int\nIF n = 0 THEN\nPRINTLN \"zero\"\nELSIF n > 0 THEN\nPRINTLN \"pos\"\nELSE\nPRINTLN \"neg\"\nEND\n",
    );
    let opens = out.matches('{').count();
    let closes = out.matches('}').count();
    assert_eq!(opens, closes);
}

#[test]
fn bare_eq_never_survives_into_body() {
    let out = translate("LET n : int\nIF n = 0 THEN\nPRINTLN \"zero\"\nEND\n");
    let body_start = out.find("if(").unwrap();
    assert!(!out[body_start..].contains(" = 0"));
    assert!(out[body_start..].contains("==0"));
}

#[test]
fn fmt_statement_emits_printf_with_trailing_identifiers() {
    let out = translate("LET n : int\nVAR n := 3\nFMT \"n=\" n\n");
    assert!(out.contains("printf(\"n=\", n);"));
}

#[test]
fn fmt_statement_rejects_undeclared_identifier() {
    let mut emitter = Emitter::new(Path::new("<test>"));
    let mut parser = Parser::new("FMT \"n=\" n\n").unwrap();
    assert!(parser.program(&mut emitter).is_err());
}

#[test]
fn undeclared_variable_is_a_parse_error() {
    let mut emitter = Emitter::new(Path::new("<test>"));
    let mut parser = Parser::new("VAR x := 1\n").unwrap();
    assert!(parser.program(&mut emitter).is_err());
}

#[test]
fn redeclaration_is_a_parse_error() {
    let mut emitter = Emitter::new(Path::new("<test>"));
    let mut parser = Parser::new("LET x : int\nLET x : int\n").unwrap();
    assert!(parser.program(&mut emitter).is_err());
}
