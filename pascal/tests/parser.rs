use tpas::grammer::ast::{BinaryOp, Expr, Program, Stmt, Type};
use tpas::{Error, Lexer, Parser};

fn parse(code: &str) -> (Option<Program>, Vec<Error>) {
    for (idx, line) in code.lines().enumerate() {
        println!("{:>2}: {}", idx + 1, line);
    }
    let tokens = Lexer::new(code).parse();
    let (ast, errors) = Parser::new(tokens.into_iter()).parse();
    println!("{:#?}", ast);
    for error in &errors {
        println!("{:?}", error);
    }
    (ast, errors)
}

fn assert(code: &str) {
    let (ast, errors) = parse(code);
    assert!(errors.is_empty(), "Errors found: {:?}", errors);
    assert!(ast.is_some());
}

fn assert_fail(code: &str) {
    let (_, errors) = parse(code);
    assert!(!errors.is_empty());
}

macro_rules! case {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert($code);
        }
    };
}

macro_rules! fail {
    ($name:ident, $code:expr) => {
        #[test]
        fn $name() {
            assert_fail($code);
        }
    };
}

/// Wrap statements into a minimal program
fn body(stmts: &str) -> String {
    format!("program T;\nvar i, n: integer; r: real; s: string; c: char; b: boolean;\nbegin\n{stmts}\nend.")
}

case!(hello, "program T; begin writeln('hi'); end.");
case!(empty_body, "program T; begin end.");
case!(program_params, "program T(input, output); begin end.");
case!(uses_clause, "program T; uses crt, dos; begin end.");
case!(const_section, "program T; const N = 10; Pi = 3.14; Name = 'x'; begin end.");
case!(var_aliases, "program T; var a: longint; b: word; d: double; s: string[20]; begin end.");
case!(assign, &body("i := 1 + 2 * 3"));
case!(write_format, &body("writeln('r = ', r:8:2, i:4)"));
case!(write_bare, &body("writeln; write"));
case!(read_vars, &body("readln(i, n); read(s)"));
case!(if_else, &body("if i > 0 then writeln('pos') else writeln('neg')"));
case!(nested_if, &body("if i > 0 then if n > 0 then i := 1 else i := 2"));
case!(while_loop, &body("while i < 10 do i := i + 1"));
case!(for_to, &body("for i := 1 to 10 do n := n + i"));
case!(for_downto, &body("for i := 10 downto 1 do begin n := n + i; writeln(n) end"));
case!(repeat_until, &body("repeat i := i + 1; n := n * 2 until i >= 5"));
case!(case_of, &body("case i of 1: writeln('one'); 2, 3: writeln('few'); 4..9: writeln('many') else writeln('lots') end"));
case!(case_trailing_semicolon, &body("case c of 'a': i := 1; end"));
case!(boolean_ops, &body("b := (i > 0) and not (n = 0) or false"));
case!(builtin_calls, &body("n := abs(i) + sqr(2) + ord(c) + length(s); r := sqrt(r)"));
case!(trailing_semicolon, &body("i := 1;"));

fail!(missing_end, "program T; begin writeln('hi');");
fail!(missing_period, "program T; begin end");
fail!(missing_program, "begin end.");
fail!(unknown_type, "program T; var x: matrix; begin end.");
fail!(unknown_statement, &body("foo"));
fail!(missing_then, &body("if i > 0 writeln('x')"));
fail!(unmatched_begin, &body("begin i := 1"));
fail!(invalid_char, &body("i := 1 ? 2"));

#[test]
fn missing_end_reports_line() {
    let (_, errors) = parse("program T;\nbegin\n  writeln('hi');\n");
    assert_eq!(errors.last(), Some(&Error::MissingProgramEnd(3)));
    assert_eq!(errors.last().map(ToString::to_string).as_deref(), Some("Line 3: Missing 'end.' at end of program"));
}

#[test]
fn recovers_multiple_errors() {
    let (_, errors) = parse(&body("foo;\ni := 1;\nbar"));
    let unknown: Vec<_> = errors
        .iter()
        .filter(|e| matches!(e, Error::UnknownStatement(..)))
        .collect();
    assert_eq!(unknown.len(), 2);
}

#[test]
fn duplicate_identifier() {
    let (_, errors) = parse("program T; var x: integer; x: real; begin end.");
    assert!(errors.iter().any(|e| matches!(e, Error::Duplicate(_, name) if name == "x")));
}

#[test]
fn precedence() {
    let (ast, _) = parse(&body("i := 1 + 2 * 3"));
    let program = ast.unwrap();
    let Stmt::Assign(name, expr) = &program.body[0] else {
        panic!("expected assignment");
    };
    assert_eq!(name, "i");
    assert_eq!(
        *expr,
        Expr::Binary(
            BinaryOp::Add,
            Box::new(Expr::Integer(1)),
            Box::new(Expr::Binary(
                BinaryOp::Mul,
                Box::new(Expr::Integer(2)),
                Box::new(Expr::Integer(3))
            ))
        )
    );
}

#[test]
fn declarations() {
    let (ast, _) = parse("program Demo; const N = 3; var a, b: integer; s: string; begin end.");
    let program = ast.unwrap();
    assert_eq!(program.name, "demo");
    assert_eq!(program.consts.len(), 1);
    assert_eq!(
        program.vars,
        vec![
            ("a".to_string(), Type::Integer),
            ("b".to_string(), Type::Integer),
            ("s".to_string(), Type::String)
        ]
    );
}

fn nested(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{}{}", open.repeat(depth), inner, close.repeat(depth))
}

fn assert_too_deep(code: &str) {
    let (_, errors) = parse(code);
    assert!(errors.iter().any(|e| matches!(e, Error::TooDeep(_))), "Errors found: {:?}", errors);
}

#[test]
fn deep_parens_are_rejected() {
    let expr = nested("(", "1", ")", 50_000);
    assert_too_deep(&format!("program T; var x: integer; begin x := {expr} end."));
}

#[test]
fn deep_negation_is_rejected() {
    let expr = nested("-", "1", "", 50_000);
    assert_too_deep(&format!("program T; var x: integer; begin x := {expr} end."));
}

#[test]
fn deep_blocks_are_rejected() {
    let body = nested("begin ", "", " end", 50_000);
    assert_too_deep(&format!("program T; begin {body} end."));
}

#[test]
fn deep_if_chain_is_rejected() {
    let body = nested("if true then ", "writeln", "", 50_000);
    assert_too_deep(&format!("program T; begin {body} end."));
}

#[test]
fn moderate_nesting_parses() {
    let expr = nested("(", "1", ")", 60);
    let body = nested("begin ", &format!("writeln({expr})"), " end", 30);
    assert(&format!("program T; begin {body} end."));
}
