use tpas::grammer::token::TokenKind;

fn case(code: &str, expects: Vec<TokenKind>) {
    let tokens = tpas::tokenize(code);

    println!(" {code}");
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: {:?} @ {}:{}", idx, token.kind, token.pos.line, token.pos.col);
    }

    assert_eq!(tokens.len(), expects.len());
    for (idx, expect) in expects.iter().enumerate() {
        assert_eq!(tokens[idx].kind, *expect);
    }
}

#[test]
fn statement() {
    use TokenKind::*;
    case(
        "x := x + 1; { increment } writeln('x = ', x:4)",
        vec![
            Ident(format!("x")),
            Assign,
            Ident(format!("x")),
            Plus,
            Integer(1),
            Semicolon,
            KwWriteln,
            LParen,
            Text(format!("x = ")),
            Comma,
            Ident(format!("x")),
            Colon,
            Integer(4),
            RParen,
        ],
    );
}

#[test]
fn range_is_not_real() {
    use TokenKind::*;
    case("1..10", vec![Integer(1), DotDot, Integer(10)]);
}

#[test]
fn program_end() {
    use TokenKind::*;
    case("end.", vec![KwEnd, Period]);
}

#[test]
fn comments() {
    use TokenKind::*;
    case(
        "(* block\n comment *) a // line\n{ curly } b",
        vec![Ident(format!("a")), Ident(format!("b"))],
    );
}

#[test]
fn positions() {
    let tokens = tpas::tokenize("program T;\n  begin");
    let begin = &tokens[3];
    assert_eq!(begin.kind, TokenKind::KwBegin);
    assert_eq!((begin.pos.line, begin.pos.col), (2, 3));
    assert_eq!(begin.text, "begin");
}

#[test]
fn keyword_keeps_source_text() {
    let tokens = tpas::tokenize("WriteLn");
    assert_eq!(tokens[0].kind, TokenKind::KwWriteln);
    assert_eq!(tokens[0].text, "WriteLn");
}
