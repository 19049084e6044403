use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Lexeme as written in the source
    pub text: String,
    pub pos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Pos) -> Self {
        Token {
            kind,
            text: text.into(),
            pos,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Double character tokens
    Assign,       // ':='
    NotEqual,     // '<>'
    LAngleEqual,  // '<='
    RAngleEqual,  // '>='
    DotDot,       // '..'

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    LAngle,    // '<'
    RAngle,    // '>'
    Colon,     // ':'
    Semicolon, // ';'
    Comma,     // ','
    Period,    // '.'
    LParen,    // '('
    RParen,    // ')'
    LBracket,  // '['
    RBracket,  // ']'

    // Keywords
    KwProgram,
    KwUses,
    KwConst,
    KwVar,
    KwBegin,
    KwEnd,
    KwIf,
    KwThen,
    KwElse,
    KwWhile,
    KwDo,
    KwFor,
    KwTo,
    KwDownto,
    KwRepeat,
    KwUntil,
    KwCase,
    KwOf,
    KwDiv,
    KwMod,
    KwAnd,
    KwOr,
    KwNot,
    KwTrue,
    KwFalse,
    KwWrite,
    KwWriteln,
    KwRead,
    KwReadln,
    KwInteger,
    KwReal,
    KwBoolean,
    KwChar,
    KwString,

    // Identifier, lowercased
    Ident(String),

    // Literals
    Integer(i64),
    Real(f64),
    Text(String),

    // Special
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pos {
    /// 1-based
    pub line: usize,
    /// 1-based
    pub col: usize,
}
