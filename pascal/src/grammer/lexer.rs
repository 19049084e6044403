use super::token::{Pos, Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;

/// Whole-source lexer. Comments may span lines, so the source is not split
/// into lines first.
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

pub fn tokenize(code: &str) -> Vec<Token> {
    Lexer::new(code).parse()
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars().peekable(),
            line: 1,
            col: 1,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next()?;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, lexeme: &mut String, cond: F) {
        while let Some(ch) = self.peek_nth(0) {
            if !cond(ch) {
                break;
            }
            lexeme.push(ch);
            self.consume();
        }
    }

    fn pos(&self) -> Pos {
        Pos {
            line: self.line,
            col: self.col,
        }
    }
}

// ----------------------------------------------------------------------------
// Parser
// ----------------------------------------------------------------------------

impl<'a> Lexer<'a> {
    pub fn parse(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(ch0) = self.peek_nth(0) {
            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            let pos = self.pos();
            let ch1 = self.peek_nth(1);

            // 1. Comments
            match (ch0, ch1) {
                ('{', _) => {
                    if let Some(err) = self.skip_comment(1, "}") {
                        tokens.push(Token::new(err, "{", pos));
                    }
                    continue;
                }
                ('(', Some('*')) => {
                    if let Some(err) = self.skip_comment(2, "*)") {
                        tokens.push(Token::new(err, "(*", pos));
                    }
                    continue;
                }
                ('/', Some('/')) => {
                    while self.peek_nth(0).is_some_and(|c| c != '\n') {
                        self.consume();
                    }
                    continue;
                }
                _ => {}
            }

            // 2. Double character token
            if let Some(kind) = ch1.and_then(|ch1| double_char_token(ch0, ch1)) {
                self.consume();
                self.consume();
                tokens.push(Token::new(kind, format!("{ch0}{}", ch1.unwrap_or_default()), pos));
                continue;
            }

            // 3. Single character token
            if let Some(kind) = single_char_token(ch0) {
                self.consume();
                tokens.push(Token::new(kind, ch0, pos));
                continue;
            }

            // 4. Number literal
            if ch0.is_ascii_digit() {
                let (kind, text) = self.parse_number();
                tokens.push(Token::new(kind, text, pos));
                continue;
            }

            // 5. Hex literal: $FF
            if ch0 == '$' {
                let (kind, text) = self.parse_hex();
                tokens.push(Token::new(kind, text, pos));
                continue;
            }

            // 6. String literal: 'it''s'
            if ch0 == '\'' {
                let (kind, text) = self.parse_text();
                tokens.push(Token::new(kind, text, pos));
                continue;
            }

            // 7. Character code: #65
            if ch0 == '#' {
                let (kind, text) = self.parse_char_code();
                tokens.push(Token::new(kind, text, pos));
                continue;
            }

            // 8. Identifier or keyword
            if ch0.is_ascii_alphabetic() || ch0 == '_' {
                let mut lexeme = String::new();
                self.consume_while(&mut lexeme, |c| c.is_ascii_alphanumeric() || c == '_');
                let lower = lexeme.to_ascii_lowercase();
                let kind = keyword(&lower).unwrap_or(TokenKind::Ident(lower));
                tokens.push(Token::new(kind, lexeme, pos));
                continue;
            }

            // Error
            self.consume();
            tokens.push(Token::new(TokenKind::Error(format!("Invalid character '{ch0}'")), ch0, pos));
        }
        tokens
    }

    /// Skips a comment whose opener is `open_len` characters long. Returns an
    /// error token kind if the closer is missing.
    fn skip_comment(&mut self, open_len: usize, close: &str) -> Option<TokenKind> {
        for _ in 0..open_len {
            self.consume();
        }
        let close: Vec<char> = close.chars().collect();
        loop {
            let matched = (0..close.len()).all(|i| self.peek_nth(i) == Some(close[i]));
            if matched {
                for _ in 0..close.len() {
                    self.consume();
                }
                return None;
            }
            if self.consume().is_none() {
                return Some(TokenKind::Error("Unterminated comment".to_string()));
            }
        }
    }

    fn parse_number(&mut self) -> (TokenKind, String) {
        let mut lexeme = String::new();
        self.consume_while(&mut lexeme, |c| c.is_ascii_digit());

        let mut real = false;
        // `1..5` is a range, not a real
        if self.peek_nth(0) == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            real = true;
            lexeme.push('.');
            self.consume();
            self.consume_while(&mut lexeme, |c| c.is_ascii_digit());
        }
        if matches!(self.peek_nth(0), Some('e' | 'E')) {
            let sign = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                real = true;
                for _ in 0..digit_at {
                    if let Some(c) = self.consume() {
                        lexeme.push(c);
                    }
                }
                self.consume_while(&mut lexeme, |c| c.is_ascii_digit());
            }
        }

        let kind = if real {
            match lexeme.parse::<f64>() {
                Ok(val) => TokenKind::Real(val),
                Err(_) => TokenKind::Error(format!("Invalid number '{lexeme}'")),
            }
        } else {
            match lexeme.parse::<i64>() {
                Ok(val) => TokenKind::Integer(val),
                Err(_) => TokenKind::Error(format!("Invalid number '{lexeme}'")),
            }
        };
        (kind, lexeme)
    }

    fn parse_hex(&mut self) -> (TokenKind, String) {
        let mut lexeme = String::new();
        if let Some(c) = self.consume() {
            lexeme.push(c);
        }
        self.consume_while(&mut lexeme, |c| c.is_ascii_hexdigit());
        let kind = match i64::from_str_radix(&lexeme[1..], 16) {
            Ok(val) => TokenKind::Integer(val),
            Err(_) => TokenKind::Error(format!("Invalid number '{lexeme}'")),
        };
        (kind, lexeme)
    }

    fn parse_text(&mut self) -> (TokenKind, String) {
        let mut lexeme = String::new();
        let mut value = String::new();
        if let Some(c) = self.consume() {
            lexeme.push(c);
        }
        loop {
            match self.peek_nth(0) {
                Some('\'') if self.peek_nth(1) == Some('\'') => {
                    self.consume();
                    self.consume();
                    lexeme.push_str("''");
                    value.push('\'');
                }
                Some('\'') => {
                    self.consume();
                    lexeme.push('\'');
                    return (TokenKind::Text(value), lexeme);
                }
                Some('\n') | None => {
                    return (TokenKind::Error("Unterminated string".to_string()), lexeme);
                }
                Some(c) => {
                    self.consume();
                    lexeme.push(c);
                    value.push(c);
                }
            }
        }
    }

    fn parse_char_code(&mut self) -> (TokenKind, String) {
        let mut lexeme = String::new();
        if let Some(c) = self.consume() {
            lexeme.push(c);
        }
        self.consume_while(&mut lexeme, |c| c.is_ascii_digit());
        let kind = match lexeme[1..].parse::<u32>().ok().and_then(char::from_u32) {
            Some(c) => TokenKind::Text(c.to_string()),
            None => TokenKind::Error(format!("Invalid character code '{lexeme}'")),
        };
        (kind, lexeme)
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        (':', '=') => Some(TokenKind::Assign),
        ('<', '>') => Some(TokenKind::NotEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        ('.', '.') => Some(TokenKind::DotDot),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        ':' => Some(TokenKind::Colon),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "program" => Some(TokenKind::KwProgram),
        "uses" => Some(TokenKind::KwUses),
        "const" => Some(TokenKind::KwConst),
        "var" => Some(TokenKind::KwVar),
        "begin" => Some(TokenKind::KwBegin),
        "end" => Some(TokenKind::KwEnd),
        "if" => Some(TokenKind::KwIf),
        "then" => Some(TokenKind::KwThen),
        "else" => Some(TokenKind::KwElse),
        "while" => Some(TokenKind::KwWhile),
        "do" => Some(TokenKind::KwDo),
        "for" => Some(TokenKind::KwFor),
        "to" => Some(TokenKind::KwTo),
        "downto" => Some(TokenKind::KwDownto),
        "repeat" => Some(TokenKind::KwRepeat),
        "until" => Some(TokenKind::KwUntil),
        "case" => Some(TokenKind::KwCase),
        "of" => Some(TokenKind::KwOf),
        "div" => Some(TokenKind::KwDiv),
        "mod" => Some(TokenKind::KwMod),
        "and" => Some(TokenKind::KwAnd),
        "or" => Some(TokenKind::KwOr),
        "not" => Some(TokenKind::KwNot),
        "true" => Some(TokenKind::KwTrue),
        "false" => Some(TokenKind::KwFalse),
        "write" => Some(TokenKind::KwWrite),
        "writeln" => Some(TokenKind::KwWriteln),
        "read" => Some(TokenKind::KwRead),
        "readln" => Some(TokenKind::KwReadln),
        "integer" => Some(TokenKind::KwInteger),
        "real" => Some(TokenKind::KwReal),
        "boolean" => Some(TokenKind::KwBoolean),
        "char" => Some(TokenKind::KwChar),
        "string" => Some(TokenKind::KwString),
        _ => None,
    }
}
