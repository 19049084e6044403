use super::token::{Token, TokenKind};
use crate::error::Error;
use std::iter::Peekable;

/// Deepest nesting of statements and factors the parser descends into
pub const MAX_DEPTH: usize = 128;

pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    errors: Vec<Error>,
    /// Line of the last consumed token, for end-of-file diagnostics
    line: usize,
    depth: usize,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens: tokens.peekable(),
            errors: Vec::new(),
            line: 1,
            depth: 0,
        }
    }

    pub fn error(&mut self, e: Error) {
        self.errors.push(e);
    }

    pub fn geterrors(self) -> Vec<Error> {
        self.errors
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn eof(&self) -> Error {
        Error::UnexpectedEOF(self.line)
    }

    /// Descend one nesting level, failing past `MAX_DEPTH`
    pub fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::TooDeep(self.line));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Skip invalid tokens, reporting each one
    fn skip(&mut self) {
        while let Some(token) = self.tokens.next_if(|t| matches!(t.kind, TokenKind::Error(_))) {
            self.line = token.pos.line;
            if let TokenKind::Error(msg) = &token.kind {
                let msg = msg.clone();
                self.errors.push(Error::InvalidToken(token.into(), msg));
            }
        }
    }

    /// Peek : Watch next token without consuming it
    pub fn peek(&mut self) -> Option<&Token> {
        self.skip();
        self.tokens.peek()
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Option<Token> {
        self.skip();
        let token = self.tokens.next()?;
        self.line = token.pos.line;
        Some(token)
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> bool {
        self.peek().is_some_and(cond)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        self.skip();
        let token = self.tokens.next_if(|token| cond(token))?;
        self.line = token.pos.line;
        Some(token)
    }

    /// Consume until next token is match with condition
    pub fn consume_until<F: Fn(&Token) -> bool>(&mut self, cond: F) {
        while let Some(tok) = self.peek() {
            if cond(tok) {
                return;
            }
            self.next();
        }
    }

    /// Next token must be match with condition
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Result<Token, Error> {
        let Some(token) = self.peek() else {
            return Err(self.eof());
        };
        if !cond(token) {
            return Err(Error::UnexpectedToken(token.into()));
        }
        self.next().ok_or_else(|| self.eof())
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:pat) => {
        $parser.expect_tobe(|token| matches!(&token.kind, $kind))
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            expect!($parser, $trigger)?;
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(&token.kind, $trigger))
    };
}

/// Parse repeated elements with a delimiter
/// [ element { delimiter element } ] terminal
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem?);
            while check!($parser, $delimiter) {
                expect!($parser, $delimiter)?;
                items.push($elem?);
            }
        }
        items
    }};
}

/// Skip tokens until one of the synchronizing tokens
#[macro_export]
macro_rules! recover {
    ($parser:expr, $kind:pat) => {
        $parser.consume_until(|token| matches!(&token.kind, $kind))
    };
}
