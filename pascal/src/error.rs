use crate::grammer::token::{Token, TokenKind};
use color_print::cprintln;
use std::fmt;
use thiserror::Error;

// Token information kept in diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        TokenInfo {
            kind: token.kind,
            text: token.text,
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        TokenInfo {
            kind: token.kind.clone(),
            text: token.text.clone(),
            line: token.pos.line,
            col: token.pos.col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Parse errors
    #[error("Line {}: Unexpected token {}", .0.line, .0)]
    UnexpectedToken(TokenInfo),

    #[error("Line {0}: Unexpected end of file")]
    UnexpectedEOF(usize),

    #[error("Line {}: {}", .0.line, .1)]
    InvalidToken(TokenInfo, String),

    #[error("Line {0}: Unknown statement '{1}'")]
    UnknownStatement(usize, String),

    #[error("Line {0}: Unknown type '{1}'")]
    UnknownType(usize, String),

    #[error("Line {0}: Duplicate identifier '{1}'")]
    Duplicate(usize, String),

    #[error("Line {0}: Missing 'end.' at end of program")]
    MissingProgramEnd(usize),

    #[error("Line {0}: Nested too deeply")]
    TooDeep(usize),

    // Runtime errors
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("Cannot assign to constant '{0}'")]
    AssignToConstant(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("String exceeds {0} characters")]
    StringTooLong(usize),

    #[error("Execution step limit exceeded ({0} steps)")]
    StepLimit(usize),

    #[error("Program has not been compiled successfully")]
    NotCompiled,
}

impl Error {
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::UnexpectedToken(token) | Error::InvalidToken(token, _) => Some(token.line),
            Error::UnexpectedEOF(line)
            | Error::UnknownStatement(line, _)
            | Error::UnknownType(line, _)
            | Error::Duplicate(line, _)
            | Error::MissingProgramEnd(line)
            | Error::TooDeep(line) => Some(*line),
            _ => None,
        }
    }

    /// Print error with the offending source line
    pub fn print_diag(&self, file: &str, lines: &[&str]) {
        cprintln!("<red,bold>error</>: {}", self);

        let Some(line_num) = self.line() else {
            return;
        };
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");
        let line_content = lines.get(line_num.saturating_sub(1)).copied().unwrap_or("");
        cprintln!(" <blue>{:>4} |</> {}", line_num, line_content);
        cprintln!("      <blue>|</>");
    }
}

impl serde::Serialize for Error {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
