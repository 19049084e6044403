pub mod compile;
pub mod display;
pub mod error;
pub mod eval;
pub mod grammer;

pub use compile::{compile, execute, execute_with, Compilation, Execution, Limits};
pub use display::{display_execution_results, display_header, display_results};
pub use error::Error;
pub use grammer::lexer::{tokenize, Lexer};
pub use grammer::parsercore::Parser;
pub use grammer::token::{Token, TokenKind};
