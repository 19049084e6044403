pub mod assembler;
pub mod cpu;
pub mod display;
pub mod error;
pub mod hooks;
pub mod label;
pub mod model;
pub mod parser;

pub use arch::Reg;
pub use assembler::{assemble, Assembly, ObjectCode, ORIGIN};
pub use cpu::{execute, execute_with, Execution, Halt, Limits};
pub use display::{display_execution_results, display_header, display_results};
pub use error::Error;
pub use label::{Label, LabelType, Labels};
pub use parser::{parse_directive, parse_instruction, Directive};
