pub mod alu;
pub mod inst;
pub mod op;
pub mod reg;

pub use inst::{parse_number, Inst, Operand};
pub use op::Mnemonic;
pub use reg::{Reg, Reg8, Register};
