use bimap::BiMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    Mov,
    Add,
    Sub,
    Cmp,
    Jmp,
    Je,
    Jne,
    Call,
    Ret,
    Int,
    Push,
    Pop,
}

// Generic encodings, used when no operand pattern selects a specific form.
static OPCODES: Lazy<BiMap<Mnemonic, u8>> = Lazy::new(|| {
    let mut map = BiMap::new();
    map.insert(Mnemonic::Mov, 0x89);
    map.insert(Mnemonic::Add, 0x01);
    map.insert(Mnemonic::Sub, 0x29);
    map.insert(Mnemonic::Cmp, 0x39);
    map.insert(Mnemonic::Jmp, 0xEB);
    map.insert(Mnemonic::Je, 0x74);
    map.insert(Mnemonic::Jne, 0x75);
    map.insert(Mnemonic::Call, 0xE8);
    map.insert(Mnemonic::Ret, 0xC3);
    map.insert(Mnemonic::Int, 0xCD);
    map.insert(Mnemonic::Push, 0xFF);
    map.insert(Mnemonic::Pop, 0x8F);
    map
});

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn opcode(self) -> u8 {
        OPCODES.get_by_left(&self).copied().unwrap_or(0x90)
    }

    /// Declared size in bytes of the generic encoding.
    pub fn size(self) -> u16 {
        match self {
            Mnemonic::Ret => 1,
            Mnemonic::Call => 3,
            _ => 2,
        }
    }

    /// Maps an opcode byte back to its mnemonic, including the
    /// register-in-opcode families.
    pub fn decode(opcode: u8) -> Option<Self> {
        if let Some(m) = OPCODES.get_by_right(&opcode) {
            return Some(*m);
        }
        match opcode {
            0xB0..=0xBF | 0x8E => Some(Mnemonic::Mov),
            0x50..=0x57 => Some(Mnemonic::Push),
            0x58..=0x5F => Some(Mnemonic::Pop),
            _ => None,
        }
    }

    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Mnemonic::Jmp | Mnemonic::Je | Mnemonic::Jne | Mnemonic::Call
        )
    }
}
