use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 16-bit registers. The first eight follow the x86 `reg` field encoding so
/// that `0xB8 + reg` style opcodes can be built from the discriminant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Reg {
    #[default]
    AX,
    CX,
    DX,
    BX,
    SP,
    BP,
    SI,
    DI,
    ES,
    CS,
    SS,
    DS,
    IP,
    FLAGS,
}

impl Reg {
    pub const COUNT: usize = 14;

    /// Order used by register dumps.
    pub const DUMP_ORDER: [Reg; Reg::COUNT] = [
        Reg::AX,
        Reg::BX,
        Reg::CX,
        Reg::DX,
        Reg::SI,
        Reg::DI,
        Reg::SP,
        Reg::BP,
        Reg::CS,
        Reg::DS,
        Reg::ES,
        Reg::SS,
        Reg::IP,
        Reg::FLAGS,
    ];

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    /// `reg` field value for the eight general purpose registers.
    pub fn code(self) -> Option<u8> {
        let idx: u8 = self.into();
        (idx < 8).then_some(idx)
    }

    pub fn is_segment(self) -> bool {
        matches!(self, Reg::ES | Reg::CS | Reg::SS | Reg::DS)
    }

    pub fn index(self) -> usize {
        let idx: u8 = self.into();
        idx as usize
    }
}

/// 8-bit halves of AX..BX, in x86 `reg` field order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Reg8 {
    #[default]
    AL,
    CL,
    DL,
    BL,
    AH,
    CH,
    DH,
    BH,
}

impl Reg8 {
    pub fn code(self) -> u8 {
        self.into()
    }

    /// The 16-bit register this half belongs to.
    pub fn parent(self) -> Reg {
        Reg::from(self.code() & 0b11)
    }

    pub fn is_high(self) -> bool {
        self.code() & 0b100 != 0
    }
}

/// A register operand, either a whole word register or a byte half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Register {
    Word(Reg),
    Byte(Reg8),
}

impl Register {
    /// Registers that may appear as instruction operands. `ip` and `flags`
    /// are not addressable.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(r) = s.parse::<Reg8>() {
            return Some(Register::Byte(r));
        }
        match s.parse::<Reg>() {
            Ok(Reg::IP | Reg::FLAGS) | Err(_) => None,
            Ok(r) => Some(Register::Word(r)),
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Register::Word(_))
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Register::Word(r) => write!(f, "{r}"),
            Register::Byte(r) => write!(f, "{r}"),
        }
    }
}
