use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, FromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum ALU {
    #[default]
    ADD,
    SUB,
}

pub mod flags {
    pub const CF: u16 = 0x0001;
    pub const ZF: u16 = 0x0040;
    pub const SF: u16 = 0x0080;
    pub const OF: u16 = 0x0800;
}

/// Computes `a op b` on 8 or 16 bits and returns the result together with
/// the CF/ZF/SF/OF bits it produces.
pub fn valu<T: Into<ALU>>(op: T, a: u16, b: u16, word: bool) -> (u16, u16) {
    let (mask, sign) = if word {
        (0xFFFF_u32, 0x8000_u32)
    } else {
        (0x00FF_u32, 0x0080_u32)
    };
    let (a, b) = (a as u32 & mask, b as u32 & mask);
    let op = op.into();
    let (res, carry) = match op {
        ALU::ADD => ((a + b) & mask, a + b > mask),
        ALU::SUB => (a.wrapping_sub(b) & mask, a < b),
    };

    let (sa, sb, sr) = (a & sign != 0, b & sign != 0, res & sign != 0);
    let overflow = match op {
        ALU::ADD => sa == sb && sr != sa,
        ALU::SUB => sa != sb && sr != sa,
    };

    let mut f = 0;
    if carry {
        f |= flags::CF;
    }
    if res == 0 {
        f |= flags::ZF;
    }
    if res & sign != 0 {
        f |= flags::SF;
    }
    if overflow {
        f |= flags::OF;
    }
    (res as u16, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_word() {
        assert_eq!(valu(ALU::ADD, 1, 2, true), (3, 0));
        assert_eq!(valu(ALU::ADD, 0xFFFF, 1, true), (0, flags::CF | flags::ZF));
        assert_eq!(valu(ALU::ADD, 0x7FFF, 1, true), (0x8000, flags::SF | flags::OF));
    }

    #[test]
    fn sub_word() {
        assert_eq!(valu(ALU::SUB, 5, 5, true), (0, flags::ZF));
        assert_eq!(valu(ALU::SUB, 0, 1, true), (0xFFFF, flags::CF | flags::SF));
        assert_eq!(valu(ALU::SUB, 0x8000, 1, true), (0x7FFF, flags::OF));
    }

    #[test]
    fn byte_width() {
        assert_eq!(valu(ALU::ADD, 0xFF, 1, false), (0, flags::CF | flags::ZF));
        assert_eq!(valu(ALU::SUB, 0x10, 0x01, false), (0x0F, 0));
    }
}
