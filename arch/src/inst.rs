use crate::{op::Mnemonic, reg::Register};

use color_print::cformat;
use serde::{Deserialize, Serialize};
use std::fmt;

// ----------------------------------------------------------------------------
// Operand

/// Operand descriptor, decided once when the line is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Operand {
    Register(Register),
    Immediate(u16),
    /// `name` or `offset name`
    Label(String),
    /// `@data`, `@code`, ...
    Segment(String),
    /// Anything else (memory references, expressions). Not simulated.
    Memory(String),
}

impl Operand {
    pub fn parse(text: &str) -> Operand {
        let text = text.trim();
        if let Some(reg) = Register::parse(text) {
            return Operand::Register(reg);
        }
        if let Some(rest) = strip_prefix_ignore_case(text, "offset ") {
            let name = rest.trim();
            if is_ident(name) {
                return Operand::Label(name.to_string());
            }
        }
        if let Some(seg) = text.strip_prefix('@') {
            if is_ident(seg) {
                return Operand::Segment(seg.to_ascii_lowercase());
            }
        }
        if let Some(val) = parse_number(text) {
            return Operand::Immediate(val);
        }
        if is_ident(text) {
            return Operand::Label(text.to_string());
        }
        Operand::Memory(text.to_string())
    }

    /// Simplified encoding: a register is a single placeholder byte, an
    /// immediate is 1 or 2 little-endian bytes, a resolved label is its
    /// 16-bit address and everything else is a single zero byte.
    pub fn encode<F: Fn(&str) -> Option<u16>>(&self, resolve: &F) -> Vec<u8> {
        match self {
            Operand::Register(_) => vec![0x00],
            Operand::Immediate(v) if *v <= 0xFF => vec![*v as u8],
            Operand::Immediate(v) => v.to_le_bytes().to_vec(),
            Operand::Label(name) => match resolve(name) {
                Some(addr) => addr.to_le_bytes().to_vec(),
                None => vec![0x00],
            },
            Operand::Segment(_) | Operand::Memory(_) => vec![0x00],
        }
    }

    /// Word-sized encoding used by `mov r16, imm`.
    fn encode_word<F: Fn(&str) -> Option<u16>>(&self, resolve: &F) -> [u8; 2] {
        match self {
            Operand::Immediate(v) => v.to_le_bytes(),
            Operand::Label(name) => resolve(name).unwrap_or(0).to_le_bytes(),
            _ => [0x00, 0x00],
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Operand::Label(name) => Some(name),
            _ => None,
        }
    }

    fn cfmt(&self) -> String {
        match self {
            Operand::Register(r) => cformat!("<b>{}</>", r),
            Operand::Immediate(v) => cformat!("<y>0x{:0>4X}</>", v),
            Operand::Label(name) => cformat!("<g>{}</>", name),
            Operand::Segment(seg) => cformat!("<c>@{}</>", seg),
            Operand::Memory(text) => cformat!("<r,u>{}</>", text),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{r}"),
            Operand::Immediate(v) => write!(f, "{v:X}h"),
            Operand::Label(name) => write!(f, "{name}"),
            Operand::Segment(seg) => write!(f, "@{seg}"),
            Operand::Memory(text) => write!(f, "{text}"),
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inst {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
    pub opcode: u8,
    pub size: u16,
}

impl Inst {
    pub fn new(mnemonic: Mnemonic, operands: Vec<Operand>) -> Self {
        let (opcode, size) = select(mnemonic, &operands);
        Inst {
            mnemonic,
            operands,
            opcode,
            size,
        }
    }

    pub fn dst(&self) -> Option<&Operand> {
        self.operands.first()
    }

    pub fn src(&self) -> Option<&Operand> {
        self.operands.get(1)
    }

    pub fn encode<F: Fn(&str) -> Option<u16>>(&self, resolve: F) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        match self.opcode {
            0xB0..=0xB7 => {
                if let Some(Operand::Immediate(v)) = self.src() {
                    bytes.push(*v as u8);
                }
            }
            0xB8..=0xBF => {
                if let Some(src) = self.src() {
                    bytes.extend(src.encode_word(&resolve));
                }
            }
            0x8E => bytes.push(0x00),
            0x50..=0x5F => {}
            _ => {
                for operand in &self.operands {
                    bytes.extend(operand.encode(&resolve));
                }
            }
        }
        bytes
    }

    pub fn cformat(&self) -> String {
        let args = self
            .operands
            .iter()
            .map(Operand::cfmt)
            .collect::<Vec<_>>()
            .join(", ");
        cformat!("<r>{:<6}</>{}", self.mnemonic.to_string(), args)
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)?;
        for (idx, operand) in self.operands.iter().enumerate() {
            let sep = if idx == 0 { " " } else { ", " };
            write!(f, "{sep}{operand}")?;
        }
        Ok(())
    }
}

/// Operand patterns that select a more specific opcode than the generic
/// mnemonic entry.
fn select(mnemonic: Mnemonic, operands: &[Operand]) -> (u8, u16) {
    use Register::{Byte, Word};
    match (mnemonic, operands) {
        (Mnemonic::Mov, [Operand::Register(Byte(r)), Operand::Immediate(_)]) => {
            (0xB0 + r.code(), 2)
        }
        (
            Mnemonic::Mov,
            [Operand::Register(Word(r)), Operand::Immediate(_) | Operand::Label(_) | Operand::Segment(_)],
        ) => match r.code() {
            Some(code) => (0xB8 + code, 3),
            None => (mnemonic.opcode(), mnemonic.size()),
        },
        (Mnemonic::Mov, [Operand::Register(Word(sreg)), Operand::Register(Word(_))])
            if sreg.is_segment() =>
        {
            (0x8E, 2)
        }
        (Mnemonic::Push, [Operand::Register(Word(r))]) => match r.code() {
            Some(code) => (0x50 + code, 1),
            None => (mnemonic.opcode(), mnemonic.size()),
        },
        (Mnemonic::Pop, [Operand::Register(Word(r))]) => match r.code() {
            Some(code) => (0x58 + code, 1),
            None => (mnemonic.opcode(), mnemonic.size()),
        },
        _ => (mnemonic.opcode(), mnemonic.size()),
    }
}

// ----------------------------------------------------------------------------
// Literals

/// Parses `123`, `0dh`, `0x0D`, `1010b`, `-1` and `'A'`.
pub fn parse_number(s: &str) -> Option<u16> {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix('-') {
        return parse_number(rest).map(u16::wrapping_neg);
    }
    let bytes = s.as_bytes();
    if bytes.len() == 3 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[2] == bytes[0] {
        return Some(bytes[1] as u16);
    }
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let lower = s.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_suffix('h') {
        (hex, 16)
    } else if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_suffix('b') {
        (bin, 2)
    } else {
        (lower.as_str(), 10)
    };
    u32::from_str_radix(digits, radix)
        .ok()
        .filter(|v| *v <= 0xFFFF)
        .map(|v| v as u16)
}

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => s.get(prefix.len()..),
        _ => None,
    }
}
