use std::fmt;

use arch::alu::{flags, valu, ALU};
use arch::{Inst, Mnemonic, Operand, Reg, Register};

pub const MEMORY_SIZE: usize = 0x1_0000;
pub const STACK_TOP: u16 = 0xFFFE;

pub struct State {
    regs: [u16; Reg::COUNT],
    mem: Vec<u8>,
    terminated: bool,
}

/// What one instruction did, rendered into the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Write(Register, u16),
    Compare(u16, u16),
    Jump(u16),
    NotTaken,
    Call(u16),
    Return(u16),
    Push(Reg, u16),
    Pop(Reg, u16),
    Interrupt(u8),
    /// Filled in by the DOS hook once the service is known.
    Service(String),
    Unsupported(String),
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Write(reg, val) if reg.is_word() => write!(f, "{} = {:04X}h", upper(reg), val),
            Effect::Write(reg, val) => write!(f, "{} = {:02X}h", upper(reg), val),
            Effect::Compare(a, b) => write!(f, "compare {a:04X}h with {b:04X}h"),
            Effect::Jump(target) => write!(f, "jump to {target:04X}h"),
            Effect::NotTaken => write!(f, "not taken"),
            Effect::Call(target) => write!(f, "call {target:04X}h"),
            Effect::Return(target) => write!(f, "return to {target:04X}h"),
            Effect::Push(reg, val) => write!(f, "push {} ({val:04X}h)", upper(reg)),
            Effect::Pop(reg, val) => write!(f, "pop {} ({val:04X}h)", upper(reg)),
            Effect::Interrupt(n) => write!(f, "interrupt {n:02X}h"),
            Effect::Service(text) => write!(f, "{text}"),
            Effect::Unsupported(text) => write!(f, "{text}"),
        }
    }
}

fn upper(reg: &impl fmt::Display) -> String {
    reg.to_string().to_uppercase()
}

// Register and memory access
impl State {
    pub fn get(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn set(&mut self, reg: Reg, val: u16) {
        self.regs[reg.index()] = val;
    }

    pub fn read(&self, register: Register) -> u16 {
        match register {
            Register::Word(reg) => self.get(reg),
            Register::Byte(half) => {
                let word = self.get(half.parent());
                if half.is_high() {
                    word >> 8
                } else {
                    word & 0x00FF
                }
            }
        }
    }

    pub fn write(&mut self, register: Register, val: u16) {
        match register {
            Register::Word(reg) => self.set(reg, val),
            Register::Byte(half) => {
                let word = self.get(half.parent());
                let word = if half.is_high() {
                    (word & 0x00FF) | ((val & 0xFF) << 8)
                } else {
                    (word & 0xFF00) | (val & 0xFF)
                };
                self.set(half.parent(), word);
            }
        }
    }

    pub fn load8(&self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    pub fn store8(&mut self, addr: u16, val: u8) {
        self.mem[addr as usize] = val;
    }

    pub fn load16(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.load8(addr), self.load8(addr.wrapping_add(1))])
    }

    pub fn store16(&mut self, addr: u16, val: u16) {
        let [lo, hi] = val.to_le_bytes();
        self.store8(addr, lo);
        self.store8(addr.wrapping_add(1), hi);
    }

    pub fn memory(&self, len: usize) -> Vec<u8> {
        self.mem[..len.min(MEMORY_SIZE)].to_vec()
    }

    fn push(&mut self, val: u16) {
        let sp = self.get(Reg::SP).wrapping_sub(2);
        self.set(Reg::SP, sp);
        self.store16(sp, val);
    }

    fn pop(&mut self) -> u16 {
        let sp = self.get(Reg::SP);
        let val = self.load16(sp);
        self.set(Reg::SP, sp.wrapping_add(2));
        val
    }

    fn flag(&self, mask: u16) -> bool {
        self.get(Reg::FLAGS) & mask != 0
    }
}

impl State {
    pub fn new() -> Self {
        let mut state = State {
            regs: [0; Reg::COUNT],
            mem: vec![0; MEMORY_SIZE],
            terminated: false,
        };
        state.set(Reg::SP, STACK_TOP);
        state
    }

    pub fn load_data(&mut self, data: &[u8]) {
        let len = data.len().min(MEMORY_SIZE);
        self.mem[..len].copy_from_slice(&data[..len]);
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Executes the instruction at `ip` and advances `ip`. `resolve` maps
    /// label names to addresses.
    pub fn exec<F: Fn(&str) -> Option<u16>>(&mut self, inst: &Inst, resolve: F) -> Effect {
        let ip = self.get(Reg::IP);
        let next = ip.wrapping_add(inst.size);
        self.set(Reg::IP, next);

        let Some(mnemonic) = Mnemonic::decode(inst.opcode) else {
            return Effect::Unsupported(format!("unmapped opcode {:02X}h", inst.opcode));
        };

        match mnemonic {
            Mnemonic::Mov => self.mov(inst, &resolve),
            Mnemonic::Add => self.calc(ALU::ADD, inst, &resolve, true),
            Mnemonic::Sub => self.calc(ALU::SUB, inst, &resolve, true),
            Mnemonic::Cmp => self.calc(ALU::SUB, inst, &resolve, false),
            Mnemonic::Jmp => self.jump(inst, &resolve, true),
            Mnemonic::Je => self.jump(inst, &resolve, self.flag(flags::ZF)),
            Mnemonic::Jne => self.jump(inst, &resolve, !self.flag(flags::ZF)),
            Mnemonic::Call => match self.target(inst, &resolve) {
                Ok(target) => {
                    self.push(next);
                    self.set(Reg::IP, target);
                    Effect::Call(target)
                }
                Err(effect) => effect,
            },
            Mnemonic::Ret => {
                let target = self.pop();
                self.set(Reg::IP, target);
                Effect::Return(target)
            }
            Mnemonic::Push => match inst.dst() {
                Some(Operand::Register(Register::Word(reg))) => {
                    let val = self.get(*reg);
                    self.push(val);
                    Effect::Push(*reg, val)
                }
                other => unsupported("push", other),
            },
            Mnemonic::Pop => match inst.dst() {
                Some(Operand::Register(Register::Word(reg))) => {
                    let val = self.pop();
                    self.set(*reg, val);
                    Effect::Pop(*reg, val)
                }
                other => unsupported("pop", other),
            },
            Mnemonic::Int => match inst.dst() {
                Some(Operand::Immediate(n)) => Effect::Interrupt(*n as u8),
                other => unsupported("int", other),
            },
        }
    }

    fn value<F: Fn(&str) -> Option<u16>>(&self, operand: Option<&Operand>, resolve: &F) -> Result<u16, Effect> {
        match operand {
            Some(Operand::Register(reg)) => Ok(self.read(*reg)),
            Some(Operand::Immediate(v)) => Ok(*v),
            Some(Operand::Label(name)) => {
                resolve(name).ok_or_else(|| Effect::Unsupported(format!("undefined label '{name}'")))
            }
            Some(Operand::Segment(_)) => Ok(0),
            Some(Operand::Memory(text)) => Err(Effect::Unsupported(format!("unsupported operand '{text}'"))),
            None => Err(Effect::Unsupported("missing operand".to_string())),
        }
    }

    fn mov<F: Fn(&str) -> Option<u16>>(&mut self, inst: &Inst, resolve: &F) -> Effect {
        let Some(Operand::Register(dst)) = inst.dst() else {
            return unsupported("mov", inst.dst());
        };
        match self.value(inst.src(), resolve) {
            Ok(val) => {
                let val = if dst.is_word() { val } else { val & 0xFF };
                self.write(*dst, val);
                Effect::Write(*dst, val)
            }
            Err(effect) => effect,
        }
    }

    fn calc<F: Fn(&str) -> Option<u16>>(&mut self, op: ALU, inst: &Inst, resolve: &F, store: bool) -> Effect {
        let Some(Operand::Register(dst)) = inst.dst() else {
            return unsupported(&inst.mnemonic.to_string(), inst.dst());
        };
        let b = match self.value(inst.src(), resolve) {
            Ok(b) => b,
            Err(effect) => return effect,
        };
        let a = self.read(*dst);
        let (res, f) = valu(op, a, b, dst.is_word());
        self.set(Reg::FLAGS, f);
        if store {
            self.write(*dst, res);
            Effect::Write(*dst, res)
        } else {
            Effect::Compare(a, b)
        }
    }

    fn target<F: Fn(&str) -> Option<u16>>(&self, inst: &Inst, resolve: &F) -> Result<u16, Effect> {
        match inst.dst() {
            Some(Operand::Label(_) | Operand::Immediate(_)) => self.value(inst.dst(), resolve),
            other => Err(unsupported(&inst.mnemonic.to_string(), other)),
        }
    }

    fn jump<F: Fn(&str) -> Option<u16>>(&mut self, inst: &Inst, resolve: &F, taken: bool) -> Effect {
        match self.target(inst, resolve) {
            Ok(target) if taken => {
                self.set(Reg::IP, target);
                Effect::Jump(target)
            }
            Ok(_) => Effect::NotTaken,
            Err(effect) => effect,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported(mnemonic: &str, operand: Option<&Operand>) -> Effect {
    match operand {
        Some(operand) => Effect::Unsupported(format!("unsupported operand '{operand}' for {mnemonic}")),
        None => Effect::Unsupported(format!("missing operand for {mnemonic}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_instruction;

    fn run(state: &mut State, line: &str) -> Effect {
        let inst = parse_instruction(line).unwrap();
        state.exec(&inst, |name| (name == "target").then_some(0x0200))
    }

    #[test]
    fn byte_halves() {
        let mut state = State::new();
        run(&mut state, "mov ax, 1234h");
        run(&mut state, "mov ah, 0ABh");
        assert_eq!(state.get(Reg::AX), 0xAB34);
        assert_eq!(run(&mut state, "mov dl, 'A'"), Effect::Write(Register::parse("dl").unwrap(), 0x41));
        assert_eq!(state.get(Reg::DX), 0x0041);
    }

    #[test]
    fn arithmetic_and_flags() {
        let mut state = State::new();
        run(&mut state, "mov ax, 5");
        run(&mut state, "sub ax, 5");
        assert_eq!(state.get(Reg::AX), 0);
        assert!(state.flag(flags::ZF));
        run(&mut state, "add ax, 3");
        assert!(!state.flag(flags::ZF));
        assert_eq!(run(&mut state, "cmp ax, 3"), Effect::Compare(3, 3));
        assert!(state.flag(flags::ZF));
        assert_eq!(state.get(Reg::AX), 3);
    }

    #[test]
    fn jumps() {
        let mut state = State::new();
        state.set(Reg::IP, 0x0100);
        run(&mut state, "cmp ax, 1");
        assert_eq!(run(&mut state, "je target"), Effect::NotTaken);
        assert_eq!(state.get(Reg::IP), 0x0104);
        assert_eq!(run(&mut state, "jne target"), Effect::Jump(0x0200));
        assert_eq!(state.get(Reg::IP), 0x0200);
    }

    #[test]
    fn call_ret_stack() {
        let mut state = State::new();
        state.set(Reg::IP, 0x0100);
        assert_eq!(run(&mut state, "call target"), Effect::Call(0x0200));
        assert_eq!(state.get(Reg::SP), STACK_TOP - 2);
        assert_eq!(state.load16(STACK_TOP - 2), 0x0103);
        assert_eq!(run(&mut state, "ret"), Effect::Return(0x0103));
        assert_eq!(state.get(Reg::SP), STACK_TOP);

        run(&mut state, "mov bx, 7");
        run(&mut state, "push bx");
        run(&mut state, "pop cx");
        assert_eq!(state.get(Reg::CX), 7);
    }

    #[test]
    fn degraded_operands() {
        let mut state = State::new();
        assert!(matches!(run(&mut state, "mov ax, [bx]"), Effect::Unsupported(_)));
        assert!(matches!(run(&mut state, "jmp nowhere"), Effect::Unsupported(_)));
        assert_eq!(run(&mut state, "int 21h"), Effect::Interrupt(0x21));
    }
}
