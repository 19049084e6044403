use arch::{Reg, Reg8, Register};

use super::Hook;
use crate::assembler::ObjectCode;
use crate::model::{Effect, State};

/// `int 21h` / `int 20h` services writing to an in-memory console.
#[derive(Debug, Default)]
pub struct Dos {
    console: String,
}

impl Dos {
    pub fn new() -> Self {
        Dos::default()
    }

    pub fn into_console(self) -> String {
        self.console
    }

    fn service(&mut self, n: u8, state: &mut State) -> String {
        match (n, state.read(Register::Byte(Reg8::AH)) as u8) {
            (0x20, _) => {
                state.terminate();
                "program terminated".to_string()
            }
            (0x21, 0x02) => {
                let c = state.read(Register::Byte(Reg8::DL)) as u8 as char;
                self.console.push(c);
                state.write(Register::Byte(Reg8::AL), c as u16);
                format!("print char {c:?}")
            }
            (0x21, 0x09) => {
                let text = read_dollar_string(state, state.get(Reg::DX));
                self.console.push_str(&text);
                state.write(Register::Byte(Reg8::AL), b'$' as u16);
                format!("print string {text:?}")
            }
            (0x21, 0x4C) => {
                state.terminate();
                let code = state.read(Register::Byte(Reg8::AL));
                format!("program terminated (exit code {code:02X}h)")
            }
            (0x21, ah) => format!("unsupported interrupt 21h function {ah:02X}h"),
            (n, _) => format!("unsupported interrupt {n:02X}h"),
        }
    }
}

/// Reads bytes from `addr` up to (not including) `$`, giving up after one
/// full pass over memory.
fn read_dollar_string(state: &State, addr: u16) -> String {
    let mut text = String::new();
    let mut addr = addr;
    for _ in 0..=u16::MAX {
        let b = state.load8(addr);
        if b == b'$' {
            break;
        }
        text.push(b as char);
        addr = addr.wrapping_add(1);
    }
    text
}

impl Hook for Dos {
    fn exec(&mut self, _step: usize, _code: &ObjectCode, effect: &mut Effect, mut state: State) -> State {
        if let Effect::Interrupt(n) = *effect {
            *effect = Effect::Service(self.service(n, &mut state));
        }
        state
    }
}
