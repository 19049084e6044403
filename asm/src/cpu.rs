use std::collections::HashMap;

use arch::Reg;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assembler::Assembly;
use crate::hooks::{dos::Dos, trace::Trace, Hook};
use crate::model::State;

/// Bytes of memory copied into the execution result.
pub const MEMORY_WINDOW: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_steps: 1000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Halt {
    /// `int 21h/4Ch` or `int 20h`
    Terminated,
    /// `ip` left the assembled code
    EndOfProgram,
    StepLimit,
    /// The assembly had errors and was not run
    NotAssembled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Execution {
    pub success: bool,
    pub registers: IndexMap<Reg, u16>,
    pub memory: Vec<u8>,
    /// Execution trace, one line per instruction.
    pub output: Vec<String>,
    /// Text written through DOS services.
    pub console: String,
    pub instructions_executed: usize,
    pub halt: Halt,
    pub errors: Vec<String>,
}

pub fn execute(asm: &Assembly) -> Execution {
    execute_with(asm, &Limits::default())
}

/// Runs the assembled program on a fresh CPU until it terminates, leaves the
/// code or hits `limits.max_steps`.
pub fn execute_with(asm: &Assembly, limits: &Limits) -> Execution {
    let mut state = State::new();

    if !asm.success {
        return Execution {
            success: false,
            registers: dump_registers(&state),
            memory: state.memory(MEMORY_WINDOW),
            output: vec![],
            console: String::new(),
            instructions_executed: 0,
            halt: Halt::NotAssembled,
            errors: asm.errors.iter().map(ToString::to_string).collect(),
        };
    }

    state.load_data(&asm.data);
    state.set(Reg::IP, asm.entry_point());

    let index: HashMap<u16, usize> = asm
        .object_code
        .iter()
        .enumerate()
        .map(|(idx, code)| (code.address, idx))
        .collect();

    let mut dos = Dos::new();
    let mut trace = Trace::new();
    state = dos.init(state);
    state = trace.init(state);

    let mut steps = 0;
    let halt = loop {
        if state.is_terminated() {
            break Halt::Terminated;
        }
        let Some(code) = index.get(&state.get(Reg::IP)).map(|&idx| &asm.object_code[idx]) else {
            break Halt::EndOfProgram;
        };
        if steps >= limits.max_steps {
            break Halt::StepLimit;
        }

        let mut effect = state.exec(&code.inst, |name| asm.labels.get_val(name));
        steps += 1;

        let hooks: [&mut dyn Hook; 2] = [&mut dos, &mut trace];
        state = hooks
            .into_iter()
            .fold(state, |state, hook| hook.exec(steps, code, &mut effect, state));
    };

    if halt == Halt::StepLimit {
        warn!(steps, "execution limit reached");
        trace.push(format!("Execution limit reached ({steps} instructions)"));
    }
    debug!(steps, ?halt, "execution finished");

    Execution {
        success: true,
        registers: dump_registers(&state),
        memory: state.memory(MEMORY_WINDOW),
        output: trace.into_lines(),
        console: dos.into_console(),
        instructions_executed: steps,
        halt,
        errors: vec![],
    }
}

fn dump_registers(state: &State) -> IndexMap<Reg, u16> {
    Reg::DUMP_ORDER
        .iter()
        .map(|&reg| (reg, state.get(reg)))
        .collect()
}
