use tracing::trace;

use super::Hook;
use crate::assembler::ObjectCode;
use crate::model::{Effect, State};

/// Collects one `[ADDR] source -> effect` line per executed instruction.
#[derive(Debug, Default)]
pub struct Trace {
    lines: Vec<String>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Hook for Trace {
    fn exec(&mut self, step: usize, code: &ObjectCode, effect: &mut Effect, state: State) -> State {
        let line = format!("[{:04X}] {} -> {}", code.address, code.source, effect);
        trace!(step, "{line}");
        self.lines.push(line);
        state
    }
}
