pub mod dos;
pub mod trace;

use crate::assembler::ObjectCode;
use crate::model::{Effect, State};

/// Side effects applied after each executed instruction. Hooks run in order
/// and may rewrite the effect before later hooks see it.
pub trait Hook {
    fn init(&mut self, state: State) -> State {
        state
    }
    fn exec(&mut self, step: usize, code: &ObjectCode, effect: &mut Effect, state: State) -> State;
}
