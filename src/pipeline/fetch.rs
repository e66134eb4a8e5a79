//! IF: fetches the next instruction, handles stalls/flushes, and resolves
//! the next PC.

use crate::error::{SimError, SimResult};
use crate::instruction::Instruction;
use crate::state::ProcessorState;

/// Advances the fetch stage one cycle. Reads `state.fetch`/`state.decode`
/// as left by the previous cycle's pass and publishes into
/// `state.decode` and `state.fetch` for the next.
pub fn process(state: &mut ProcessorState) -> SimResult<()> {
    if state.fetch.stall {
        state.fetch.stall = false;
        tracing::trace!(target: "dlxsim::pipeline", "IF: stalling");
        return Ok(());
    }

    if state.fetch.flush {
        state.decode.inst = Instruction::NOP;
        state.fetch.flush = false;
        state.fetch.pc = state.fetch.pc_branch;
        tracing::trace!(target: "dlxsim::pipeline", pc = state.fetch.pc, "IF: flushed to branch target");
        return Ok(());
    }

    let pc_now = state.fetch.pc;
    let count = state.instructions_count();

    if pc_now >= count {
        if pc_now >= count + crate::constants::DRAIN_CYCLES {
            state.halt = true;
            tracing::debug!(target: "dlxsim::pipeline", "IF: drain complete, halting");
        } else {
            state.decode.inst = Instruction::NOP;
        }
    } else {
        state.decode.inst = state.instruction_memory[pc_now as usize];
    }

    let pc_next = pc_now + 1;
    state.decode.pc_next = pc_next;

    if state.decode.should_jump {
        let target = state.fetch.pc_branch;
        if target < 0 || target >= count {
            return Err(SimError::IllegalJump { target });
        }
        state.fetch.pc = target;
    } else {
        state.fetch.pc = pc_next;
    }

    Ok(())
}
