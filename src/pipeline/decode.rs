//! ID: reads register operands, resolves control transfers, and feeds EX.

use crate::error::SimResult;
use crate::instruction::{Instruction, Opcode};
use crate::state::ProcessorState;

/// Advances the decode stage one cycle.
pub fn process(state: &mut ProcessorState) -> SimResult<()> {
    if state.decode.stall {
        state.decode.stall = false;
        state.fetch.stall = true;
        state.execute.inst = Instruction::NOP;
        tracing::trace!(target: "dlxsim::pipeline", "ID: stalling, bubble into EX");
        return Ok(());
    }

    let inst = state.decode.inst;

    let a = if state.decode.forward {
        state.decode.data
    } else {
        reg_value(state, inst.rs)
    };
    let b = reg_value(state, inst.rt);
    state.decode.forward = false;

    let should_jump = match inst.op {
        Opcode::Beqz => a == 0,
        Opcode::Bnez => a != 0,
        Opcode::J => true,
        _ => false,
    };

    state.decode.should_jump = should_jump;
    state.fetch.flush = should_jump;
    if should_jump {
        tracing::trace!(target: "dlxsim::pipeline", op = %inst.op, "ID: branch/jump taken, flushing IF");
    }

    state.fetch.pc_branch = inst.imm + state.decode.pc_next;

    state.execute.inst = inst;
    state.execute.a = a;
    state.execute.b = b;

    Ok(())
}

/// Reads a source operand, returning 0 for the "unused" sentinel
/// (branches with no `rt`, J with neither operand, etc., never consult
/// this value, but the ALU and decode paths read both ports
/// unconditionally, the way the original C does before discarding the
/// unused half).
fn reg_value(state: &ProcessorState, reg: Option<u8>) -> i64 {
    match reg {
        Some(r) => state.register_file[r as usize],
        None => 0,
    }
}
