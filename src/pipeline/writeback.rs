//! WB: commits the final result to the register file and requests EX
//! forwarding from this, the last live source.

use crate::error::{SimError, SimResult};
use crate::instruction::Opcode;
use crate::pipeline::hazard;
use crate::pipeline::ForwardSource;
use crate::state::ProcessorState;

/// Advances the writeback stage one cycle.
pub fn process(state: &mut ProcessorState) -> SimResult<()> {
    let inst = state.writeback.inst;

    let dest = match inst.op {
        Opcode::Add | Opcode::Sub => inst.rd,
        Opcode::Addi | Opcode::Subi | Opcode::Lw => inst.rt,
        _ => None,
    };

    let data = match inst.op {
        Opcode::Add | Opcode::Sub | Opcode::Addi | Opcode::Subi => state.writeback.alu_out,
        Opcode::Lw => state.writeback.read_data,
        _ => 0,
    };

    if let Some(reg) = dest {
        if reg == crate::constants::R0 {
            return Err(SimError::IllegalRegisterWrite { attempted: reg });
        }
        state.register_file[reg as usize] = data;
    }

    let execute_reader = state.execute.inst;
    hazard::forward_on_hazard(state, execute_reader, inst, ForwardSource::Writeback, data);

    state.writeback.result = data;

    if inst.op != Opcode::Nop {
        state.instructions_executed += 1;
    }

    Ok(())
}
