//! EX: resolves forwarded operands, runs the ALU, and requests a branch-use
//! stall.

use crate::error::SimResult;
use crate::instruction::{AluOp, MemOp};
use crate::pipeline::hazard;
use crate::pipeline::ForwardSource;
use crate::state::ProcessorState;

/// Advances the execute stage one cycle.
pub fn process(state: &mut ProcessorState) -> SimResult<()> {
    let inst = state.execute.inst;

    let a = resolve_operand(state, state.execute.forward_a, state.execute.a);
    let write_data = resolve_operand(state, state.execute.forward_b, state.execute.b);

    state.execute.forward_a = ForwardSource::None;
    state.execute.forward_b = ForwardSource::None;

    let b_effective = if inst.has_immediate() {
        inst.imm
    } else {
        write_data
    };

    let alu_out = match inst.alu_op() {
        AluOp::Plus => a + b_effective,
        AluOp::Minus => a - b_effective,
        AluOp::Undefined => 0,
    };

    // We don't forward to avoid control hazards in the execute stage: a
    // branch currently in ID reading a register EX is about to produce
    // must instead stall one cycle and pick up the forwarded value next
    // cycle.
    if state.decode.inst.is_branch() {
        let decode_reader = state.decode.inst;
        hazard::stall_on_hazard(state, decode_reader, inst);
    }

    state.memory.alu_out = alu_out;
    state.memory.write_data = write_data;
    state.memory.inst = inst;

    Ok(())
}

/// Applies a forwarding directive to a single operand port.
///
/// `MEMORY` means "the value MEM just produced" — except when MEM holds a
/// load, in which case the computed address in `memory.alu_out` is not
/// the operand at all; the loaded word, which MEM has just placed in
/// `writeback.read_data`, is.
fn resolve_operand(state: &ProcessorState, source: ForwardSource, fallback: i64) -> i64 {
    match source {
        ForwardSource::None => fallback,
        ForwardSource::Memory => {
            if state.memory.inst.memory_op() == MemOp::Read {
                state.writeback.read_data
            } else {
                state.memory.alu_out
            }
        }
        ForwardSource::Writeback => state.writeback.result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, Opcode};

    fn add(rd: u8, rs: u8, rt: u8) -> Instruction {
        Instruction {
            op: Opcode::Add,
            rd: Some(rd),
            rs: Some(rs),
            rt: Some(rt),
            imm: 0,
        }
    }

    #[test]
    fn plain_addition_with_no_forwarding() {
        let mut state = ProcessorState::new(vec![], vec![], 16);
        state.execute.inst = add(3, 1, 2);
        state.execute.a = 4;
        state.execute.b = 5;
        process(&mut state).unwrap();
        assert_eq!(state.memory.alu_out, 9);
    }

    #[test]
    fn memory_forward_uses_alu_out_for_non_load() {
        let mut state = ProcessorState::new(vec![], vec![], 16);
        state.execute.inst = add(3, 1, 2);
        state.execute.a = 0;
        state.execute.b = 0;
        state.execute.forward_a = ForwardSource::Memory;
        state.memory.inst = add(1, 0, 0); // not a load
        state.memory.alu_out = 42;
        process(&mut state).unwrap();
        assert_eq!(state.memory.alu_out, 42);
        assert_eq!(state.execute.forward_a, ForwardSource::None);
    }

    #[test]
    fn memory_forward_uses_loaded_word_for_load() {
        let mut state = ProcessorState::new(vec![], vec![], 16);
        state.execute.inst = add(3, 1, 2);
        state.execute.a = 0;
        state.execute.b = 0;
        state.execute.forward_a = ForwardSource::Memory;
        state.memory.inst = Instruction {
            op: Opcode::Lw,
            rt: Some(2),
            rs: Some(0),
            rd: None,
            imm: 0,
        };
        state.memory.alu_out = 1234; // this is the *address*, must not be used
        state.writeback.read_data = 77;
        process(&mut state).unwrap();
        assert_eq!(state.memory.alu_out, 77);
    }

    #[test]
    fn writeback_forward_uses_result() {
        let mut state = ProcessorState::new(vec![], vec![], 16);
        state.execute.inst = add(3, 1, 2);
        state.execute.a = 0;
        state.execute.b = 0;
        state.execute.forward_b = ForwardSource::Writeback;
        state.writeback.result = 9;
        process(&mut state).unwrap();
        assert_eq!(state.memory.alu_out, 9);
    }

    #[test]
    fn branch_in_id_hazarding_execute_requests_stall() {
        let mut state = ProcessorState::new(vec![], vec![], 16);
        state.decode.inst = Instruction {
            op: Opcode::Beqz,
            rs: Some(1),
            rt: None,
            rd: None,
            imm: 2,
        };
        state.execute.inst = Instruction {
            op: Opcode::Addi,
            rt: Some(1),
            rs: Some(0),
            rd: None,
            imm: 5,
        };
        process(&mut state).unwrap();
        assert!(state.decode.stall);
    }
}
