//! MEM: performs the data-memory access and requests load-use stalls and
//! EX/ID forwarding.

use crate::error::{SimError, SimResult};
use crate::instruction::MemOp;
use crate::pipeline::hazard;
use crate::pipeline::ForwardSource;
use crate::state::ProcessorState;

/// Advances the memory stage one cycle.
pub fn process(state: &mut ProcessorState) -> SimResult<()> {
    let alu_out = state.memory.alu_out;
    let inst = state.memory.inst;
    let op = inst.memory_op();

    if op != MemOp::None
        && (alu_out < 0 || alu_out as usize >= state.data_memory.len())
    {
        return Err(SimError::IllegalMemoryAccess { address: alu_out });
    }

    let data = match op {
        MemOp::Read => {
            let loaded = state.data_memory[alu_out as usize];
            state.writeback.read_data = loaded;

            // The loaded value isn't available to EX or ID yet (the
            // classic load-use hazard): stall if either currently holds
            // an instruction that reads the register this load writes.
            let decode_reader = state.decode.inst;
            let execute_reader = state.execute.inst;
            hazard::stall_on_hazard(state, decode_reader, inst);
            hazard::stall_on_hazard(state, execute_reader, inst);
            if state.decode.stall {
                tracing::trace!(target: "dlxsim::pipeline", "MEM: load-use hazard, requesting stall");
            }
            loaded
        }
        MemOp::Write => {
            state.data_memory[alu_out as usize] = state.memory.write_data;
            alu_out
        }
        MemOp::None => alu_out,
    };

    let execute_reader = state.execute.inst;
    hazard::forward_on_hazard(state, execute_reader, inst, ForwardSource::Memory, data);

    state.writeback.inst = inst;
    state.writeback.alu_out = alu_out;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{Instruction, Opcode};

    fn lw(rt: u8, rs: u8, imm: i64) -> Instruction {
        Instruction {
            op: Opcode::Lw,
            rt: Some(rt),
            rs: Some(rs),
            rd: None,
            imm,
        }
    }

    fn sw(rt: u8, rs: u8, imm: i64) -> Instruction {
        Instruction {
            op: Opcode::Sw,
            rt: Some(rt),
            rs: Some(rs),
            rd: None,
            imm,
        }
    }

    #[test]
    fn read_publishes_data_and_stalls_dependents() {
        let mut state = ProcessorState::new(vec![], vec![0; 16], 16);
        state.data_memory[4] = 77;
        state.memory.inst = lw(2, 0, 4);
        state.memory.alu_out = 4;
        state.decode.inst = Instruction {
            op: Opcode::Add,
            rd: Some(3),
            rs: Some(2),
            rt: Some(2),
            imm: 0,
        };
        process(&mut state).unwrap();
        assert_eq!(state.writeback.read_data, 77);
        assert!(state.decode.stall);
    }

    #[test]
    fn write_stores_to_memory() {
        let mut state = ProcessorState::new(vec![], vec![0; 16], 16);
        state.memory.inst = sw(1, 0, 4);
        state.memory.alu_out = 4;
        state.memory.write_data = 55;
        process(&mut state).unwrap();
        assert_eq!(state.data_memory[4], 55);
    }

    #[test]
    fn out_of_bounds_access_is_fatal() {
        let mut state = ProcessorState::new(vec![], vec![0; 16], 16);
        state.memory.inst = lw(2, 0, 0);
        state.memory.alu_out = 99;
        let err = process(&mut state).unwrap_err();
        assert_eq!(err, SimError::IllegalMemoryAccess { address: 99 });
    }

    #[test]
    fn negative_address_is_fatal() {
        let mut state = ProcessorState::new(vec![], vec![0; 16], 16);
        state.memory.inst = lw(2, 0, 0);
        state.memory.alu_out = -1;
        let err = process(&mut state).unwrap_err();
        assert_eq!(err, SimError::IllegalMemoryAccess { address: -1 });
    }

    #[test]
    fn forwards_alu_result_to_execute() {
        let mut state = ProcessorState::new(vec![], vec![0; 16], 16);
        state.memory.inst = Instruction {
            op: Opcode::Add,
            rd: Some(1),
            rs: Some(2),
            rt: Some(3),
            imm: 0,
        };
        state.memory.alu_out = 10;
        state.execute.inst = Instruction {
            op: Opcode::Add,
            rd: Some(4),
            rs: Some(1),
            rt: Some(5),
            imm: 0,
        };
        process(&mut state).unwrap();
        assert_eq!(state.execute.forward_a, ForwardSource::Memory);
        assert_eq!(state.execute.forward_b, ForwardSource::None);
    }
}
