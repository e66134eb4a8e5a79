//! RAW-hazard stall and forwarding-request helpers shared by EX, MEM and
//! WB.
//!
//! The original C encodes `forward_on_hazard`'s destination as a pointer
//! into the execute buffer and advances it with `*(stage + 1)` to reach
//! the B port, a layout-dependent trick. Here the two ports are simply
//! two `&mut` parameters.

use crate::instruction::Instruction;
use crate::pipeline::ForwardSource;
use crate::state::ProcessorState;

/// If `reader` has a RAW hazard against `writer`, requests a decode-stage
/// stall (which in turn asserts fetch's stall next cycle).
pub fn stall_on_hazard(state: &mut ProcessorState, reader: Instruction, writer: Instruction) {
    if reader.reg_read_after_write(&writer).is_some() {
        state.decode.stall = true;
    }
}

/// If EX's instruction has a RAW hazard against `writer`, sets the
/// matching forwarding port(s) to `source`. Also forwards to ID's branch
/// comparator if ID holds a branch reading a register `writer` produces,
/// mirroring the original C's `processor_forward_on_hazard`, which
/// performs both jobs in one call.
///
/// `reader` is EX's current instruction (the one that will consume the
/// forwarded value), `writer` is the instruction that just computed or
/// loaded `data`.
pub fn forward_on_hazard(
    state: &mut ProcessorState,
    reader: Instruction,
    writer: Instruction,
    source: ForwardSource,
    data: i64,
) {
    if let Some(hazard_register) = reader.reg_read_after_write(&writer) {
        if reader.rs == Some(hazard_register) {
            state.execute.forward_a = source;
        }
        if reader.rt == Some(hazard_register) {
            state.execute.forward_b = source;
        }
    }

    if state.decode.inst.is_branch()
        && writer.output_register().is_some()
        && state.decode.inst.reg_read_after_write(&writer).is_some()
    {
        state.decode.forward = true;
        state.decode.data = data;
    }
}
