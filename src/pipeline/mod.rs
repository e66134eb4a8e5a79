//! The five pipeline buffers and the stage implementations that advance
//! them one cycle at a time.
//!
//! Each buffer holds the inputs a stage reads this cycle and the outputs
//! it publishes for the following cycle, the way `examples/YmClash-PunkVM`'s
//! `FetchDecodeRegister` / `DecodeExecuteRegister` / ... structs hold one
//! edge of its pipeline each. Unlike that teacher, buffers here are plain
//! (non-`Option`) structs initialized to NOP/zero, matching the original
//! DLX simulator's `cpu_state` layout, where every buffer always holds
//! *something* — a NOP bubble if nothing useful is in flight.

pub mod decode;
pub mod execute;
pub mod fetch;
pub mod hazard;
pub mod memory;
pub mod writeback;

use crate::instruction::Instruction;

/// Where EX should pull a forwarded operand from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardSource {
    #[default]
    None,
    Memory,
    Writeback,
}

/// IF's persistent state: the program counter, the branch target ID
/// computed last cycle, and the stall/flush control lines ID and WB
/// (via IF's own drain logic) assert.
#[derive(Debug, Clone, Default)]
pub struct FetchBuffer {
    pub pc: i64,
    pub pc_branch: i64,
    pub stall: bool,
    pub flush: bool,
}

/// ID's persistent state.
#[derive(Debug, Clone)]
pub struct DecodeBuffer {
    pub pc_next: i64,
    pub inst: Instruction,
    pub stall: bool,
    pub should_jump: bool,
    pub forward: bool,
    pub data: i64,
}

impl Default for DecodeBuffer {
    fn default() -> Self {
        DecodeBuffer {
            pc_next: 0,
            inst: Instruction::NOP,
            stall: false,
            should_jump: false,
            forward: false,
            data: 0,
        }
    }
}

/// EX's persistent state.
#[derive(Debug, Clone)]
pub struct ExecuteBuffer {
    pub a: i64,
    pub b: i64,
    pub alu_out: i64,
    pub inst: Instruction,
    pub forward_a: ForwardSource,
    pub forward_b: ForwardSource,
}

impl Default for ExecuteBuffer {
    fn default() -> Self {
        ExecuteBuffer {
            a: 0,
            b: 0,
            alu_out: 0,
            inst: Instruction::NOP,
            forward_a: ForwardSource::None,
            forward_b: ForwardSource::None,
        }
    }
}

/// MEM's persistent state.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    pub alu_out: i64,
    pub write_data: i64,
    pub inst: Instruction,
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        MemoryBuffer {
            alu_out: 0,
            write_data: 0,
            inst: Instruction::NOP,
        }
    }
}

/// WB's persistent state.
#[derive(Debug, Clone)]
pub struct WritebackBuffer {
    pub read_data: i64,
    pub alu_out: i64,
    pub result: i64,
    pub inst: Instruction,
}

impl Default for WritebackBuffer {
    fn default() -> Self {
        WritebackBuffer {
            read_data: 0,
            alu_out: 0,
            result: 0,
            inst: Instruction::NOP,
        }
    }
}
