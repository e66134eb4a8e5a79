//! Owning container for everything the pipeline stages read and mutate.
//!
//! Mirrors the original simulator's single `cpu_state` struct (and the
//! teacher's `PunkVM` struct in `pvm/vm.rs`, which likewise folds memory,
//! registers and pipeline buffers into one owning record) rather than the
//! process-wide globals an earlier revision of the original C used.

use crate::constants::NUM_REGISTERS;
use crate::instruction::Instruction;
use crate::pipeline::{DecodeBuffer, ExecuteBuffer, FetchBuffer, MemoryBuffer, WritebackBuffer};

/// All simulator state with a lifetime spanning one simulation run.
#[derive(Debug, Clone)]
pub struct ProcessorState {
    /// Read-only after load: the assembled program.
    pub instruction_memory: Vec<Instruction>,
    /// Word-addressed data memory, read/write.
    pub data_memory: Vec<i64>,
    /// 16 signed registers; `register_file[0]` is always 0 (invariant 1).
    pub register_file: [i64; NUM_REGISTERS],

    pub fetch: FetchBuffer,
    pub decode: DecodeBuffer,
    pub execute: ExecuteBuffer,
    pub memory: MemoryBuffer,
    pub writeback: WritebackBuffer,

    pub cycles_executed: u64,
    pub instructions_executed: u64,
    pub halt: bool,
}

impl ProcessorState {
    /// Builds a fresh state over an already-assembled program and initial
    /// data image. `data_words` is zero-padded/truncated to exactly
    /// `data_capacity` words, matching the original's fixed-size
    /// `data_memory[MAX_WORDS_OF_DATA]` array.
    pub fn new(
        instruction_memory: Vec<Instruction>,
        mut data_words: Vec<i64>,
        data_capacity: usize,
    ) -> Self {
        data_words.resize(data_capacity, 0);
        ProcessorState {
            instruction_memory,
            data_memory: data_words,
            register_file: [0; NUM_REGISTERS],
            fetch: FetchBuffer::default(),
            decode: DecodeBuffer::default(),
            execute: ExecuteBuffer::default(),
            memory: MemoryBuffer::default(),
            writeback: WritebackBuffer::default(),
            cycles_executed: 0,
            instructions_executed: 0,
            halt: false,
        }
    }

    /// Number of valid instructions loaded (invariant 2's bound).
    pub fn instructions_count(&self) -> i64 {
        self.instruction_memory.len() as i64
    }
}
