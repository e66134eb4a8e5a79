//! Owns a [`ProcessorState`] and drives it one cycle at a time, stepping
//! the stages in reverse order so that every stage latches its inputs
//! before an earlier stage can overwrite the buffer it just read.

use crate::constants::{MAX_CYCLES, MAX_WORDS_OF_DATA};
use crate::error::SimResult;
use crate::instruction::Instruction;
use crate::pipeline::{decode, execute, fetch, memory, writeback};
use crate::state::ProcessorState;

/// Capacities and the fail-safe cycle cap a [`Simulator`] is built with.
/// Both capacities were C compile-time constants in the original
/// (`globals.h`, absent from the retrieved source); here they're
/// construction-time configuration instead.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorConfig {
    pub data_capacity: usize,
    pub max_cycles: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            data_capacity: MAX_WORDS_OF_DATA,
            max_cycles: MAX_CYCLES,
        }
    }
}

/// Drives a [`ProcessorState`] to completion, one cycle at a time.
pub struct Simulator {
    pub state: ProcessorState,
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(instructions: Vec<Instruction>, data: Vec<i64>, config: SimulatorConfig) -> Self {
        Simulator {
            state: ProcessorState::new(instructions, data, config.data_capacity),
            config,
        }
    }

    /// Runs WB, MEM, EX, ID, IF in that order: each stage
    /// reads the buffer state the previous cycle left behind and writes
    /// the buffer the next cycle will read, emulating synchronous
    /// latches with a single copy of each buffer.
    pub fn run_cycle(&mut self) -> SimResult<()> {
        writeback::process(&mut self.state)?;
        memory::process(&mut self.state)?;
        execute::process(&mut self.state)?;
        decode::process(&mut self.state)?;
        fetch::process(&mut self.state)?;
        self.state.cycles_executed += 1;
        Ok(())
    }

    /// Runs cycles until `halt` is set or the fail-safe cycle cap fires.
    pub fn run(&mut self) -> SimResult<()> {
        while !self.state.halt {
            self.run_cycle()?;
            if self.state.cycles_executed > self.config.max_cycles {
                tracing::warn!(
                    target: "dlxsim::driver",
                    cycles = self.state.cycles_executed,
                    "runaway program? halting"
                );
                break;
            }
        }
        Ok(())
    }
}
