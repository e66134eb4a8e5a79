//! Fixed limits the simulator enforces.

/// Register file size; register 0 is hard-wired to zero.
pub const NUM_REGISTERS: usize = 16;

/// Index of the hard-wired zero register.
pub const R0: u8 = 0;

/// Fail-safe cycle cap: aborts simulation of a runaway program.
pub const MAX_CYCLES: u64 = 500_000;

/// Default data-memory capacity. A C compile-time constant in the
/// original (`globals.h`, not present in the retrieved source); here a
/// default for [`crate::driver::SimulatorConfig`], not a hard limit.
pub const MAX_WORDS_OF_DATA: usize = 1024;

/// Default instruction-memory capacity the assembler enforces unless the
/// caller raises it. Same provenance as [`MAX_WORDS_OF_DATA`].
pub const MAX_LINES_OF_CODE: usize = 1024;

/// Number of drain cycles after the tail of the program is fetched,
/// before the last real instruction is guaranteed to have reached
/// writeback. Four drain fetches: ID, EX, MEM, WB.
pub const DRAIN_CYCLES: i64 = 3;
