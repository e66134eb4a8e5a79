//! Fatal simulation errors and the assembler's own failure type.
//!
//! The original C simulator calls `exit()` directly from inside a
//! pipeline stage the moment it detects an illegal register write,
//! memory access, or jump target. Here each stage instead returns
//! `Result<(), SimError>`; only the binary's `main` turns a fatal error
//! into a process exit code.

use thiserror::Error;

/// A fatal condition that halts the simulator immediately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// WB attempted to commit a value to R0.
    #[error("Exception: Attempt to overwrite R0")]
    IllegalRegisterWrite { attempted: u8 },

    /// MEM's effective address fell outside `[0, MAX_WORDS_OF_DATA)`.
    #[error("Exception: out-of-bounds data memory access at {address}")]
    IllegalMemoryAccess { address: i64 },

    /// IF's `pc_branch` fell outside `[0, instructions_count)`.
    #[error("out-of-bounds should_jump to {target}")]
    IllegalJump { target: i64 },

    /// An assembler-level failure (parse error, label resolution, I/O).
    /// Not one of the core's own fatal conditions; carried here so the
    /// CLI driver has a single error type to match on.
    #[error("assembly failed: {0}")]
    Assembly(String),
}

impl SimError {
    /// The process exit code this condition maps to. Assembly failures
    /// aren't one of the core's fatal conditions; the driver treats them
    /// as ordinary usage errors (exit code 0).
    pub fn exit_code(&self) -> i32 {
        match self {
            SimError::IllegalRegisterWrite { .. } => -1,
            SimError::IllegalMemoryAccess { .. } => -2,
            SimError::IllegalJump { .. } => -3,
            SimError::Assembly(_) => 0,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
