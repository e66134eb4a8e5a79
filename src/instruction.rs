//! The decoded instruction record and its derived properties.
//!
//! Everything here is a pure function of an [`Instruction`]'s fields — no
//! pipeline state is consulted. This mirrors `instruction.h` in the
//! original DLX simulator: output register, ALU op, memory op, branch-ness,
//! and read-after-write detection are all table lookups keyed on [`Opcode`].

use std::fmt;

/// A register index in `[0, 15]`, or the "unused" sentinel.
///
/// Represented as `Option<u8>` rather than a raw integer with a magic
/// "not used" value, so the compiler enforces the distinction the
/// original C's `NOT_USED` constant only documented.
pub type Register = Option<u8>;

/// The closed set of opcodes the core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop,
    Add,
    Sub,
    Addi,
    Subi,
    Lw,
    Sw,
    Beqz,
    Bnez,
    J,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Opcode::Nop => "NOP",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Addi => "ADDI",
            Opcode::Subi => "SUBI",
            Opcode::Lw => "LW",
            Opcode::Sw => "SW",
            Opcode::Beqz => "BEQZ",
            Opcode::Bnez => "BNEZ",
            Opcode::J => "J",
        };
        f.write_str(s)
    }
}

/// The ALU operation an instruction encodes, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Undefined,
    Plus,
    Minus,
}

/// The data-memory operation an instruction encodes, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemOp {
    None,
    Read,
    Write,
}

/// A decoded instruction record: opcode, three register fields (any of
/// which may be "unused"), and a signed immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub rs: Register,
    pub rt: Register,
    pub rd: Register,
    pub imm: i64,
}

impl Instruction {
    /// The canonical NOP: opcode NOP, every register unused, immediate 0.
    pub const NOP: Instruction = Instruction {
        op: Opcode::Nop,
        rs: None,
        rt: None,
        rd: None,
        imm: 0,
    };

    /// The register this instruction writes, or `None` if it writes none.
    pub fn output_register(&self) -> Register {
        match self.op {
            Opcode::Addi | Opcode::Subi | Opcode::Lw => self.rt,
            Opcode::Add | Opcode::Sub => self.rd,
            _ => None,
        }
    }

    /// Whether this instruction's second ALU operand is its immediate
    /// field rather than a register value.
    pub fn has_immediate(&self) -> bool {
        matches!(
            self.op,
            Opcode::Addi | Opcode::Subi | Opcode::Lw | Opcode::Sw
        )
    }

    /// The data-memory operation this instruction performs, if any.
    pub fn memory_op(&self) -> MemOp {
        match self.op {
            Opcode::Lw => MemOp::Read,
            Opcode::Sw => MemOp::Write,
            _ => MemOp::None,
        }
    }

    /// Whether this instruction is a conditional branch (`BEQZ`/`BNEZ`).
    ///
    /// `J` is an unconditional jump and is deliberately excluded: it
    /// never reads a register operand, so it cannot suffer the
    /// branch-use hazard that this predicate guards against in EX
    /// and ID.
    pub fn is_branch(&self) -> bool {
        matches!(self.op, Opcode::Beqz | Opcode::Bnez)
    }

    /// The ALU operation this instruction encodes.
    pub fn alu_op(&self) -> AluOp {
        match self.op {
            Opcode::Addi | Opcode::Add | Opcode::Lw | Opcode::Sw => AluOp::Plus,
            Opcode::Subi | Opcode::Sub => AluOp::Minus,
            _ => AluOp::Undefined,
        }
    }

    /// The set of registers this instruction reads as source operands
    /// (as opposed to `rd`, which is write-only for ADD/SUB).
    fn consumed_registers(&self) -> (Register, Register) {
        match self.op {
            Opcode::Add | Opcode::Sub | Opcode::Lw | Opcode::Sw => (self.rs, self.rt),
            Opcode::Addi | Opcode::Subi | Opcode::Beqz | Opcode::Bnez => (self.rs, None),
            _ => (None, None),
        }
    }

    /// Given `self` as the *reader* and `writer` as an earlier,
    /// still-in-flight instruction, returns the register suffering a
    /// read-after-write hazard, if any. `rs` takes precedence over `rt`
    /// when both would match.
    pub fn reg_read_after_write(&self, writer: &Instruction) -> Register {
        let write_register = writer.output_register()?;
        let (consumed_rs, consumed_rt) = self.consumed_registers();

        if consumed_rs == Some(write_register) {
            Some(write_register)
        } else if consumed_rt == Some(write_register) {
            Some(write_register)
        } else {
            None
        }
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Instruction::NOP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg_reg(op: Opcode, rd: u8, rs: u8, rt: u8) -> Instruction {
        Instruction {
            op,
            rd: Some(rd),
            rs: Some(rs),
            rt: Some(rt),
            imm: 0,
        }
    }

    fn reg_imm(op: Opcode, rt: u8, rs: u8, imm: i64) -> Instruction {
        Instruction {
            op,
            rt: Some(rt),
            rs: Some(rs),
            rd: None,
            imm,
        }
    }

    #[test]
    fn output_register_table() {
        assert_eq!(reg_reg(Opcode::Add, 3, 1, 2).output_register(), Some(3));
        assert_eq!(reg_reg(Opcode::Sub, 3, 1, 2).output_register(), Some(3));
        assert_eq!(reg_imm(Opcode::Addi, 1, 0, 5).output_register(), Some(1));
        assert_eq!(reg_imm(Opcode::Lw, 2, 0, 0).output_register(), Some(2));
        assert_eq!(
            reg_imm(Opcode::Sw, 2, 0, 0).output_register(),
            None,
            "SW writes no register"
        );
        assert_eq!(Instruction::NOP.output_register(), None);
    }

    #[test]
    fn has_immediate_table() {
        assert!(!reg_reg(Opcode::Add, 1, 2, 3).has_immediate());
        assert!(reg_imm(Opcode::Addi, 1, 0, 1).has_immediate());
        assert!(reg_imm(Opcode::Lw, 1, 0, 0).has_immediate());
        assert!(reg_imm(Opcode::Sw, 1, 0, 0).has_immediate());
        assert!(!Instruction::NOP.has_immediate());
    }

    #[test]
    fn is_branch_excludes_jump() {
        let beqz = Instruction {
            op: Opcode::Beqz,
            rs: Some(1),
            rt: None,
            rd: None,
            imm: 2,
        };
        let j = Instruction {
            op: Opcode::J,
            rs: None,
            rt: None,
            rd: None,
            imm: -4,
        };
        assert!(beqz.is_branch());
        assert!(!j.is_branch());
    }

    #[test]
    fn raw_hazard_prefers_rs_over_rt() {
        let writer = reg_imm(Opcode::Addi, 1, 0, 5); // writes R1
        let reader = reg_reg(Opcode::Add, 3, 1, 1); // reads R1 as both rs and rt
        assert_eq!(reader.reg_read_after_write(&writer), Some(1));
    }

    #[test]
    fn raw_hazard_none_when_disjoint() {
        let writer = reg_imm(Opcode::Addi, 1, 0, 5);
        let reader = reg_reg(Opcode::Add, 4, 2, 3);
        assert_eq!(reader.reg_read_after_write(&writer), None);
    }

    #[test]
    fn sw_does_not_hazard_as_a_writer() {
        let writer = reg_imm(Opcode::Sw, 1, 0, 0);
        let reader = reg_reg(Opcode::Add, 4, 1, 2);
        assert_eq!(
            reader.reg_read_after_write(&writer),
            None,
            "SW has no output register, so it cannot be a RAW hazard source"
        );
    }

    #[test]
    fn branch_consumes_only_rs() {
        let writer = reg_imm(Opcode::Addi, 2, 0, 5); // writes R2
        let reader = Instruction {
            op: Opcode::Beqz,
            rs: Some(1),
            rt: Some(2),
            rd: None,
            imm: 2,
        };
        assert_eq!(
            reader.reg_read_after_write(&writer),
            None,
            "BEQZ only consumes rs, not rt"
        );
    }
}
