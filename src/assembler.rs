//! Turns DLX assembly text into the [`Instruction`] stream and initial
//! data-memory image the core consumes.
//!
//! An external collaborator: the core never calls into this module and
//! only ever sees its output, a finished instruction stream and count.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{SimError, SimResult};
use crate::instruction::{Instruction, Opcode};

/// The result of assembling a program: the instruction stream plus the
/// initial contents of data memory, seeded from an optional `.data`
/// section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledProgram {
    pub instructions: Vec<Instruction>,
    pub data: Vec<i64>,
}

/// Reads `path` and assembles it. Fails with [`SimError::Assembly`] on
/// I/O failure or any parse error.
pub fn assemble_file<P: AsRef<Path>>(path: P, max_lines: usize) -> SimResult<AssembledProgram> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| SimError::Assembly(format!("could not read {}: {e}", path.display())))?;
    assemble(&text, max_lines)
}

/// Assembles program source text directly.
///
/// One instruction per line; whitespace/comma-separated mnemonic and
/// operands; `#` starts a line comment; blank lines are ignored. A
/// `label:` prefix on a line (alone or preceding an instruction) names
/// that instruction's index for later branch/jump operands. An optional
/// `.data` section of whitespace-separated decimal words seeds
/// `data_memory` starting at address 0.
pub fn assemble(text: &str, max_lines: usize) -> SimResult<AssembledProgram> {
    let mut code_lines: Vec<&str> = Vec::new();
    let mut data_tokens: Vec<&str> = Vec::new();
    let mut in_data = false;

    for raw_line in text.lines() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(".data") {
            in_data = true;
            continue;
        }
        if in_data {
            data_tokens.extend(line.split_whitespace());
        } else {
            code_lines.push(line);
        }
    }

    let (labels, stripped) = collect_labels(&code_lines)?;

    if stripped.len() > max_lines {
        return Err(SimError::Assembly(format!(
            "program has {} instructions, exceeds capacity of {max_lines}",
            stripped.len()
        )));
    }

    let mut instructions = Vec::with_capacity(stripped.len());
    for (index, line) in stripped.iter().enumerate() {
        instructions.push(parse_instruction(line, index as i64, &labels)?);
    }

    let mut data = Vec::with_capacity(data_tokens.len());
    for token in data_tokens {
        let value: i64 = token
            .parse()
            .map_err(|_| SimError::Assembly(format!("invalid .data word: {token}")))?;
        data.push(value);
    }

    Ok(AssembledProgram { instructions, data })
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Strips `label:` prefixes from each code line, recording the
/// instruction index each label resolves to. A line that is only a
/// label (no instruction after the colon) contributes no instruction.
fn collect_labels<'a>(code_lines: &[&'a str]) -> SimResult<(HashMap<String, i64>, Vec<&'a str>)> {
    let mut labels = HashMap::new();
    let mut stripped = Vec::with_capacity(code_lines.len());

    for &original in code_lines {
        let mut line = original;
        while let Some(colon) = line.find(':') {
            let candidate = line[..colon].trim();
            if candidate.is_empty() || candidate.contains(char::is_whitespace) {
                break;
            }
            if labels.contains_key(candidate) {
                return Err(SimError::Assembly(format!("duplicate label: {candidate}")));
            }
            labels.insert(candidate.to_string(), stripped.len() as i64);
            line = line[colon + 1..].trim();
        }
        if !line.is_empty() {
            stripped.push(line);
        }
    }

    Ok((labels, stripped))
}

/// Parses one already-delabeled instruction line. `index` is this
/// instruction's position, needed to resolve a label operand into the
/// signed offset decode expects, relative to `pc_next = index + 1`.
fn parse_instruction(line: &str, index: i64, labels: &HashMap<String, i64>) -> SimResult<Instruction> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let mnemonic = parts.next().unwrap_or_default().to_ascii_uppercase();
    let rest = parts.next().unwrap_or_default();
    let operands = split_operands(rest);
    let pc_next = index + 1;

    match mnemonic.as_str() {
        "NOP" => Ok(Instruction::NOP),
        "ADD" | "SUB" => {
            let [rd, rs, rt] = operand_count::<3>(&operands, &mnemonic)?;
            Ok(Instruction {
                op: if mnemonic == "ADD" { Opcode::Add } else { Opcode::Sub },
                rd: Some(parse_register(rd)?),
                rs: Some(parse_register(rs)?),
                rt: Some(parse_register(rt)?),
                imm: 0,
            })
        }
        "ADDI" | "SUBI" => {
            let [rt, rs, imm] = operand_count::<3>(&operands, &mnemonic)?;
            Ok(Instruction {
                op: if mnemonic == "ADDI" { Opcode::Addi } else { Opcode::Subi },
                rt: Some(parse_register(rt)?),
                rs: Some(parse_register(rs)?),
                rd: None,
                imm: parse_immediate(imm)?,
            })
        }
        "LW" | "SW" => {
            let [rt, mem] = operand_count::<2>(&operands, &mnemonic)?;
            let (imm, rs) = parse_memory_operand(mem)?;
            Ok(Instruction {
                op: if mnemonic == "LW" { Opcode::Lw } else { Opcode::Sw },
                rt: Some(parse_register(rt)?),
                rs: Some(rs),
                rd: None,
                imm,
            })
        }
        "BEQZ" | "BNEZ" => {
            let [rs, target] = operand_count::<2>(&operands, &mnemonic)?;
            Ok(Instruction {
                op: if mnemonic == "BEQZ" { Opcode::Beqz } else { Opcode::Bnez },
                rs: Some(parse_register(rs)?),
                rt: None,
                rd: None,
                imm: parse_target(target, pc_next, labels)?,
            })
        }
        "J" => {
            let [target] = operand_count::<1>(&operands, &mnemonic)?;
            Ok(Instruction {
                op: Opcode::J,
                rs: None,
                rt: None,
                rd: None,
                imm: parse_target(target, pc_next, labels)?,
            })
        }
        other => Err(SimError::Assembly(format!("unknown mnemonic: {other}"))),
    }
}

fn split_operands(rest: &str) -> Vec<&str> {
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn operand_count<const N: usize>(operands: &[&str], mnemonic: &str) -> SimResult<[&str; N]> {
    if operands.len() != N {
        return Err(SimError::Assembly(format!(
            "{mnemonic} expects {N} operand(s), got {}",
            operands.len()
        )));
    }
    let mut out = [""; N];
    out.copy_from_slice(operands);
    Ok(out)
}

fn parse_register(token: &str) -> SimResult<u8> {
    let token = token.trim();
    let digits = token
        .strip_prefix('R')
        .or_else(|| token.strip_prefix('r'))
        .ok_or_else(|| SimError::Assembly(format!("not a register: {token}")))?;
    let index: u8 = digits
        .parse()
        .map_err(|_| SimError::Assembly(format!("not a register: {token}")))?;
    if index > 15 {
        return Err(SimError::Assembly(format!("register out of range: {token}")));
    }
    Ok(index)
}

fn parse_immediate(token: &str) -> SimResult<i64> {
    let token = token.trim();
    let unsigned = token.strip_prefix('+').unwrap_or(token);
    unsigned
        .parse()
        .map_err(|_| SimError::Assembly(format!("not an immediate: {token}")))
}

/// A branch/jump operand is either a signed offset immediate, or a
/// `label` resolved to the equivalent offset relative to `pc_next`.
fn parse_target(token: &str, pc_next: i64, labels: &HashMap<String, i64>) -> SimResult<i64> {
    let token = token.trim();
    if let Ok(imm) = parse_immediate(token) {
        return Ok(imm);
    }
    let target_index = labels
        .get(token)
        .ok_or_else(|| SimError::Assembly(format!("undefined label: {token}")))?;
    Ok(target_index - pc_next)
}

/// Parses LW/SW's `offset(register)` memory operand.
fn parse_memory_operand(token: &str) -> SimResult<(i64, u8)> {
    let token = token.trim();
    let open = token
        .find('(')
        .ok_or_else(|| SimError::Assembly(format!("expected offset(register): {token}")))?;
    let close = token
        .rfind(')')
        .ok_or_else(|| SimError::Assembly(format!("expected offset(register): {token}")))?;
    let imm = parse_immediate(&token[..open])?;
    let reg = parse_register(&token[open + 1..close])?;
    Ok((imm, reg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_a_simple_arithmetic_program() {
        let src = "ADDI R1, R0, 5\nADDI R2, R0, 7\nADD R3, R1, R2\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.instructions.len(), 3);
        assert_eq!(program.instructions[2].op, Opcode::Add);
        assert_eq!(program.instructions[2].rd, Some(3));
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let src = "# a comment\nADDI R1, R0, 5  # inline comment\n\nNOP\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.instructions.len(), 2);
        assert_eq!(program.instructions[1].op, Opcode::Nop);
    }

    #[test]
    fn lw_sw_parse_offset_register_syntax() {
        let src = "SW R1, 0(R0)\nLW R2, 4(R0)\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.instructions[0].op, Opcode::Sw);
        assert_eq!(program.instructions[0].imm, 0);
        assert_eq!(program.instructions[0].rs, Some(0));
        assert_eq!(program.instructions[1].imm, 4);
    }

    #[test]
    fn explicit_signed_offset_for_branches() {
        let src = "ADDI R1, R0, 0\nBEQZ R1, +2\nADDI R2, R0, 99\nADDI R3, R0, 7\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.instructions[1].imm, 2);
    }

    #[test]
    fn labels_resolve_to_the_equivalent_offset() {
        let src = "ADDI R1, R0, 0\nBEQZ R1, skip\nADDI R2, R0, 99\nskip: ADDI R3, R0, 7\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.instructions.len(), 4);
        // BEQZ is instruction index 1, pc_next = 2; label "skip" is index 3.
        assert_eq!(program.instructions[1].imm, 1);
        assert_eq!(program.instructions[3].op, Opcode::Addi);
    }

    #[test]
    fn data_section_seeds_initial_words() {
        let src = "NOP\n.data\n10 20 30\n";
        let program = assemble(src, 1024).unwrap();
        assert_eq!(program.data, vec![10, 20, 30]);
    }

    #[test]
    fn unknown_mnemonic_is_an_assembly_error() {
        let err = assemble("FROB R1, R2, R3\n", 1024).unwrap_err();
        assert!(matches!(err, SimError::Assembly(_)));
    }

    #[test]
    fn program_over_capacity_is_rejected() {
        let src = "NOP\nNOP\nNOP\n";
        let err = assemble(src, 2).unwrap_err();
        assert!(matches!(err, SimError::Assembly(_)));
    }
}
