//! Register/memory dump formatting for the CLI driver's `-D` and plain
//! modes. Column layout follows the original simulator's `debug.h`:
//! `print_registers`, `print_memory`, and `print_registers_original`.
//!
//! This module is an external collaborator, not core: the core never
//! calls it, and it never reads anything but the values the caller
//! hands it.

use crate::constants::NUM_REGISTERS;

/// `-D` mode's "Registers:" block: two rows of eight, `R0..R7` then
/// `R8..R15`.
pub fn format_registers(register_file: &[i64; NUM_REGISTERS]) -> String {
    let mut out = String::new();
    for (row_index, row) in register_file.chunks(8).enumerate() {
        for (i, value) in row.iter().enumerate() {
            out.push_str(&format!("R{:<2}: {:<10} ", row_index * 8 + i, value));
        }
        out.push('\n');
    }
    out
}

/// `-D` mode's "Memory:" block: one row per 20 words, prefixed with the
/// row's starting address.
pub fn format_memory(data_memory: &[i64]) -> String {
    let mut out = String::new();
    for (row_start, row) in data_memory.chunks(20).enumerate() {
        out.push_str(&format!("{:>4} ", row_start * 20));
        for value in row {
            out.push_str(&format!("{:<4} ", value));
        }
        out.push('\n');
    }
    out
}

/// The non-`-D` "Final register file values:" dump: four registers per
/// line, two `"Rn: value"` pairs wide each.
pub fn format_registers_final(register_file: &[i64; NUM_REGISTERS]) -> String {
    let mut out = String::new();
    for (row_index, row) in register_file.chunks(4).enumerate() {
        let [r0, r1, r2, r3] = [row[0], row[1], row[2], row[3]];
        let base = row_index * 4;
        out.push_str(&format!(
            "  R{:<2}: {:<10}  R{:<2}: {:<10}  R{:<2}: {:<10}  R{:<2}: {:<10}\n",
            base,
            r0,
            base + 1,
            r1,
            base + 2,
            r2,
            base + 3,
            r3
        ));
    }
    out
}

/// `IPC`/`CPI` as formatted by the non-`-D` dump: three decimal places,
/// `CPI` being `IPC`'s reciprocal.
pub fn format_rates(instructions_executed: u64, cycles_executed: u64) -> (String, String) {
    let ipc = instructions_executed as f64 / cycles_executed as f64;
    let cpi = cycles_executed as f64 / instructions_executed as f64;
    (format!("{:.3}", ipc), format!("{:.3}", cpi))
}
