//! Instruction disassembler.
//!
//! Converts a decoded instruction into a human-readable mnemonic string for
//! the timeline table, trace output, and test diagnostics.

use crate::isa::instruction::Op;

/// Disassembles an instruction into its textual form.
///
/// Branch offsets render as signed offsets, CALL targets as absolute word
/// addresses: `"beq r1, r0, -3"`, `"call 10"`, `"load r2, 4(r1)"`.
pub fn disassemble(op: &Op) -> String {
    match *op {
        Op::Load { rd, offset, base } => format!("load r{}, {}(r{})", rd, offset, base),
        Op::Store { src, offset, base } => format!("store r{}, {}(r{})", src, offset, base),
        Op::Beq { rs1, rs2, offset } => format!("beq r{}, r{}, {}", rs1, rs2, offset),
        Op::Call { target } => format!("call {}", target),
        Op::Ret => "ret".to_string(),
        Op::Add { rd, rs1, rs2 } => format!("add r{}, r{}, r{}", rd, rs1, rs2),
        Op::Addi { rd, rs1, imm } => format!("addi r{}, r{}, {}", rd, rs1, imm),
        Op::Nand { rd, rs1, rs2 } => format!("nand r{}, r{}, r{}", rd, rs1, rs2),
        Op::Mul { rd, rs1, rs2 } => format!("mul r{}, r{}, r{}", rd, rs1, rs2),
    }
}
