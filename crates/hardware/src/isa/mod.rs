//! Instruction set of the simulated 16-bit processor.
//!
//! This module defines the nine-instruction ISA and its text form:
//! 1. **Instruction model:** One tagged variant per instruction kind, plus
//!    the program container mapping word addresses to instructions.
//! 2. **Assembler:** Two-pass translation of the assembly text format into a
//!    program image.
//! 3. **Disassembler:** Instruction to mnemonic string, for the timeline
//!    table, trace output, and test diagnostics.

/// Two-pass assembler for the textual assembly format.
pub mod asm;

/// Instruction disassembler.
pub mod disasm;

/// Instruction and program model.
pub mod instruction;

pub use asm::assemble;
pub use disasm::disassemble;
pub use instruction::{Instruction, Op, Program, Reg};
