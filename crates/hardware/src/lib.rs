//! 16-bit Tomasulo pipeline simulator library.
//!
//! This crate implements a cycle-accurate simulator for a simplified 16-bit
//! RISC processor that executes instructions out of order using Tomasulo's
//! algorithm with speculation. It provides:
//! 1. **Core:** Reorder buffer, register alias table, reservation stations,
//!    functional units, and the four-stage pipeline engine (Commit,
//!    Write-Result, Execute, Issue).
//! 2. **ISA:** The nine-instruction set (LOAD, STORE, BEQ, CALL, RET, ADD,
//!    ADDI, NAND, MUL), a two-pass assembler, and a disassembler.
//! 3. **Architecture:** 8x16-bit register file and word-addressable memory.
//! 4. **Simulation:** Program/memory-image loaders, per-instruction timeline,
//!    statistics collection, and report formatting.

/// Common types and constants (errors, machine constants).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures).
pub mod config;
/// CPU core (pipeline, architectural state).
pub mod core;
/// Instruction set (instruction model, assembler, disassembler).
pub mod isa;
/// Program and memory-image loaders, report formatting.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The pipeline engine; owns all architectural and speculative state.
pub use crate::core::Engine;
/// Crate-level error type; every fatal condition surfaces as one of these.
pub use crate::common::SimError;
