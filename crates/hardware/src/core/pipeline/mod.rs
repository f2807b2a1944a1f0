//! Tomasulo pipeline implementation.
//!
//! This module contains the speculative out-of-order machinery:
//! 1. **ROB:** Circular reorder buffer for in-order retirement.
//! 2. **RAT:** Register alias table mapping registers to pending producers.
//! 3. **Stations:** Per-unit reservation stations buffering operands/tags.
//! 4. **Units:** Functional unit lane and latency bookkeeping.
//! 5. **CDB:** Common data bus arbitration (one broadcast per cycle).
//! 6. **Stages:** Commit, Write-Result, Execute, and Issue stage actions.
//! 7. **Engine:** The per-cycle orchestrator owning all of the above.

/// Common data bus arbitration.
pub mod cdb;
/// Pipeline engine and cycle loop.
pub mod engine;
/// Register alias table.
pub mod rat;
/// Reorder buffer.
pub mod rob;
/// Reservation stations.
pub mod station;
/// Stage actions (Commit, Write-Result, Execute, Issue).
pub mod stages;
/// Per-instruction timeline recorder.
pub mod timeline;
/// Functional units.
pub mod unit;
