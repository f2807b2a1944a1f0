//! Pipeline stage actions.
//!
//! The four stage actions run once per cycle in the strict order
//! Commit, Write-Result, Execute, Issue. The ordering is part of the timing
//! contract: a value broadcast this cycle is visible to this cycle's Issue as
//! a source operand, while execution starts and station reuse are deferred to
//! the next cycle by the wake/retire stamps on the stations.

/// Commit stage: retire the ROB head, squash on misprediction.
pub mod commit;
/// Execute stage: start ready stations, advance countdowns, compute results.
pub mod execute;
/// Issue stage: dispatch the next instruction into a station and ROB slot.
pub mod issue;
/// Write-Result stage: broadcast one finished result on the CDB.
pub mod write_result;
