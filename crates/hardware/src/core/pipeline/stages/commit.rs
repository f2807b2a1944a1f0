//! Commit Stage: retire the ROB head in program order.
//!
//! At most one instruction retires per cycle, and only architectural state
//! changes here: register writes for arithmetic/LOAD/CALL, the memory write
//! for STORE (out-of-range is fatal at this point), and the branch verdict
//! for BEQ. A mispredicted branch returns a `Squashed` outcome; the engine
//! clears all speculative state and no further stage runs that cycle.

use crate::common::SimError;
use crate::core::arch::{Gpr, Memory};
use crate::core::pipeline::rat::RegisterAliasTable;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::timeline::Timeline;
use crate::isa::instruction::Op;
use crate::stats::SimStats;

/// What the Commit stage did this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// ROB empty or head not yet ready.
    Idle,
    /// One instruction retired normally.
    Retired,
    /// A mispredicted branch retired; all speculative state must be cleared
    /// and the fetch PC restored to `target`.
    Squashed {
        /// Resolved branch target to resume fetching from.
        target: u16,
    },
}

/// Executes the Commit stage.
#[allow(clippy::too_many_arguments)]
pub fn commit_stage(
    cycle: u64,
    rob: &mut Rob,
    rat: &mut RegisterAliasTable,
    regs: &mut Gpr,
    mem: &mut Memory,
    stats: &mut SimStats,
    timeline: &mut Timeline,
    trace: bool,
) -> Result<CommitOutcome, SimError> {
    let Some(entry) = rob.commit_head() else {
        return Ok(CommitOutcome::Idle);
    };

    timeline.record_commit(entry.row, cycle);
    if trace {
        eprintln!("CM  pc={} tag={} COMMIT", entry.inst.pc, entry.tag.0);
    }

    // Register write (arithmetic, LOAD, CALL link). The RAT entry is cleared
    // only if this tag still owns the register.
    if let Some(dest) = entry.dest_reg {
        regs.write(dest, entry.value);
        rat.clear_if_match(dest, entry.tag);
        if trace {
            eprintln!("CM  pc={} R{} <= {}", entry.inst.pc, dest, entry.value);
        }
    }

    // Memory write (STORE). This is the only place memory changes.
    if let Op::Store { .. } = entry.inst.op {
        let addr = entry.dest_addr.unwrap_or(0);
        if !mem.write(addr, entry.value) {
            return Err(SimError::StoreOutOfRange {
                tag: entry.tag.0,
                pc: entry.inst.pc,
                addr,
            });
        }
        if trace {
            eprintln!("CM  pc={} mem[{}] <= {}", entry.inst.pc, addr, entry.value);
        }
    }

    stats.instructions_retired += 1;

    if let Op::Beq { .. } = entry.inst.op {
        stats.branches += 1;
        if entry.mispredicted {
            stats.branch_mispredictions += 1;
            return Ok(CommitOutcome::Squashed {
                target: entry.actual_next_pc,
            });
        }
    }

    Ok(CommitOutcome::Retired)
}
