//! Write-Result Stage: one CDB broadcast per cycle.
//!
//! The oldest finished station wins the bus. Its ROB entry receives the
//! value (arithmetic/LOAD/CALL link) or the resolved next PC and
//! misprediction verdict (BEQ/RET). Value broadcasts are forwarded into
//! every waiting operand slot with a matching tag; a station completed by
//! the forward is stamped so it cannot start executing this same cycle. The
//! broadcasting station is freed at end of cycle.

use crate::core::pipeline::cdb::{self, CdbMessage};
use crate::core::pipeline::rob::{Rob, RobState};
use crate::core::pipeline::station::{ExecOutcome, ExecPhase, StationFile};
use crate::core::pipeline::timeline::Timeline;
use crate::isa::instruction::Op;

/// Executes the Write-Result stage.
pub fn write_result_stage(
    cycle: u64,
    rob: &mut Rob,
    stations: &mut StationFile,
    timeline: &mut Timeline,
    trace: bool,
) {
    let Some((kind, slot)) = cdb::arbitrate(stations) else {
        return;
    };

    let (tag, row, inst, outcome) = {
        let Some(entry) = stations.pool(kind).slots[slot].as_ref() else {
            return;
        };
        let ExecPhase::Finished(outcome) = entry.phase else {
            return;
        };
        (entry.dest_tag, entry.row, entry.inst, outcome)
    };

    let mut message: Option<CdbMessage> = None;
    if let Some(rob_entry) = rob.find_entry_mut(tag) {
        match outcome {
            ExecOutcome::Value(value) => {
                rob_entry.value = value;
                rob_entry.state = RobState::Written;
                if let Op::Call { target } = inst.op {
                    // Target was known at issue; a CALL never mispredicts.
                    rob_entry.actual_next_pc = target;
                }
                message = Some(CdbMessage { tag, value });
            }
            ExecOutcome::Control { next_pc } => {
                rob_entry.actual_next_pc = next_pc;
                rob_entry.mispredicted = next_pc != rob_entry.predicted_next_pc;
                rob_entry.state = RobState::ReadyToCommit;
            }
        }
    }

    timeline.record_write(row, cycle);
    if trace {
        match outcome {
            ExecOutcome::Value(value) => {
                eprintln!("WR  pc={} tag={} value={}", inst.pc, tag.0, value)
            }
            ExecOutcome::Control { next_pc } => {
                eprintln!("WR  pc={} tag={} next_pc={}", inst.pc, tag.0, next_pc)
            }
        }
    }

    // Forward the value into every waiting operand slot.
    if let Some(msg) = message {
        for pool in &mut stations.pools {
            for waiter in pool.slots.iter_mut().flatten() {
                if !waiter.retiring {
                    waiter.capture(msg.tag, msg.value, cycle);
                }
            }
        }
    }

    // The bus is released; the station itself frees at end of cycle.
    if let Some(entry) = stations.pool_mut(kind).slots[slot].as_mut() {
        entry.retiring = true;
    }
}
