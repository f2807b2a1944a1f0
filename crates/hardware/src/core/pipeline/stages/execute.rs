//! Execute Stage: start ready stations and advance running ones.
//!
//! Two passes per cycle:
//! 1. **Start:** Among waiting stations with complete operands, the oldest
//!    ROB tag per unit kind starts first, claiming a unit lane. Stations
//!    woken by this cycle's broadcast are skipped until next cycle.
//! 2. **Countdown:** Every running station decrements; at zero the result is
//!    computed and the lane released. LOADs read committed memory here (an
//!    out-of-range effective address is fatal). STOREs bypass the CDB: the
//!    address and data go straight to the ROB entry, which becomes ready to
//!    commit, and the station is freed at end of cycle.

use crate::common::SimError;
use crate::core::arch::Memory;
use crate::core::pipeline::rob::{Rob, RobState, RobTag};
use crate::core::pipeline::station::{ExecOutcome, ExecPhase, StationFile};
use crate::core::pipeline::timeline::Timeline;
use crate::core::pipeline::unit::{UnitKind, UnitSet};
use crate::isa::instruction::Op;

/// Executes the Execute stage.
pub fn execute_stage(
    cycle: u64,
    rob: &mut Rob,
    stations: &mut StationFile,
    units: &mut UnitSet,
    mem: &Memory,
    timeline: &mut Timeline,
    trace: bool,
) -> Result<(), SimError> {
    start_ready(cycle, rob, stations, units, timeline, trace);
    advance_running(cycle, rob, stations, units, mem, timeline, trace)
}

/// Starts execution on waiting stations, oldest ROB tag first per unit.
fn start_ready(
    cycle: u64,
    rob: &mut Rob,
    stations: &mut StationFile,
    units: &mut UnitSet,
    timeline: &mut Timeline,
    trace: bool,
) {
    for kind in UnitKind::ALL {
        let mut ready: Vec<(usize, RobTag)> = stations
            .pool(kind)
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| {
                s.as_ref()
                    .filter(|e| e.can_start(cycle))
                    .map(|e| (slot, e.dest_tag))
            })
            .collect();
        ready.sort_by_key(|&(_, tag)| tag);

        for (slot, tag) in ready {
            if !units.unit(kind).has_free_lane() {
                break;
            }
            units.unit_mut(kind).claim();
            let latency = units.latency(kind);

            if let Some(entry) = stations.pool_mut(kind).slots[slot].as_mut() {
                entry.phase = ExecPhase::Running { remaining: latency };
                timeline.record_exec_start(entry.row, cycle);
                if trace {
                    eprintln!("EX  pc={} tag={} START lat={}", entry.inst.pc, tag.0, latency);
                }
            }
            if let Some(rob_entry) = rob.find_entry_mut(tag) {
                rob_entry.state = RobState::Executing;
            }
        }
    }
}

/// Decrements running stations; computes results when the countdown hits zero.
fn advance_running(
    cycle: u64,
    rob: &mut Rob,
    stations: &mut StationFile,
    units: &mut UnitSet,
    mem: &Memory,
    timeline: &mut Timeline,
    trace: bool,
) -> Result<(), SimError> {
    for kind in UnitKind::ALL {
        for slot in 0..stations.pool(kind).slots.len() {
            let Some(entry) = stations.pool_mut(kind).slots[slot].as_mut() else {
                continue;
            };
            let ExecPhase::Running { remaining } = &mut entry.phase else {
                continue;
            };
            *remaining -= 1;
            if *remaining > 0 {
                continue;
            }

            // Finished this cycle.
            units.unit_mut(kind).release();
            timeline.record_exec_finish(entry.row, cycle);

            let tag = entry.dest_tag;
            let pc = entry.inst.pc;
            let vj = entry.j.value().unwrap_or(0);
            let vk = entry.k.value().unwrap_or(0);
            let a = entry.a;

            match entry.inst.op {
                Op::Store { .. } => {
                    // Address and data go straight to the ROB; no broadcast.
                    let addr = vj as i64 + a as i64;
                    entry.retiring = true;
                    if let Some(rob_entry) = rob.find_entry_mut(tag) {
                        rob_entry.dest_addr = Some(addr);
                        rob_entry.value = vk;
                        rob_entry.state = RobState::ReadyToCommit;
                    }
                    if trace {
                        eprintln!("EX  pc={} tag={} STORE addr={} data={}", pc, tag.0, addr, vk);
                    }
                }
                Op::Load { .. } => {
                    // Loads see committed memory only; stores earlier in
                    // program order that have not committed are invisible.
                    let addr = vj as i64 + a as i64;
                    let word = mem.read(addr).ok_or(SimError::LoadOutOfRange {
                        tag: tag.0,
                        pc,
                        addr,
                    })?;
                    entry.phase = ExecPhase::Finished(ExecOutcome::Value(word));
                    if trace {
                        eprintln!("EX  pc={} tag={} LOAD addr={} -> {}", pc, tag.0, addr, word);
                    }
                }
                Op::Beq { offset, .. } => {
                    let fall_through = pc.wrapping_add(1);
                    let next_pc = if vj == vk {
                        fall_through.wrapping_add_signed(offset)
                    } else {
                        fall_through
                    };
                    entry.phase = ExecPhase::Finished(ExecOutcome::Control { next_pc });
                    if trace {
                        eprintln!("EX  pc={} tag={} BEQ -> {}", pc, tag.0, next_pc);
                    }
                }
                Op::Call { .. } => {
                    // The link value; the target was resolved at issue.
                    let link = pc.wrapping_add(1);
                    entry.phase = ExecPhase::Finished(ExecOutcome::Value(link));
                }
                Op::Ret => {
                    entry.phase = ExecPhase::Finished(ExecOutcome::Control { next_pc: vj });
                }
                Op::Add { .. } => {
                    entry.phase = ExecPhase::Finished(ExecOutcome::Value(vj.wrapping_add(vk)));
                }
                Op::Addi { .. } => {
                    entry.phase =
                        ExecPhase::Finished(ExecOutcome::Value(vj.wrapping_add_signed(a)));
                }
                Op::Nand { .. } => {
                    entry.phase = ExecPhase::Finished(ExecOutcome::Value(!(vj & vk)));
                }
                Op::Mul { .. } => {
                    entry.phase = ExecPhase::Finished(ExecOutcome::Value(vj.wrapping_mul(vk)));
                }
            }
        }
    }
    Ok(())
}
