//! Issue Stage: dispatch one instruction per cycle in program order.
//!
//! Consumes the instruction at the fetch PC when a reservation station of
//! the required unit kind and a ROB slot are both free; otherwise the stage
//! stalls and the fetch PC does not advance. Source operands are captured as
//! values (architectural, or bypassed from a completed ROB entry) or as the
//! producing ROB tag. The fetch PC advances under the static not-taken
//! policy: fall-through for BEQ, the target for CALL, and for RET the stage
//! stalls until the return address is available so the predictor stays
//! stateless.

use crate::common::constants::LINK_REG;
use crate::core::arch::Gpr;
use crate::core::pipeline::rat::RegisterAliasTable;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::station::{ExecPhase, Operand, StationEntry, StationFile};
use crate::core::pipeline::timeline::Timeline;
use crate::core::pipeline::unit::UnitKind;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::{Op, Program};

/// Executes the Issue stage.
#[allow(clippy::too_many_arguments)]
pub fn issue_stage(
    cycle: u64,
    fetch_pc: &mut u16,
    program: &Program,
    rob: &mut Rob,
    rat: &mut RegisterAliasTable,
    stations: &mut StationFile,
    regs: &Gpr,
    timeline: &mut Timeline,
    trace: bool,
) {
    let Some(inst) = program.fetch(*fetch_pc) else {
        return; // fetch exhausted
    };

    let kind = UnitKind::of(&inst.op);
    if rob.is_full() || !stations.pool(kind).has_free() {
        if trace {
            eprintln!("IS  pc={} STALL structural ({:?})", inst.pc, kind);
        }
        return;
    }

    // RET needs the return address at issue time (stateless predictor):
    // stall until the link register's producer has broadcast.
    let ret_addr = match inst.op {
        Op::Ret => match resolve_ready(LINK_REG, rat, rob, regs) {
            Some(v) => Some(v),
            None => {
                if trace {
                    eprintln!("IS  pc={} STALL ret-address pending", inst.pc);
                }
                return;
            }
        },
        _ => None,
    };

    // Capture source operands before renaming the destination, so an
    // instruction reading its own destination sees the old producer. RET's
    // link-register slot resolves to a value here: the stall check above
    // already proved it available. Empty slots are ready values.
    let capture = |reg: Option<usize>| {
        reg.map_or(Operand::Value(0), |r| read_operand(r, rat, rob, regs))
    };
    let (src1, src2) = inst.op.sources();
    let (j, k) = (capture(src1), capture(src2));

    let fall_through = inst.pc.wrapping_add(1);
    let predicted_next_pc = match inst.op {
        Op::Call { target } => target,
        Op::Ret => ret_addr.unwrap_or(0),
        _ => fall_through, // BEQ predicted not taken
    };

    let row = timeline.record_issue(inst.pc, disassemble(&inst.op), cycle);
    let Some(tag) = rob.allocate(inst, inst.op.dest_reg(), predicted_next_pc, row) else {
        return;
    };

    if let Some(dest) = inst.op.dest_reg() {
        rat.set_producer(dest, tag);
    }

    stations.pool_mut(kind).allocate(StationEntry {
        inst,
        dest_tag: tag,
        j,
        k,
        a: inst.op.immediate(),
        phase: ExecPhase::Waiting,
        row,
        woke_cycle: None,
        retiring: false,
    });

    *fetch_pc = predicted_next_pc;

    if trace {
        eprintln!(
            "IS  pc={} tag={} {} (next={})",
            inst.pc,
            tag.0,
            disassemble(&inst.op),
            predicted_next_pc
        );
    }
}

/// Reads a source operand: an architectural value, a bypassed ROB result, or
/// the tag of the pending producer.
fn read_operand(reg: usize, rat: &RegisterAliasTable, rob: &Rob, regs: &Gpr) -> Operand {
    match rat.producer(reg) {
        None => Operand::Value(regs.read(reg)),
        Some(tag) => match rob.find_entry(tag) {
            Some(entry) if entry.state.committable() => Operand::Value(entry.value),
            Some(_) => Operand::Tag(tag),
            // Producer already committed; the value is architectural.
            None => Operand::Value(regs.read(reg)),
        },
    }
}

/// Like [`read_operand`], but only succeeds when the value is available now.
fn resolve_ready(reg: usize, rat: &RegisterAliasTable, rob: &Rob, regs: &Gpr) -> Option<u16> {
    match read_operand(reg, rat, rob, regs) {
        Operand::Value(v) => Some(v),
        Operand::Tag(_) => None,
    }
}
