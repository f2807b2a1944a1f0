//! Reservation stations.
//!
//! Each functional unit owns a small pool of stations. A station buffers an
//! issued instruction together with its operands: each operand slot is either
//! a value or the ROB tag of the pending producer, never both. Stations move
//! through three phases — waiting for operands, running a countdown on their
//! unit, and holding a finished result for the CDB.
//!
//! Two timing rules live here:
//! - A station whose last operand arrives on this cycle's broadcast records
//!   `woke_cycle`; Execute will not start it until the next cycle.
//! - A station is freed at end of cycle (`retiring` flag), so Issue never
//!   reuses a slot freed earlier in the same cycle.

use crate::config::PipelineConfig;
use crate::core::pipeline::rob::RobTag;
use crate::core::pipeline::unit::UnitKind;
use crate::isa::instruction::Instruction;

/// One operand slot: a known value or the tag of the pending producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Operand value is known.
    Value(u16),
    /// Operand will be produced by the ROB entry with this tag.
    Tag(RobTag),
}

impl Operand {
    /// Returns the value if known.
    #[inline]
    pub fn value(&self) -> Option<u16> {
        match *self {
            Operand::Value(v) => Some(v),
            Operand::Tag(_) => None,
        }
    }

    /// True when the operand is a known value.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Operand::Value(_))
    }
}

/// Execution phase of an occupied station.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecPhase {
    /// Waiting for operands or a free unit lane.
    Waiting,
    /// Executing; `remaining` counts down to the finish cycle.
    Running { remaining: u32 },
    /// Result computed, not yet broadcast on the CDB.
    Finished(ExecOutcome),
}

/// What an execution produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    /// A register value (arithmetic result, loaded word, CALL link address).
    Value(u16),
    /// A resolved control transfer (BEQ, RET).
    Control { next_pc: u16 },
}

/// An occupied reservation station.
#[derive(Clone, Debug)]
pub struct StationEntry {
    /// The buffered instruction.
    pub inst: Instruction,
    /// ROB tag that will receive the result.
    pub dest_tag: RobTag,
    /// First operand (address base, rs1, or return address).
    pub j: Operand,
    /// Second operand (rs2 or store data).
    pub k: Operand,
    /// Immediate or address offset.
    pub a: i16,
    /// Current execution phase.
    pub phase: ExecPhase,
    /// Timeline row for stage stamps.
    pub row: usize,
    /// Cycle the last pending operand arrived via the CDB.
    pub woke_cycle: Option<u64>,
    /// Freed at end of cycle; not reusable until then.
    pub retiring: bool,
}

impl StationEntry {
    /// True when both operands are known values.
    #[inline]
    pub fn operands_ready(&self) -> bool {
        self.j.is_ready() && self.k.is_ready()
    }

    /// True when Execute may start this station at `cycle`.
    ///
    /// A station woken by a broadcast this cycle must wait one more cycle.
    pub fn can_start(&self, cycle: u64) -> bool {
        !self.retiring
            && self.phase == ExecPhase::Waiting
            && self.operands_ready()
            && self.woke_cycle != Some(cycle)
    }

    /// Substitutes a broadcast value for any matching tag slots.
    ///
    /// Records `woke_cycle` when the substitution completes the operand set.
    pub fn capture(&mut self, tag: RobTag, value: u16, cycle: u64) {
        let was_ready = self.operands_ready();
        if self.j == Operand::Tag(tag) {
            self.j = Operand::Value(value);
        }
        if self.k == Operand::Tag(tag) {
            self.k = Operand::Value(value);
        }
        if !was_ready && self.operands_ready() {
            self.woke_cycle = Some(cycle);
        }
    }
}

/// A pool of stations belonging to one functional unit.
pub struct StationPool {
    /// Unit kind this pool feeds.
    pub kind: UnitKind,
    /// Fixed-size slots; `None` is free.
    pub slots: Vec<Option<StationEntry>>,
}

impl StationPool {
    /// Creates a pool with `n` free stations.
    pub fn new(kind: UnitKind, n: usize) -> Self {
        Self {
            kind,
            slots: (0..n).map(|_| None).collect(),
        }
    }

    /// True when a slot is free for Issue.
    pub fn has_free(&self) -> bool {
        self.slots.iter().any(|s| s.is_none())
    }

    /// Places an entry in the first free slot. Panics if none is free; the
    /// issue stage checks `has_free` first.
    pub fn allocate(&mut self, entry: StationEntry) {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_none())
            .expect("no free reservation station");
        *slot = Some(entry);
    }

    /// Number of occupied slots (including retiring ones).
    pub fn busy_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// All reservation stations of the machine, one pool per unit kind.
pub struct StationFile {
    /// Pools indexed by [`UnitKind::index`].
    pub pools: [StationPool; 7],
}

impl StationFile {
    /// Builds the station file from the pipeline configuration.
    pub fn new(cfg: &PipelineConfig) -> Self {
        Self {
            pools: UnitKind::ALL.map(|kind| StationPool::new(kind, cfg.unit(kind).stations)),
        }
    }

    /// Returns the pool for a unit kind.
    #[inline]
    pub fn pool(&self, kind: UnitKind) -> &StationPool {
        &self.pools[kind.index()]
    }

    /// Returns the pool for a unit kind, mutably.
    #[inline]
    pub fn pool_mut(&mut self, kind: UnitKind) -> &mut StationPool {
        &mut self.pools[kind.index()]
    }

    /// True when any station is occupied.
    pub fn any_busy(&self) -> bool {
        self.pools.iter().any(|p| p.busy_count() > 0)
    }

    /// Frees stations that finished their broadcast (or store finish) this
    /// cycle. Called once at end of cycle.
    pub fn release_retiring(&mut self) {
        for pool in &mut self.pools {
            for slot in &mut pool.slots {
                if slot.as_ref().is_some_and(|e| e.retiring) {
                    *slot = None;
                }
            }
        }
    }

    /// Clears every station (misprediction squash).
    pub fn flush(&mut self) {
        for pool in &mut self.pools {
            for slot in &mut pool.slots {
                *slot = None;
            }
        }
    }
}
