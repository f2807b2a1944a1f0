//! Functional units.
//!
//! Each instruction kind maps to one of seven functional units. A unit has a
//! fixed execution latency and a number of parallel lanes; a reservation
//! station may only begin execution when its unit has a free lane. Lanes are
//! claimed at execution start and released when the countdown reaches zero.

use crate::config::PipelineConfig;
use crate::isa::instruction::Op;

/// The functional unit kinds of the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    /// Memory loads.
    Load,
    /// Memory stores.
    Store,
    /// Conditional branches (BEQ).
    Branch,
    /// CALL and RET.
    CallRet,
    /// ADD and ADDI.
    Add,
    /// NAND.
    Nand,
    /// MUL.
    Mul,
}

impl UnitKind {
    /// All unit kinds, in a fixed iteration order.
    pub const ALL: [UnitKind; 7] = [
        UnitKind::Load,
        UnitKind::Store,
        UnitKind::Branch,
        UnitKind::CallRet,
        UnitKind::Add,
        UnitKind::Nand,
        UnitKind::Mul,
    ];

    /// The unit that executes the given operation.
    pub fn of(op: &Op) -> UnitKind {
        match op {
            Op::Load { .. } => UnitKind::Load,
            Op::Store { .. } => UnitKind::Store,
            Op::Beq { .. } => UnitKind::Branch,
            Op::Call { .. } | Op::Ret => UnitKind::CallRet,
            Op::Add { .. } | Op::Addi { .. } => UnitKind::Add,
            Op::Nand { .. } => UnitKind::Nand,
            Op::Mul { .. } => UnitKind::Mul,
        }
    }

    /// Dense index for table storage.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            UnitKind::Load => 0,
            UnitKind::Store => 1,
            UnitKind::Branch => 2,
            UnitKind::CallRet => 3,
            UnitKind::Add => 4,
            UnitKind::Nand => 5,
            UnitKind::Mul => 6,
        }
    }
}

/// Lane bookkeeping for one functional unit.
#[derive(Clone, Copy, Debug)]
pub struct FunctionalUnit {
    /// Execution latency in cycles, start to finish.
    pub latency: u32,
    /// Total parallel execution lanes.
    pub lanes: usize,
    /// Lanes currently executing.
    pub busy: usize,
}

impl FunctionalUnit {
    /// True when at least one lane is free.
    #[inline]
    pub fn has_free_lane(&self) -> bool {
        self.busy < self.lanes
    }

    /// Claims a lane for the duration of one execution.
    pub fn claim(&mut self) {
        debug_assert!(self.busy < self.lanes);
        self.busy += 1;
    }

    /// Releases a lane when execution finishes.
    pub fn release(&mut self) {
        debug_assert!(self.busy > 0);
        self.busy -= 1;
    }
}

/// The full set of functional units, indexed by [`UnitKind`].
pub struct UnitSet {
    units: [FunctionalUnit; 7],
}

impl UnitSet {
    /// Builds the unit set from the pipeline configuration.
    pub fn new(cfg: &PipelineConfig) -> Self {
        let build = |kind: UnitKind| {
            let unit_cfg = cfg.unit(kind);
            FunctionalUnit {
                latency: unit_cfg.latency,
                lanes: unit_cfg.lanes(),
                busy: 0,
            }
        };
        Self {
            units: UnitKind::ALL.map(build),
        }
    }

    /// Returns the unit for a kind.
    #[inline]
    pub fn unit(&self, kind: UnitKind) -> &FunctionalUnit {
        &self.units[kind.index()]
    }

    /// Returns the unit for a kind, mutably.
    #[inline]
    pub fn unit_mut(&mut self, kind: UnitKind) -> &mut FunctionalUnit {
        &mut self.units[kind.index()]
    }

    /// Execution latency of a kind.
    #[inline]
    pub fn latency(&self, kind: UnitKind) -> u32 {
        self.units[kind.index()].latency
    }

    /// Releases every lane (misprediction squash).
    pub fn flush(&mut self) {
        for unit in &mut self.units {
            unit.busy = 0;
        }
    }
}
