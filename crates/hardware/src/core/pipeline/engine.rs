//! Pipeline engine: the per-cycle orchestrator.
//!
//! The engine owns every piece of architectural and speculative state and
//! drives the stage actions in the strict order Commit, Write-Result,
//! Execute, Issue. It also implements:
//! 1. **Squash:** Atomic clearing of ROB, stations, unit lanes, and RAT when
//!    Commit reports a mispredicted branch; the fetch PC is restored and no
//!    further stage runs that cycle.
//! 2. **Termination:** The run ends when the fetch pointer has left the
//!    program and the ROB has drained.
//! 3. **Deadlock detection:** A non-empty ROB that can never complete is a
//!    fatal internal error, reported with a state dump.

use crate::common::SimError;
use crate::config::Config;
use crate::core::arch::{Gpr, Memory};
use crate::core::pipeline::rat::RegisterAliasTable;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::stages::commit::{CommitOutcome, commit_stage};
use crate::core::pipeline::stages::execute::execute_stage;
use crate::core::pipeline::stages::issue::issue_stage;
use crate::core::pipeline::stages::write_result::write_result_stage;
use crate::core::pipeline::station::StationFile;
use crate::core::pipeline::timeline::Timeline;
use crate::core::pipeline::unit::UnitSet;
use crate::isa::instruction::Program;
use crate::stats::SimStats;

/// The simulation engine: all state plus the cycle loop.
pub struct Engine {
    /// The loaded program.
    pub program: Program,
    /// Speculative fetch pointer, distinct from the architectural PC implied
    /// by the ROB head. Restored on squash.
    pub fetch_pc: u16,
    /// Reorder buffer.
    pub rob: Rob,
    /// Register alias table.
    pub rat: RegisterAliasTable,
    /// Reservation stations, one pool per functional unit.
    pub stations: StationFile,
    /// Functional unit lanes and latencies.
    pub units: UnitSet,
    /// Architectural register file.
    pub regs: Gpr,
    /// Architectural memory.
    pub mem: Memory,
    /// Performance counters.
    pub stats: SimStats,
    /// Per-instruction stage stamps.
    pub timeline: Timeline,
    /// Current cycle (0 before the first tick).
    pub cycle: u64,
    /// Per-stage tracing to stderr.
    pub trace: bool,
}

impl Engine {
    /// Creates an engine for `program` with the given configuration.
    pub fn new(config: &Config, program: Program) -> Self {
        Self {
            fetch_pc: config.general.start_pc,
            program,
            rob: Rob::new(config.pipeline.rob_size),
            rat: RegisterAliasTable::new(),
            stations: StationFile::new(&config.pipeline),
            units: UnitSet::new(&config.pipeline),
            regs: Gpr::new(),
            mem: Memory::new(config.memory.size_words),
            stats: SimStats::default(),
            timeline: Timeline::new(),
            cycle: 0,
            trace: config.general.trace,
        }
    }

    /// Initializes memory from (address, value) pairs before the run.
    pub fn preload(&mut self, pairs: &[(u16, u16)]) -> Result<(), SimError> {
        self.mem.preload(pairs)
    }

    /// Runs one cycle: Commit, Write-Result, Execute, Issue.
    ///
    /// After a squash no further stage runs in the cycle.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.cycle += 1;
        self.stats.cycles = self.cycle;

        let outcome = commit_stage(
            self.cycle,
            &mut self.rob,
            &mut self.rat,
            &mut self.regs,
            &mut self.mem,
            &mut self.stats,
            &mut self.timeline,
            self.trace,
        )?;
        if let CommitOutcome::Squashed { target } = outcome {
            self.squash(target);
            return Ok(());
        }

        write_result_stage(
            self.cycle,
            &mut self.rob,
            &mut self.stations,
            &mut self.timeline,
            self.trace,
        );

        execute_stage(
            self.cycle,
            &mut self.rob,
            &mut self.stations,
            &mut self.units,
            &self.mem,
            &mut self.timeline,
            self.trace,
        )?;

        issue_stage(
            self.cycle,
            &mut self.fetch_pc,
            &self.program,
            &mut self.rob,
            &mut self.rat,
            &mut self.stations,
            &self.regs,
            &mut self.timeline,
            self.trace,
        );

        self.stations.release_retiring();
        Ok(())
    }

    /// Runs the simulation to completion.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.finished() {
            self.check_deadlock()?;
            self.tick()?;
        }
        Ok(())
    }

    /// True when the fetch pointer has left the program and the ROB drained.
    pub fn finished(&self) -> bool {
        self.fetch_exhausted() && self.rob.is_empty()
    }

    fn fetch_exhausted(&self) -> bool {
        self.program.fetch(self.fetch_pc).is_none()
    }

    /// Clears all speculative state after a mispredicted branch.
    fn squash(&mut self, target: u16) {
        let mut rows = Vec::new();
        self.rob.for_each(|entry| rows.push(entry.row));
        for row in rows {
            self.timeline.mark_squashed(row);
        }

        self.rob.flush_all();
        self.stations.flush();
        self.units.flush();
        self.rat.flush();
        self.fetch_pc = target;

        if self.trace {
            eprintln!("CM  * SQUASH fetch_pc={}", target);
        }
    }

    /// Fatal when in-flight work exists that can never complete.
    fn check_deadlock(&self) -> Result<(), SimError> {
        let stuck = self.fetch_exhausted()
            && !self.rob.is_empty()
            && !self.stations.any_busy()
            && self
                .rob
                .peek_head()
                .is_some_and(|head| !head.state.committable());
        if stuck {
            return Err(SimError::Deadlock {
                cycle: self.cycle,
                dump: self.dump_string(),
            });
        }
        Ok(())
    }

    /// Renders ROB and station occupancy for fatal-error reports.
    pub fn dump_string(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "fetch_pc={} rob={}/{}\n",
            self.fetch_pc,
            self.rob.len(),
            self.rob.capacity()
        ));
        self.rob.for_each(|entry| {
            out.push_str(&format!(
                "  rob tag={} pc={} state={:?}\n",
                entry.tag.0, entry.inst.pc, entry.state
            ));
        });
        for pool in &self.stations.pools {
            out.push_str(&format!(
                "  station {:?}: {}/{} busy\n",
                pool.kind,
                pool.busy_count(),
                pool.slots.len()
            ));
        }
        out
    }

    /// Dumps register and pipeline state to stderr.
    pub fn dump_state(&self) {
        eprintln!("cycle={}", self.cycle);
        eprintln!("{}", self.dump_string());
        self.regs.dump();
    }
}
