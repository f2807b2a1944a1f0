//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived IPC.
//! 2. **Branch prediction:** Retired branch count, mispredictions, and the
//!    misprediction rate of the static not-taken predictor.

use std::time::Instant;

/// Simulation statistics tracking all performance metrics.
#[derive(Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,
    /// Number of conditional branches retired.
    pub branches: u64,
    /// Number of retired branches that were mispredicted.
    pub branch_mispredictions: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            branches: 0,
            branch_mispredictions: 0,
        }
    }
}

impl SimStats {
    /// Instructions retired per cycle. Zero when no cycle has elapsed.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Branch misprediction rate as a percentage. Zero when no branch retired.
    pub fn misprediction_rate(&self) -> f64 {
        if self.branches == 0 {
            0.0
        } else {
            100.0 * self.branch_mispredictions as f64 / self.branches as f64
        }
    }

    /// Prints the statistics summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("TOMASULO PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.3}", self.ipc());
        println!("----------------------------------------------------------");
        println!("branch.count             {}", self.branches);
        println!("branch.mispredicts       {}", self.branch_mispredictions);
        println!("branch.miss_rate         {:.2}%", self.misprediction_rate());
        println!("==========================================================");
    }
}
