//! Error definitions for the simulator.
//!
//! This module defines the crate-level error type. It covers:
//! 1. **Load-time failures:** Parse errors (with line numbers) and memory
//!    image problems; no simulation runs after one of these.
//! 2. **Runtime faults:** Out-of-range memory accesses detected at LOAD
//!    execute or STORE commit, reported with tag, PC, and address.
//! 3. **Internal faults:** Pipeline deadlock, reported with the cycle and a
//!    dump of ROB and station state.
//!
//! Resource exhaustion (full stations, full ROB) is never an error; it is a
//! stall. All errors here terminate the run.

use std::fmt;
use std::io;

/// Crate-level error type for the simulator.
#[derive(Debug)]
pub enum SimError {
    /// Malformed assembly or memory-image line.
    ///
    /// Raised at load time with the 1-based source line number.
    Parse {
        /// 1-based line number in the input file.
        line: usize,
        /// Description of the problem.
        msg: String,
    },

    /// Memory-image entry targets an address outside the configured memory.
    MemoryImage {
        /// Offending word address.
        addr: u16,
        /// Configured memory capacity in words.
        capacity: usize,
    },

    /// A file could not be read.
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// LOAD computed an effective address outside memory.
    ///
    /// Detected at execute time, when the load performs its memory read.
    LoadOutOfRange {
        /// ROB tag of the faulting instruction.
        tag: u64,
        /// PC (word address) of the faulting instruction.
        pc: u16,
        /// Effective address that was out of range.
        addr: i64,
    },

    /// STORE computed an effective address outside memory.
    ///
    /// Detected at commit time, when the store writes memory.
    StoreOutOfRange {
        /// ROB tag of the faulting instruction.
        tag: u64,
        /// PC (word address) of the faulting instruction.
        pc: u16,
        /// Effective address that was out of range.
        addr: i64,
    },

    /// The pipeline can make no further progress.
    ///
    /// Fetch is exhausted, the ROB is non-empty, no station is busy, and the
    /// ROB head can never complete. This indicates an internal engine fault.
    Deadlock {
        /// Cycle at which the deadlock was detected.
        cycle: u64,
        /// Human-readable dump of ROB and station state.
        dump: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Parse { line, msg } => write!(f, "line {}: {}", line, msg),
            SimError::MemoryImage { addr, capacity } => write!(
                f,
                "memory image address {} outside memory of {} words",
                addr, capacity
            ),
            SimError::Io { path, source } => write!(f, "could not read '{}': {}", path, source),
            SimError::LoadOutOfRange { tag, pc, addr } => write!(
                f,
                "LOAD out of range: tag={} pc={} addr={}",
                tag, pc, addr
            ),
            SimError::StoreOutOfRange { tag, pc, addr } => write!(
                f,
                "STORE out of range: tag={} pc={} addr={}",
                tag, pc, addr
            ),
            SimError::Deadlock { cycle, dump } => {
                write!(f, "pipeline deadlock at cycle {}\n{}", cycle, dump)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
