//! Register Alias Table (RAT).
//!
//! Maps each architectural register to the ROB tag of its latest in-flight
//! producer, or `None` when the value lives in the architectural register
//! file. Issue writes the mapping for destination registers; Commit clears it
//! only when the committing tag still owns the register, so a newer rename of
//! the same register survives an older instruction's retirement.

use crate::common::constants::REG_COUNT;
use crate::core::pipeline::rob::RobTag;

/// Register alias table: architectural register to pending producer tag.
pub struct RegisterAliasTable {
    map: [Option<RobTag>; REG_COUNT],
}

impl Default for RegisterAliasTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAliasTable {
    /// Creates a RAT with every register architectural (no pending writers).
    pub fn new() -> Self {
        Self {
            map: [None; REG_COUNT],
        }
    }

    /// Marks a register as pending on the given ROB tag.
    pub fn set_producer(&mut self, reg: usize, tag: RobTag) {
        self.map[reg] = Some(tag);
    }

    /// Returns the pending producer tag for a register, if any.
    #[inline]
    pub fn producer(&self, reg: usize) -> Option<RobTag> {
        self.map[reg]
    }

    /// Clears a register's mapping, but only if the tag still matches.
    ///
    /// A committing instruction must not clear a mapping installed by a
    /// newer issue to the same register (WAW).
    pub fn clear_if_match(&mut self, reg: usize, tag: RobTag) {
        if self.map[reg] == Some(tag) {
            self.map[reg] = None;
        }
    }

    /// Resets every mapping to architectural (misprediction squash).
    pub fn flush(&mut self) {
        self.map = [None; REG_COUNT];
    }
}
