//! Machine constants for the simulated processor.

/// Number of architectural general-purpose registers (R0-R7).
pub const REG_COUNT: usize = 8;

/// Link register written by CALL with the return address (R7).
pub const LINK_REG: usize = 7;

/// Default memory capacity in 16-bit words (128 KB, word-addressable).
pub const MEM_WORDS: usize = 64 * 1024;
