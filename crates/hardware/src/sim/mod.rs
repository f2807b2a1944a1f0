//! Simulation front door: input loading and output formatting.
//!
//! 1. **Loader:** Reads assembly source and memory-image files from disk.
//! 2. **Report:** Renders the per-instruction timeline table and summary.

/// Assembly and memory-image file loading.
pub mod loader;

/// Timeline table rendering.
pub mod report;
