//! Shared test infrastructure.
//!
//! Helpers for driving whole programs through the engine:
//! - [`run`] assembles a program at address 0 and runs it to completion.
//! - [`run_with`] does the same with a custom config and memory preload.
//! - [`row`] fetches a timeline row for stage-stamp assertions.

use tomasim_core::core::pipeline::timeline::TimelineRow;
use tomasim_core::isa::assemble;
use tomasim_core::{Config, Engine};

/// Assembles `src` at the config's start address and runs it to completion.
pub fn run_with(src: &str, config: &Config, preload: &[(u16, u16)]) -> Engine {
    let program = assemble(src, config.general.start_pc).expect("program should assemble");
    let mut engine = Engine::new(config, program);
    engine.preload(preload).expect("preload should fit");
    engine.run().expect("simulation should complete");
    engine
}

/// Assembles `src` at address 0 and runs it with the default configuration.
pub fn run(src: &str) -> Engine {
    run_with(src, &Config::default(), &[])
}

/// Returns the timeline row at `idx`.
pub fn row(engine: &Engine, idx: usize) -> &TimelineRow {
    &engine.timeline.rows()[idx]
}
