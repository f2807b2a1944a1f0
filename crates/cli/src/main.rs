//! Tomasulo pipeline simulator CLI.
//!
//! This binary drives a simulation end to end:
//! 1. **Inputs:** An assembly file, an optional memory image, a starting
//!    program address, and an optional JSON configuration.
//! 2. **Run:** Assembles the program, preloads memory, and runs the engine
//!    to completion.
//! 3. **Outputs:** The per-instruction timeline table and the summary
//!    statistics (cycles, IPC, branch misprediction rate).

use clap::{Parser, Subcommand};
use std::{fs, process};

use tomasim_core::Config;
use tomasim_core::Engine;
use tomasim_core::sim::{loader, report};

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    author,
    version,
    about = "Cycle-accurate 16-bit Tomasulo out-of-order pipeline simulator",
    long_about = "Simulates a simplified 16-bit RISC processor with Tomasulo's algorithm,\n\
                  a reorder buffer, and a static not-taken branch predictor.\n\n\
                  Examples:\n  \
                  tomasim run -f prog.asm\n  \
                  tomasim run -f prog.asm --mem image.mem --start 2\n  \
                  tomasim run -f prog.asm --config pipeline.json --trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a program, run it, and print the timeline and summary.
    Run {
        /// Assembly source file.
        #[arg(short, long)]
        file: String,

        /// Memory image file of `address value` pairs.
        #[arg(long)]
        mem: Option<String>,

        /// Starting program address (word); overrides the config value.
        #[arg(long)]
        start: Option<u16>,

        /// JSON configuration file (stations, latencies, ROB size, memory).
        #[arg(long)]
        config: Option<String>,

        /// Trace every stage action to stderr.
        #[arg(long)]
        trace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            file,
            mem,
            start,
            config,
            trace,
        }) => cmd_run(file, mem, start, config, trace),
        None => {
            eprintln!("tomasim — pass a subcommand");
            eprintln!();
            eprintln!("  tomasim run -f <prog.asm> [--mem <image>] [--start <pc>]");
            eprintln!();
            eprintln!("  tomasim --help  for full options");
            process::exit(1);
        }
    }
}

/// Loads inputs, runs the engine to completion, and prints the reports.
///
/// Exits with code 1 on any load-time or simulation error, dumping pipeline
/// and register state for runtime faults.
fn cmd_run(
    file: String,
    mem: Option<String>,
    start: Option<u16>,
    config_path: Option<String>,
    trace: bool,
) {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("[!] FATAL: could not read config '{}': {}", path, e);
                process::exit(1);
            });
            Config::from_json(&text).unwrap_or_else(|e| {
                eprintln!("[!] FATAL: bad config '{}': {}", path, e);
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    if let Some(pc) = start {
        config.general.start_pc = pc;
    }
    if trace {
        config.general.trace = true;
    }

    let program = loader::load_program(&file, config.general.start_pc).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: {}", e);
        process::exit(1);
    });

    let mut engine = Engine::new(&config, program);

    if let Some(mem_path) = mem {
        let pairs = loader::load_memory_image(&mem_path).unwrap_or_else(|e| {
            eprintln!("[!] FATAL: {}", e);
            process::exit(1);
        });
        if let Err(e) = engine.preload(&pairs) {
            eprintln!("[!] FATAL: {}", e);
            process::exit(1);
        }
    }

    if let Err(e) = engine.run() {
        eprintln!("\n[!] FATAL: {}", e);
        engine.dump_state();
        process::exit(1);
    }

    print!("{}", report::render_timeline(&engine.timeline));
    engine.stats.print();
}
