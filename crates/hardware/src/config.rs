//! Configuration system for the simulator.
//!
//! This module defines all configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory, ROB, stations,
//!    latencies).
//! 2. **Structures:** Hierarchical config for general, memory, and pipeline
//!    settings.
//!
//! Configuration is supplied via JSON (`Config::from_json`) or
//! `Config::default()`. A per-unit override must supply both `stations` and
//! `latency`; `lanes` may be omitted and defaults to the station count.

use serde::Deserialize;

use crate::common::constants;
use crate::core::pipeline::unit::UnitKind;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default starting program counter (word address).
    pub const START_PC: u16 = 0;

    /// Default reorder buffer capacity.
    pub const ROB_SIZE: usize = 16;

    /// LOAD unit: reservation stations.
    pub const LOAD_STATIONS: usize = 2;
    /// LOAD unit: total latency (2 address + 4 memory cycles).
    pub const LOAD_LATENCY: u32 = 6;

    /// STORE unit: reservation stations.
    pub const STORE_STATIONS: usize = 1;
    /// STORE unit: total latency (2 address + 4 memory cycles).
    pub const STORE_LATENCY: u32 = 6;

    /// BEQ unit: reservation stations.
    pub const BRANCH_STATIONS: usize = 1;
    /// BEQ unit: latency.
    pub const BRANCH_LATENCY: u32 = 1;

    /// CALL/RET unit: reservation stations.
    pub const CALL_RET_STATIONS: usize = 1;
    /// CALL/RET unit: latency.
    pub const CALL_RET_LATENCY: u32 = 1;

    /// ADD/ADDI unit: reservation stations.
    pub const ADD_STATIONS: usize = 4;
    /// ADD/ADDI unit: latency.
    pub const ADD_LATENCY: u32 = 2;

    /// NAND unit: reservation stations.
    pub const NAND_STATIONS: usize = 2;
    /// NAND unit: latency.
    pub const NAND_LATENCY: u32 = 1;

    /// MUL unit: reservation stations.
    pub const MUL_STATIONS: usize = 1;
    /// MUL unit: latency.
    pub const MUL_LATENCY: u32 = 8;
}

/// Reservation-station and latency configuration for one functional unit.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnitConfig {
    /// Number of reservation stations buffering issued instructions.
    pub stations: usize,
    /// Total execution latency in cycles, start to finish.
    pub latency: u32,
    /// Parallel execution lanes; defaults to the station count.
    #[serde(default)]
    pub lanes: Option<usize>,
}

impl UnitConfig {
    /// Returns the effective lane count (explicit, or one per station).
    pub fn lanes(&self) -> usize {
        self.lanes.unwrap_or(self.stations)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Enable per-stage tracing to stderr.
    #[serde(default)]
    pub trace: bool,

    /// Initial fetch PC (word address).
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u16,
}

impl GeneralConfig {
    /// Returns the default starting program counter.
    fn default_start_pc() -> u16 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            start_pc: defaults::START_PC,
        }
    }
}

/// Memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Memory capacity in 16-bit words.
    #[serde(default = "MemoryConfig::default_size_words")]
    pub size_words: usize,
}

impl MemoryConfig {
    /// Returns the default memory capacity in words.
    fn default_size_words() -> usize {
        constants::MEM_WORDS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_words: constants::MEM_WORDS,
        }
    }
}

/// Pipeline configuration: ROB capacity and per-unit station/latency tables.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Reorder buffer capacity (in-flight instruction window).
    #[serde(default = "PipelineConfig::default_rob_size")]
    pub rob_size: usize,

    /// LOAD unit.
    #[serde(default = "PipelineConfig::default_load")]
    pub load: UnitConfig,

    /// STORE unit.
    #[serde(default = "PipelineConfig::default_store")]
    pub store: UnitConfig,

    /// BEQ unit.
    #[serde(default = "PipelineConfig::default_branch")]
    pub branch: UnitConfig,

    /// CALL/RET unit.
    #[serde(default = "PipelineConfig::default_call_ret")]
    pub call_ret: UnitConfig,

    /// ADD/ADDI unit.
    #[serde(default = "PipelineConfig::default_add")]
    pub add: UnitConfig,

    /// NAND unit.
    #[serde(default = "PipelineConfig::default_nand")]
    pub nand: UnitConfig,

    /// MUL unit.
    #[serde(default = "PipelineConfig::default_mul")]
    pub mul: UnitConfig,
}

impl PipelineConfig {
    /// Returns the default ROB capacity.
    fn default_rob_size() -> usize {
        defaults::ROB_SIZE
    }

    /// Returns the default LOAD unit configuration.
    fn default_load() -> UnitConfig {
        UnitConfig {
            stations: defaults::LOAD_STATIONS,
            latency: defaults::LOAD_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default STORE unit configuration.
    fn default_store() -> UnitConfig {
        UnitConfig {
            stations: defaults::STORE_STATIONS,
            latency: defaults::STORE_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default BEQ unit configuration.
    fn default_branch() -> UnitConfig {
        UnitConfig {
            stations: defaults::BRANCH_STATIONS,
            latency: defaults::BRANCH_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default CALL/RET unit configuration.
    fn default_call_ret() -> UnitConfig {
        UnitConfig {
            stations: defaults::CALL_RET_STATIONS,
            latency: defaults::CALL_RET_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default ADD/ADDI unit configuration.
    fn default_add() -> UnitConfig {
        UnitConfig {
            stations: defaults::ADD_STATIONS,
            latency: defaults::ADD_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default NAND unit configuration.
    fn default_nand() -> UnitConfig {
        UnitConfig {
            stations: defaults::NAND_STATIONS,
            latency: defaults::NAND_LATENCY,
            lanes: None,
        }
    }

    /// Returns the default MUL unit configuration.
    fn default_mul() -> UnitConfig {
        UnitConfig {
            stations: defaults::MUL_STATIONS,
            latency: defaults::MUL_LATENCY,
            lanes: None,
        }
    }

    /// Returns the configuration for the given functional unit kind.
    pub fn unit(&self, kind: UnitKind) -> &UnitConfig {
        match kind {
            UnitKind::Load => &self.load,
            UnitKind::Store => &self.store,
            UnitKind::Branch => &self.branch,
            UnitKind::CallRet => &self.call_ret,
            UnitKind::Add => &self.add,
            UnitKind::Nand => &self.nand,
            UnitKind::Mul => &self.mul,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rob_size: Self::default_rob_size(),
            load: Self::default_load(),
            store: Self::default_store(),
            branch: Self::default_branch(),
            call_ret: Self::default_call_ret(),
            add: Self::default_add(),
            nand: Self::default_nand(),
            mul: Self::default_mul(),
        }
    }
}

/// Root configuration for the simulator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Pipeline configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing sections and fields fall back to the defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
