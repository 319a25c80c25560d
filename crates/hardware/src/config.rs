//! Configuration system for the DRAM subsystem simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** a baseline single-controller DDR3-1600 configuration.
//! 2. **Structures:** hierarchical config for general settings and per
//!    controller geometry, timing, page policy and scheduler policy.
//! 3. **Validation:** structural checks that turn a parsed file into
//!    per-section [`ConfigError`]s before any hardware is built.
//!
//! Configuration is supplied as JSON, or use `Config::default()` for a
//! ready-to-run single-controller system.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::error::ConfigError;
use crate::mem::timing::TimingParameters;

/// Default configuration constants for the simulator.
///
/// These values define the baseline geometry when not explicitly
/// overridden in a configuration file.
mod defaults {
    /// Channels per memory controller.
    pub const NUM_CHANNELS: usize = 1;

    /// Ranks per channel.
    pub const NUM_RANKS: usize = 2;

    /// Banks per rank (DDR3 devices expose 8).
    pub const NUM_BANKS: usize = 8;

    /// Rows per bank.
    pub const NUM_ROWS: u64 = 16384;

    /// Column positions per row.
    pub const NUM_COLUMNS: u64 = 1024;

    /// Device data width in bits.
    pub const NUM_BITS: u32 = 8;

    /// Command clock in MHz (DDR3-1600 runs its command bus at 800 MHz).
    pub const FREQUENCY_MHZ: u64 = 800;
}

/// Row-buffer management policy applied after each access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PagePolicy {
    /// Leave the accessed row open in the bank's row buffer.
    #[default]
    Open,
    /// Precharge the bank immediately after every access.
    Closed,
}

/// Command-scheduling policy used by each channel's dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SchedulerPolicy {
    /// Dispatch the queued command with the earliest creation cycle.
    #[default]
    OldestFirst,
    /// Rotate fairly over the rank/bank grid.
    RankBankRoundRobin,
}

/// Root configuration structure containing all simulator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// One section per memory controller.
    pub controllers: Vec<ControllerConfig>,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] carrying the file path when the file
    /// cannot be read or parsed, or the failing controller section when a
    /// value is structurally invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for structural problems that JSON parsing
    /// cannot catch: empty controller lists, zero geometry counts, unknown
    /// timing profiles and ambiguous timing sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controllers.is_empty() {
            return Err(ConfigError::NoControllers);
        }
        for (id, controller) in self.controllers.iter().enumerate() {
            let name = controller.display_name(id);
            let g = &controller.geometry;
            for (field, count) in [
                ("num_channels", g.num_channels as u64),
                ("num_ranks", g.num_ranks as u64),
                ("num_banks", g.num_banks as u64),
                ("num_rows", g.num_rows),
                ("num_columns", g.num_columns),
                ("num_bits", g.num_bits as u64),
            ] {
                if count == 0 {
                    return Err(ConfigError::InvalidGeometry {
                        controller: name.clone(),
                        field,
                    });
                }
            }
            controller.resolve_timing(id)?;
        }
        Ok(())
    }
}

impl Default for Config {
    /// A single controller with default geometry and DDR3-1600 timing.
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            controllers: vec![ControllerConfig::default()],
        }
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Record every dispatched command for later inspection.
    #[serde(default)]
    pub record_commands: bool,

    /// Command clock frequency in MHz, used only for time reporting.
    #[serde(default = "GeneralConfig::default_frequency")]
    pub frequency_mhz: u64,
}

impl GeneralConfig {
    fn default_frequency() -> u64 {
        defaults::FREQUENCY_MHZ
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            record_commands: false,
            frequency_mhz: defaults::FREQUENCY_MHZ,
        }
    }
}

/// Configuration of one memory controller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ControllerConfig {
    /// Controller name used in logs and errors. Defaults to `mc<index>`.
    #[serde(default)]
    pub name: Option<String>,

    /// Component counts under this controller.
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Row-buffer management policy.
    #[serde(default)]
    pub page_policy: PagePolicy,

    /// Command-scheduling policy.
    #[serde(default)]
    pub scheduler: SchedulerPolicy,

    /// Named timing profile, e.g. `"DDR3_1600"`. Mutually exclusive with
    /// `timing`.
    #[serde(default)]
    pub timing_profile: Option<String>,

    /// Explicit timing parameters. Mutually exclusive with
    /// `timing_profile`.
    #[serde(default)]
    pub timing: Option<TimingParameters>,
}

impl ControllerConfig {
    /// The controller's display name, falling back to `mc<index>`.
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("mc{index}"),
        }
    }

    /// Resolves this section's timing parameters.
    ///
    /// Precedence: explicit `timing` values, then a named `timing_profile`,
    /// then the DDR3-1600 defaults. Supplying both is an error.
    pub fn resolve_timing(&self, index: usize) -> Result<TimingParameters, ConfigError> {
        match (&self.timing, &self.timing_profile) {
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousTiming {
                controller: self.display_name(index),
            }),
            (Some(timing), None) => Ok(timing.clone()),
            (None, Some(profile)) => TimingParameters::profile(profile).ok_or_else(|| {
                ConfigError::UnknownProfile {
                    controller: self.display_name(index),
                    profile: profile.clone(),
                }
            }),
            (None, None) => Ok(TimingParameters::ddr3_1600()),
        }
    }
}

/// Component counts under one memory controller.
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryConfig {
    /// Channels owned by the controller.
    #[serde(default = "GeometryConfig::default_channels")]
    pub num_channels: usize,

    /// Ranks per channel.
    #[serde(default = "GeometryConfig::default_ranks")]
    pub num_ranks: usize,

    /// Banks per rank.
    #[serde(default = "GeometryConfig::default_banks")]
    pub num_banks: usize,

    /// Rows per bank.
    #[serde(default = "GeometryConfig::default_rows")]
    pub num_rows: u64,

    /// Column positions per row.
    #[serde(default = "GeometryConfig::default_columns")]
    pub num_columns: u64,

    /// Device data width in bits. Carried for capacity reporting; the
    /// address codec stops at the column field.
    #[serde(default = "GeometryConfig::default_bits")]
    pub num_bits: u32,
}

impl GeometryConfig {
    fn default_channels() -> usize {
        defaults::NUM_CHANNELS
    }

    fn default_ranks() -> usize {
        defaults::NUM_RANKS
    }

    fn default_banks() -> usize {
        defaults::NUM_BANKS
    }

    fn default_rows() -> u64 {
        defaults::NUM_ROWS
    }

    fn default_columns() -> u64 {
        defaults::NUM_COLUMNS
    }

    fn default_bits() -> u32 {
        defaults::NUM_BITS
    }

    /// Total bytes addressable under this geometry.
    pub fn capacity_bytes(&self) -> u64 {
        (self.num_channels as u64)
            * (self.num_ranks as u64)
            * (self.num_banks as u64)
            * self.num_rows
            * self.num_columns
            * (self.num_bits as u64)
            / 8
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            num_channels: defaults::NUM_CHANNELS,
            num_ranks: defaults::NUM_RANKS,
            num_banks: defaults::NUM_BANKS,
            num_rows: defaults::NUM_ROWS,
            num_columns: defaults::NUM_COLUMNS,
            num_bits: defaults::NUM_BITS,
        }
    }
}
