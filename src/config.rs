//! Simulator configuration.
//!
//! Loaded from a TOML file. Every field has a default, so an empty file
//! (or no file at all) yields a runnable four-element system.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::NUM_PES;
use crate::common::error::SimError;

const DEFAULT_DATA_MEMORY_SIZE: usize = 64 * 1024;

const IDLE_SLEEP_US: u64 = 1_000;
const STEP_FOREVER_SLEEP_US: u64 = 10;
const SERVER_POLL_US: u64 = 1;
const RESPONDER_POLL_US: u64 = 1;
const RELOAD_TIMEOUT_MS: u64 = 1_000;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub data_memory: DataMemoryConfig,
    /// Per-element capabilities. Missing entries use the defaults.
    #[serde(default)]
    pub pe: Vec<PeConfig>,
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(content: &str) -> Result<Self, SimError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.pe.len() > NUM_PES {
            return Err(SimError::InvalidConfig(format!(
                "{} [[pe]] entries for {} processing elements",
                self.pe.len(),
                NUM_PES
            )));
        }
        if self.data_memory.enabled && self.data_memory.size_val() == 0 {
            return Err(SimError::InvalidConfig(
                "data_memory.size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Capabilities of element `idx`.
    pub fn pe_config(&self, idx: usize) -> PeConfig {
        self.pe.get(idx).cloned().unwrap_or_default()
    }

    /// Whether pipeline tracing is on, either by configuration or because
    /// the crate was built with the `always-trace` feature.
    pub fn trace_enabled(&self) -> bool {
        cfg!(feature = "always-trace") || self.general.trace_pipeline
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace_pipeline: bool,
    /// Flat binary image served to every element.
    #[serde(default)]
    pub instruction_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Sleep between command polls while idle.
    #[serde(default = "default_idle_sleep")]
    pub idle_sleep_us: u64,
    /// Pacing sleep after every step-forever cycle. 0 disables it.
    #[serde(default = "default_step_forever_sleep")]
    pub step_forever_sleep_us: u64,
    /// Sleep between instruction server polling rounds.
    #[serde(default = "default_server_poll")]
    pub server_poll_us: u64,
    /// Sleep between data memory responder polling rounds.
    #[serde(default = "default_responder_poll")]
    pub responder_poll_us: u64,
    #[serde(default = "default_reload_timeout")]
    pub reload_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            idle_sleep_us: IDLE_SLEEP_US,
            step_forever_sleep_us: STEP_FOREVER_SLEEP_US,
            server_poll_us: SERVER_POLL_US,
            responder_poll_us: RESPONDER_POLL_US,
            reload_timeout_ms: RELOAD_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataMemoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Size in bytes, hexadecimal (`"0x10000"`).
    #[serde(default = "default_data_memory_size")]
    pub size: String,
}

impl DataMemoryConfig {
    pub fn size_val(&self) -> usize {
        let s = self.size.trim_start_matches("0x");
        usize::from_str_radix(s, 16).unwrap_or(DEFAULT_DATA_MEMORY_SIZE)
    }
}

impl Default for DataMemoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: default_data_memory_size(),
        }
    }
}

/// Capability flags of one Processing Element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeConfig {
    /// Publish the per-stage instruction snapshot every cycle.
    #[serde(default = "default_true")]
    pub instruction_tracking: bool,
    /// `SWI` halts the element and bumps its interrupt counter.
    #[serde(default = "default_true")]
    pub swi_halts: bool,
}

impl Default for PeConfig {
    fn default() -> Self {
        Self {
            instruction_tracking: true,
            swi_halts: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_data_memory_size() -> String {
    format!("{:#x}", DEFAULT_DATA_MEMORY_SIZE)
}

fn default_idle_sleep() -> u64 {
    IDLE_SLEEP_US
}

fn default_step_forever_sleep() -> u64 {
    STEP_FOREVER_SLEEP_US
}

fn default_server_poll() -> u64 {
    SERVER_POLL_US
}

fn default_responder_poll() -> u64 {
    RESPONDER_POLL_US
}

fn default_reload_timeout() -> u64 {
    RELOAD_TIMEOUT_MS
}
