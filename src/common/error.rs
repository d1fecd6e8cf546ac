//! Host-side error type.
//!
//! Errors raised by the simulator *infrastructure* (configuration, thread
//! management, image files). Conditions inside the simulated machine, such
//! as a segmentation fault or an invalid opcode, are never reported through
//! this type; they are absorbed by the pipeline and surfaced as telemetry.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while configuring, starting or controlling the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// A file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::Config`].
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A Processing Element index outside `0..NUM_PES` was requested.
    #[error("invalid processing element index {0}")]
    InvalidPe(usize),

    /// `initialize` was called on a system whose threads are already running.
    #[error("system already initialized")]
    AlreadyInitialized,

    /// An operation that needs running threads was called before `initialize`.
    #[error("system not initialized")]
    NotInitialized,

    /// The operating system refused to spawn a simulator thread.
    #[error("failed to spawn thread '{name}': {source}")]
    Spawn {
        /// Name of the thread that could not be started.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The instruction server did not acknowledge a reload in time.
    #[error("instruction memory reload timed out after {0} ms")]
    ReloadTimeout(u64),
}
