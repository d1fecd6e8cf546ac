//! Processing Element core.
//!
//! This module contains the per-element architectural state, the pure
//! decode and compute units, the pipeline, and the element itself with its
//! thread loop.

/// Architectural register file.
pub mod arch;

/// Opcode to control-signal decode.
pub mod control;

/// The Processing Element and its thread runner.
pub mod pe;

/// Pipeline latches, signals, hazards, and stages.
pub mod pipeline;

/// Execution units (ALU, FPU, flags).
pub mod units;

pub use pe::ProcessingElement;
