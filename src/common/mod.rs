//! Common utilities and types used throughout the multi-core simulator.
//!
//! This module provides the architectural constants shared by every
//! Processing Element, the host-side error type, and the classification
//! of data-memory accesses travelling over the cache channel.

/// Architectural constants (register indices, sentinel instruction words).
pub mod constants;

/// Data-memory access classification.
pub mod data;

/// Host-side error type.
pub mod error;

pub use constants::{
    ERROR_INSTRUCTION, FLUSH_INSTRUCTION, NOP_INSTRUCTION, NUM_PES, NUM_REGS, NUM_STAGES,
};
pub use data::{AccessType, AccessWidth};
pub use error::SimError;
