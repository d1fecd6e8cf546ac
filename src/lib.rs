//! Thread-Level-Parallel CPU Simulator Library.
//!
//! This crate simulates a small multi-core processor: four independent
//! Processing Elements, each a 5-stage in-order pipeline running on its own
//! OS thread, fed by a shared instruction memory server and an optional
//! data-memory responder. All cross-thread communication goes through
//! lock-free atomics in a single shared state record.
//!
//! # Architecture
//!
//! * **Core**: 5-stage pipeline (Fetch, Decode, Execute, Memory, Writeback)
//!   with stall/flush hazard control and no forwarding.
//! * **Memory**: instruction server thread with hot reload; reference data
//!   responder on the per-element cache channel.
//! * **Telemetry**: seqlock-published register and stage snapshots, atomic
//!   counters.
//!
//! # Modules
//!
//! * `common`: Constants, access types, and error handling.
//! * `config`: Configuration loading and parsing.
//! * `core`: Processing Element implementation.
//! * `isa`: Opcodes, instruction fields, and the disassembler.
//! * `sim`: System orchestration, control handles, and image loading.
//! * `soc`: Instruction and data memory threads.
//! * `stats`: Per-element statistics.
//! * `sync`: Seqlock and shared system state.

/// Architectural constants, access classification, and the host-side error
/// type.
pub mod common;

/// Configuration system for timing, data memory, and per-element
/// capabilities.
///
/// Loads and parses TOML configuration files; every field has a default.
pub mod config;

/// Processing Element implementation including pipeline stages and
/// execution units.
///
/// Implements the 5-stage in-order pipeline, the register file, the control
/// unit, the ALU/FPU, and the hazard unit.
pub mod core;

/// Instruction Set Architecture definitions.
///
/// Opcode table, instruction word field access and encoding, and the
/// disassembler.
pub mod isa;

/// System orchestration, per-element handles, and image loaders.
pub mod sim;

/// Instruction memory server and data-memory responder.
pub mod soc;

/// Per-element statistics snapshot and reporting.
pub mod stats;

/// Lock-free cross-thread state.
///
/// The seqlock used for multi-word telemetry and the shared system state
/// holding every per-element channel.
pub mod sync;
