//! Pipeline stage implementations.
//!
//! Contains the five stages of the instruction pipeline:
//! - Fetch: Samples the instruction server response and selects the next PC
//! - Decode: Decodes, reads registers, checks the PC window, runs the hazard unit
//! - Execute: Performs ALU operations and evaluates branch conditions
//! - Memory: Drives the data cache channel
//! - Writeback: Writes results back to the register file
//!
//! Stages run in reverse order (Writeback first) and only write the `*_next`
//! latch values; the Processing Element commits them afterwards.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::decode_stage;
pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;
