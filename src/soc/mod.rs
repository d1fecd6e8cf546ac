//! Memory-side components attached to the Processing Elements.
//!
//! * `instruction_memory`: the shared instruction server thread.
//! * `data_memory`: a reference responder for the per-PE cache channels.
//! * `traits`: the storage interface behind the data responder.

/// Reference data-cache responder.
pub mod data_memory;

/// Instruction memory server.
pub mod instruction_memory;

/// Storage interface for data-memory backends.
pub mod traits;

pub use data_memory::{DataMemory, DataRam};
pub use instruction_memory::{ImageSource, InstructionMemoryServer};
pub use traits::DataBackend;
