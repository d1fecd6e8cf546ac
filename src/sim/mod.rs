//! System orchestration.
//!
//! * `system`: builds the shared state, the memory-side threads and the
//!   four Processing Element threads, and tears them down again.
//! * `handle`: the per-element control surface handed to front ends.
//! * `loader`: instruction image helpers.

/// Per-element control handle.
pub mod handle;

/// Instruction image loading.
pub mod loader;

/// The multi-core system.
pub mod system;

pub use handle::PeHandle;
pub use system::CpuSystem;
