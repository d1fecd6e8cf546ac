//! Cross-thread synchronization primitives.
//!
//! Everything shared between the PE threads, the instruction memory server
//! and observers lives here. All of it is lock-free: plain atomics for
//! single-writer handshakes and a sequence lock for multi-word snapshots.

/// Versioned-snapshot sequence lock.
pub mod seqlock;

/// The shared system state hub and its per-PE records.
pub mod shared;

pub use seqlock::{SeqLock, Snapshot};
pub use shared::{ControlCommand, PeShared, SharedSystemState};
