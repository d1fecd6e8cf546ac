//! Versioned-Snapshot Sequence Lock.
//!
//! A `SeqLock` publishes a fixed-size array of 64-bit words from a single
//! writer thread to any number of readers without blocking the writer.
//!
//! The version counter is odd while a publish is in progress and even when
//! the contents are stable. A reader copies all words between two loads of
//! the version and retries unless both loads returned the same even value,
//! so it can never return a mix of two publishes.
//!
//! Memory ordering follows the fence-based formulation: the writer issues a
//! release fence after marking the version odd and a release store when
//! marking it even again; the reader issues an acquire fence between its
//! data loads and the second version load.

use std::hint;
use std::sync::atomic::{fence, AtomicU64, Ordering};

/// A consistent copy of the values guarded by a [`SeqLock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot<const N: usize> {
    /// Version the snapshot was taken at. Always even.
    pub version: u64,
    /// The published values.
    pub values: [u64; N],
}

/// Single-writer, multi-reader sequence lock over `N` words.
///
/// Only one thread may call the write methods at a time. In this simulator
/// that is always the owning PE thread.
#[derive(Debug)]
pub struct SeqLock<const N: usize> {
    version: AtomicU64,
    slots: [AtomicU64; N],
}

impl<const N: usize> SeqLock<N> {
    /// Creates a sequence lock at version 0 holding `initial`.
    pub fn new(initial: [u64; N]) -> Self {
        Self {
            version: AtomicU64::new(0),
            slots: std::array::from_fn(|i| AtomicU64::new(initial[i])),
        }
    }

    /// Opens a write window and returns the version it will close at.
    fn begin_write(&self) -> u64 {
        let v = self.version.load(Ordering::Relaxed);
        debug_assert!(v % 2 == 0, "concurrent seqlock writers");
        self.version.store(v.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        v.wrapping_add(2)
    }

    fn end_write(&self, closing: u64) {
        self.version.store(closing, Ordering::Release);
    }

    /// Publishes a complete new set of values.
    pub fn write(&self, values: &[u64; N]) {
        let closing = self.begin_write();
        for (slot, &v) in self.slots.iter().zip(values.iter()) {
            slot.store(v, Ordering::Relaxed);
        }
        self.end_write(closing);
    }

    /// Publishes a single changed value, leaving the others untouched.
    ///
    /// Out-of-range indices are ignored.
    pub fn write_slot(&self, idx: usize, value: u64) {
        let Some(slot) = self.slots.get(idx) else {
            return;
        };
        let closing = self.begin_write();
        slot.store(value, Ordering::Relaxed);
        self.end_write(closing);
    }

    /// Makes a single attempt at a consistent read.
    ///
    /// # Returns
    ///
    /// `None` if a write was in progress or completed during the copy.
    pub fn try_read(&self) -> Option<Snapshot<N>> {
        let before = self.version.load(Ordering::Acquire);
        if before % 2 == 1 {
            return None;
        }
        let values: [u64; N] = std::array::from_fn(|i| self.slots[i].load(Ordering::Relaxed));
        fence(Ordering::Acquire);
        let after = self.version.load(Ordering::Relaxed);
        (before == after).then_some(Snapshot {
            version: before,
            values,
        })
    }

    /// Reads a consistent snapshot, spinning until no write overlaps the copy.
    pub fn read(&self) -> Snapshot<N> {
        loop {
            if let Some(snapshot) = self.try_read() {
                return snapshot;
            }
            hint::spin_loop();
        }
    }

    /// Current version counter. Odd while a write is in progress.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl<const N: usize> Default for SeqLock<N> {
    fn default() -> Self {
        Self::new([0; N])
    }
}
