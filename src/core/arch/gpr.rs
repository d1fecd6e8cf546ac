//! Register File.
//!
//! Each Processing Element has 12 fixed-purpose 64-bit registers:
//! `REG0` (hard-wired zero), `REG1`..`REG8` (general purpose), `PEID`
//! (the element's index, read-only), and `UPPER`/`LOWER`, the inclusive
//! bounds of the valid program-counter window.

use crate::common::constants::{NUM_REGS, REG_LOWER, REG_PEID, REG_UPPER, REG_ZERO};

/// Register file of one Processing Element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u64; NUM_REGS],
    pe_id: u64,
}

impl RegisterFile {
    /// Creates a register file in its reset state.
    ///
    /// # Arguments
    ///
    /// * `pe_id` - Value of the read-only `PEID` register
    pub fn new(pe_id: u64) -> Self {
        let mut rf = Self {
            regs: [0; NUM_REGS],
            pe_id,
        };
        rf.reset();
        rf
    }

    /// Restores reset values: everything zero except `PEID` and
    /// `LOWER = u64::MAX`, so the PC window initially covers all addresses.
    pub fn reset(&mut self) {
        self.regs = [0; NUM_REGS];
        self.regs[REG_PEID] = self.pe_id;
        self.regs[REG_LOWER] = u64::MAX;
    }

    /// Reads a register. Out-of-range indices read as 0.
    pub fn read(&self, idx: usize) -> u64 {
        self.regs.get(idx).copied().unwrap_or(0)
    }

    /// Writes a register.
    ///
    /// Writes to `REG0`, `PEID` or an out-of-range index are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the stored value was updated.
    pub fn write(&mut self, idx: usize, val: u64) -> bool {
        if Self::is_read_only(idx) || idx >= NUM_REGS {
            return false;
        }
        self.regs[idx] = val;
        true
    }

    /// Whether writes to `idx` are architecturally discarded.
    pub fn is_read_only(idx: usize) -> bool {
        idx == REG_ZERO || idx == REG_PEID
    }

    /// Lower end of the valid PC window.
    pub fn upper(&self) -> u64 {
        self.regs[REG_UPPER]
    }

    /// Upper end of the valid PC window.
    pub fn lower(&self) -> u64 {
        self.regs[REG_LOWER]
    }

    /// Checks `pc` against the inclusive `[UPPER, LOWER]` window.
    pub fn pc_in_bounds(&self, pc: u64) -> bool {
        pc >= self.upper() && pc <= self.lower()
    }

    pub fn values(&self) -> [u64; NUM_REGS] {
        self.regs
    }
}
