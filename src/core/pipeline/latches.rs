//! Pipeline latch structures for inter-stage communication.
//!
//! Each latch holds exactly one instruction slot. Stages read the latch in
//! front of them and produce the next value of the latch behind them; the
//! Processing Element commits all four next values at the end of the cycle.
//!
//! A latch whose `valid` flag is clear holds a bubble. Bubbles carry a
//! marker instruction word (`NOP` or `FLUSH`) so that instruction tracking
//! can show why the slot is empty.

use crate::common::constants::NOP_INSTRUCTION;
use crate::core::pipeline::signals::ControlSignals;
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::flags::Flags;

/// IF/ID latch (Fetch to Decode).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IfId {
    /// Address the instruction was fetched from.
    pub pc: u64,
    /// Raw 64-bit instruction word.
    pub inst: u64,
    /// Slot holds a fetched instruction rather than a bubble.
    pub valid: bool,
}

/// ID/EX latch (Decode to Execute).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdEx {
    pub pc: u64,
    pub inst: u64,
    pub valid: bool,
    /// Decoded control signals.
    pub ctrl: ControlSignals,
    /// Destination register index.
    pub rd: usize,
    /// ALU operand A.
    pub a: u64,
    /// ALU operand B.
    pub b: u64,
    /// Value of `Rm`, stored by STR/STRB.
    pub store_data: u64,
}

/// EX/MEM latch (Execute to Memory).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExMem {
    pub pc: u64,
    pub inst: u64,
    pub valid: bool,
    pub ctrl: ControlSignals,
    pub rd: usize,
    /// ALU result: data value, effective address or branch target.
    pub alu: u64,
    pub store_data: u64,
    /// Branch condition held in Execute.
    pub branch_taken: bool,
    /// Architectural flags after this instruction.
    pub flags: Flags,
    /// Cache transaction tag, assigned when the entry is latched.
    pub seq: u64,
}

/// MEM/WB latch (Memory to Writeback).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemWb {
    pub pc: u64,
    pub inst: u64,
    pub valid: bool,
    pub ctrl: ControlSignals,
    pub rd: usize,
    pub alu: u64,
    /// Data returned by the cache for loads.
    pub mem_data: u64,
    pub branch_taken: bool,
}

impl PipelineLatch for IfId {
    fn bubble(marker: u64) -> Self {
        Self {
            pc: 0,
            inst: marker,
            valid: false,
        }
    }

    fn instruction(&self) -> u64 {
        self.inst
    }

    fn is_bubble(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for IdEx {
    fn bubble(marker: u64) -> Self {
        Self {
            pc: 0,
            inst: marker,
            valid: false,
            ctrl: ControlSignals::default(),
            rd: 0,
            a: 0,
            b: 0,
            store_data: 0,
        }
    }

    fn instruction(&self) -> u64 {
        self.inst
    }

    fn is_bubble(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for ExMem {
    fn bubble(marker: u64) -> Self {
        Self {
            pc: 0,
            inst: marker,
            valid: false,
            ctrl: ControlSignals::default(),
            rd: 0,
            alu: 0,
            store_data: 0,
            branch_taken: false,
            flags: Flags::default(),
            seq: 0,
        }
    }

    fn instruction(&self) -> u64 {
        self.inst
    }

    fn is_bubble(&self) -> bool {
        !self.valid
    }
}

impl PipelineLatch for MemWb {
    fn bubble(marker: u64) -> Self {
        Self {
            pc: 0,
            inst: marker,
            valid: false,
            ctrl: ControlSignals::default(),
            rd: 0,
            alu: 0,
            mem_data: 0,
            branch_taken: false,
        }
    }

    fn instruction(&self) -> u64 {
        self.inst
    }

    fn is_bubble(&self) -> bool {
        !self.valid
    }
}

macro_rules! default_bubble {
    ($($latch:ty),*) => {
        $(impl Default for $latch {
            fn default() -> Self {
                <$latch as PipelineLatch>::bubble(NOP_INSTRUCTION)
            }
        })*
    };
}

default_bubble!(IfId, IdEx, ExMem, MemWb);
