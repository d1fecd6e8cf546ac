//! Shared System State.
//!
//! The single cross-thread data hub. Created once by the orchestrator and
//! shared by `Arc` with every PE thread, the instruction memory server and
//! the data memory responder. Every field is atomic and every field has
//! exactly one writing thread, except the sequence locks, which carry
//! their own protocol.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use crate::common::constants::{NUM_PES, NUM_REGS, NUM_STAGES, UNSERVED_PC};
use crate::sync::seqlock::SeqLock;

/// Command register values driven by a PE handle and consumed by the
/// owning PE thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ControlCommand {
    /// Nothing to do; the thread sleeps between polls.
    #[default]
    Idle = 0,
    /// Execute exactly one cycle.
    Step = 1,
    /// Execute `step_count` cycles, one per loop iteration.
    StepUntil = 2,
    /// Execute cycles until a stop is requested.
    StepForever = 3,
    /// Reinitialize the pipeline, registers and hazard state.
    Reset = 4,
}

impl ControlCommand {
    /// Decodes a raw command register value. Unknown values yield `None`.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Idle),
            1 => Some(Self::Step),
            2 => Some(Self::StepUntil),
            3 => Some(Self::StepForever),
            4 => Some(Self::Reset),
            _ => None,
        }
    }
}

/// Fetch request/response channel between one PE and the instruction
/// memory server.
#[derive(Debug)]
pub struct InstructionPort {
    /// Fetch address published by the PE.
    pub pc: AtomicU64,
    /// Set by the server once `instruction` holds the word at `served_pc`.
    pub ready: AtomicBool,
    /// Last instruction word served.
    pub instruction: AtomicU64,
    /// Address `instruction` was read from.
    pub served_pc: AtomicU64,
}

impl InstructionPort {
    fn new() -> Self {
        Self {
            pc: AtomicU64::new(0),
            ready: AtomicBool::new(false),
            instruction: AtomicU64::new(0),
            served_pc: AtomicU64::new(UNSERVED_PC),
        }
    }

    /// Publishes a new fetch address.
    pub fn request(&self, pc: u64) {
        self.pc.store(pc, Ordering::Release);
    }

    /// Server side: publishes the word read from `addr`.
    pub fn serve(&self, addr: u64, instruction: u64) {
        self.ready.store(false, Ordering::Release);
        self.instruction.store(instruction, Ordering::Relaxed);
        self.served_pc.store(addr, Ordering::Release);
        self.ready.store(true, Ordering::Release);
    }

    /// Server side: forgets the last served word, e.g. across a reload.
    pub fn invalidate(&self) {
        self.ready.store(false, Ordering::Release);
        self.served_pc.store(UNSERVED_PC, Ordering::Release);
    }

    /// PE side: returns the word for `pc` if the server has answered it.
    pub fn response(&self, pc: u64) -> Option<u64> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }
        if self.served_pc.load(Ordering::Acquire) != pc {
            return None;
        }
        Some(self.instruction.load(Ordering::Relaxed))
    }
}

/// Data cache request/response channel for one PE.
///
/// Each request carries a sequence number; a response only counts for the
/// request whose sequence it echoes.
#[derive(Debug, Default)]
pub struct CachePort {
    pub address: AtomicU64,
    pub write_data: AtomicU64,
    pub write_enable: AtomicBool,
    /// Byte-granular access (LDRB/STRB).
    pub special: AtomicBool,
    pub request: AtomicBool,
    pub request_seq: AtomicU64,
    pub read_data: AtomicU64,
    pub ready: AtomicBool,
    pub ready_seq: AtomicU64,
}

/// A request as observed by the responder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheRequest {
    pub seq: u64,
    pub address: u64,
    pub write_data: u64,
    pub write_enable: bool,
    pub special: bool,
}

impl CachePort {
    /// PE side: asserts a request tagged with `seq`.
    pub fn publish(&self, seq: u64, address: u64, write_data: u64, write: bool, special: bool) {
        self.address.store(address, Ordering::Relaxed);
        self.write_data.store(write_data, Ordering::Relaxed);
        self.write_enable.store(write, Ordering::Relaxed);
        self.special.store(special, Ordering::Relaxed);
        self.request_seq.store(seq, Ordering::Release);
        self.request.store(true, Ordering::Release);
    }

    /// PE side: deasserts the request line.
    pub fn withdraw(&self) {
        self.request.store(false, Ordering::Release);
    }

    /// PE side: returns the response data if request `seq` has been answered.
    pub fn response(&self, seq: u64) -> Option<u64> {
        if !self.ready.load(Ordering::Acquire) {
            return None;
        }
        if self.ready_seq.load(Ordering::Acquire) != seq {
            return None;
        }
        Some(self.read_data.load(Ordering::Relaxed))
    }

    /// Responder side: returns the pending request, if any.
    pub fn pending(&self) -> Option<CacheRequest> {
        if !self.request.load(Ordering::Acquire) {
            return None;
        }
        let seq = self.request_seq.load(Ordering::Acquire);
        if self.ready.load(Ordering::Acquire) && self.ready_seq.load(Ordering::Acquire) == seq {
            return None;
        }
        Some(CacheRequest {
            seq,
            address: self.address.load(Ordering::Relaxed),
            write_data: self.write_data.load(Ordering::Relaxed),
            write_enable: self.write_enable.load(Ordering::Relaxed),
            special: self.special.load(Ordering::Relaxed),
        })
    }

    /// Responder side: answers request `seq`.
    pub fn complete(&self, seq: u64, read_data: u64) {
        self.ready.store(false, Ordering::Release);
        self.read_data.store(read_data, Ordering::Relaxed);
        self.ready_seq.store(seq, Ordering::Release);
        self.ready.store(true, Ordering::Release);
    }
}

/// Command register and run-state flags for one PE.
#[derive(Debug, Default)]
pub struct PeControl {
    pub command: AtomicU8,
    pub step_count: AtomicU64,
    pub running: AtomicBool,
    pub stop_requested: AtomicBool,
}

impl PeControl {
    pub fn command(&self) -> Option<ControlCommand> {
        ControlCommand::from_u8(self.command.load(Ordering::Acquire))
    }

    pub fn set_command(&self, cmd: ControlCommand) {
        self.command.store(cmd as u8, Ordering::Release);
    }

    /// Returns the command register to `Idle` if it still holds `cmd`.
    ///
    /// # Returns
    ///
    /// `true` if the swap happened, i.e. no newer command was issued.
    pub fn finish(&self, cmd: ControlCommand) -> bool {
        self.command
            .compare_exchange(
                cmd as u8,
                ControlCommand::Idle as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Per-PE status counters published by the PE thread.
#[derive(Debug, Default)]
pub struct PeStatus {
    pub pc: AtomicU64,
    pub segfault: AtomicBool,
    /// Software interrupts observed since construction. Never reset.
    pub swi_count: AtomicU64,
    pub cycles: AtomicU64,
    pub retired: AtomicU64,
    pub stalls_fetch: AtomicU64,
    pub stalls_data: AtomicU64,
    pub stalls_memory: AtomicU64,
    pub stalls_control: AtomicU64,
    pub stalls_segfault: AtomicU64,
}

/// Everything shared about one PE.
#[derive(Debug)]
pub struct PeShared {
    pub fetch: InstructionPort,
    pub cache: CachePort,
    pub control: PeControl,
    /// Register file mirror, updated on every register write.
    pub registers: SeqLock<NUM_REGS>,
    /// Instruction word held by each stage (F, D, E, M, W).
    pub tracking: SeqLock<NUM_STAGES>,
    pub status: PeStatus,
}

impl PeShared {
    fn new() -> Self {
        Self {
            fetch: InstructionPort::new(),
            cache: CachePort::default(),
            control: PeControl::default(),
            registers: SeqLock::default(),
            tracking: SeqLock::default(),
            status: PeStatus::default(),
        }
    }
}

/// The shared system state.
#[derive(Debug)]
pub struct SharedSystemState {
    pub pes: [PeShared; NUM_PES],
    /// Global shutdown flag observed by every background thread.
    pub stop: AtomicBool,
}

impl SharedSystemState {
    pub fn new() -> Self {
        Self {
            pes: std::array::from_fn(|_| PeShared::new()),
            stop: AtomicBool::new(false),
        }
    }

    /// Shared record of PE `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= NUM_PES`; callers validate indices up front.
    pub fn pe(&self, idx: usize) -> &PeShared {
        &self.pes[idx]
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

impl Default for SharedSystemState {
    fn default() -> Self {
        Self::new()
    }
}
