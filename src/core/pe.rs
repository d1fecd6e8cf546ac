//! Processing Element.
//!
//! One in-order, five-stage pipelined core. A single generic implementation
//! serves every element of the system; the element's index and its
//! capability flags (instruction tracking, software-interrupt handling)
//! are the only per-instance differences.
//!
//! # Cycle
//!
//! 1. Sample the instruction server response for the current PC.
//! 2. Run Writeback, Memory, Execute, Decode, Fetch in that order. Each
//!    stage reads the latch in front of it and writes a `*_next` value;
//!    Decode also evaluates the hazard unit.
//! 3. Commit all four latches, the flags and the PC, gated by the hazard
//!    signals.
//! 4. Publish status counters and, if enabled, the per-stage tracking
//!    snapshot.

/// Thread main loop driven by the command register.
pub mod runner;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use log::debug;

use crate::common::constants::{FLUSH_INSTRUCTION, NOP_INSTRUCTION, NUM_STAGES};
use crate::config::PeConfig;
use crate::core::arch::gpr::RegisterFile;
use crate::core::pipeline::hazards::{HazardKind, HazardSignals, HazardUnit};
use crate::core::pipeline::latches::{ExMem, IdEx, IfId, MemWb};
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage,
};
use crate::core::pipeline::traits::PipelineLatch;
use crate::core::units::flags::Flags;
use crate::sync::shared::{PeShared, SharedSystemState};

/// A Processing Element and all of its pipeline state.
///
/// Fields are public so the stage functions can operate on the element
/// directly; nothing outside the owning thread ever holds a reference.
pub struct ProcessingElement {
    /// Element index, also the value of the `PEID` register.
    pub id: usize,
    pub shared: Arc<SharedSystemState>,
    pub caps: PeConfig,
    /// Emit per-stage `trace!` records.
    pub trace: bool,

    pub regs: RegisterFile,
    /// Architectural NZCV flags.
    pub flags: Flags,
    /// Fetch address.
    pub pc: u64,
    /// Sticky until reset.
    pub segfault: bool,
    pub hazard: HazardUnit,

    pub if_id: IfId,
    pub id_ex: IdEx,
    pub ex_mem: ExMem,
    pub mem_wb: MemWb,

    pub if_id_next: IfId,
    pub id_ex_next: IdEx,
    pub ex_mem_next: ExMem,
    pub mem_wb_next: MemWb,
    pub pc_next: u64,
    pub signals: HazardSignals,

    /// Instruction server response for `pc`, sampled once per cycle.
    pub fetched: Option<u64>,
    pub cache_request: bool,
    pub cache_ready: bool,
    pub branch_taken_e: bool,
    pub branch_taken_w: bool,

    /// Tag of the last request published on the cache channel.
    pub published_seq: u64,
    /// The cache request line is currently asserted.
    pub request_live: bool,
    next_seq: u64,
}

impl ProcessingElement {
    /// Creates an element in its reset state and publishes that state.
    ///
    /// # Arguments
    ///
    /// * `id` - Element index (`0..NUM_PES`)
    /// * `shared` - The system's shared state
    /// * `caps` - Capability flags for this element
    /// * `trace` - Emit pipeline trace records
    pub fn new(id: usize, shared: Arc<SharedSystemState>, caps: PeConfig, trace: bool) -> Self {
        let mut pe = Self {
            id,
            shared,
            caps,
            trace,
            regs: RegisterFile::new(id as u64),
            flags: Flags::default(),
            pc: 0,
            segfault: false,
            hazard: HazardUnit::new(),
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            if_id_next: IfId::default(),
            id_ex_next: IdEx::default(),
            ex_mem_next: ExMem::default(),
            mem_wb_next: MemWb::default(),
            pc_next: 0,
            signals: HazardSignals::default(),
            fetched: None,
            cache_request: false,
            cache_ready: false,
            branch_taken_e: false,
            branch_taken_w: false,
            published_seq: 0,
            request_live: false,
            next_seq: 0,
        };
        pe.reset();
        pe
    }

    fn port(&self) -> &PeShared {
        self.shared.pe(self.id)
    }

    /// Reinitializes pipeline, registers, flags and hazard state in place.
    ///
    /// The cache transaction counter survives so that a response to a
    /// request issued before the reset can never match a later one.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.flags = Flags::default();
        self.pc = 0;
        self.pc_next = 0;
        self.segfault = false;
        self.hazard.reset();
        self.if_id = IfId::default();
        self.id_ex = IdEx::default();
        self.ex_mem = ExMem::default();
        self.mem_wb = MemWb::default();
        self.signals = HazardSignals::default();
        self.fetched = None;
        self.cache_request = false;
        self.cache_ready = false;
        self.branch_taken_e = false;
        self.branch_taken_w = false;
        self.request_live = false;

        let port = self.port();
        port.cache.withdraw();
        port.status.segfault.store(false, Ordering::Release);
        port.status.pc.store(0, Ordering::Release);
        port.registers.write(&self.regs.values());
        port.fetch.request(0);
        port.tracking.write(&[NOP_INSTRUCTION; NUM_STAGES]);
        debug!("PE{} reset", self.id);
    }

    /// Executes exactly one clock cycle.
    pub fn execute_cycle(&mut self) {
        self.fetched = self.port().fetch.response(self.pc);

        wb_stage(self);
        mem_stage(self);
        execute_stage(self);
        decode_stage(self);
        fetch_stage(self);

        let stages = [
            self.if_id_next.instruction(),
            self.if_id.instruction(),
            self.id_ex.instruction(),
            self.ex_mem.instruction(),
            self.mem_wb.instruction(),
        ];

        self.account();
        self.commit();

        if self.caps.instruction_tracking {
            self.port().tracking.write(&stages);
        }
    }

    /// Updates the status counters for the cycle just evaluated.
    fn account(&self) {
        let status = &self.port().status;
        status.cycles.fetch_add(1, Ordering::Relaxed);
        if !self.signals.stall_w && !self.mem_wb.is_bubble() {
            status.retired.fetch_add(1, Ordering::Relaxed);
        }
        let counter = match self.signals.cause {
            Some(HazardKind::Fetch) => &status.stalls_fetch,
            Some(HazardKind::Data) => &status.stalls_data,
            Some(HazardKind::Memory) => &status.stalls_memory,
            Some(HazardKind::Control) => &status.stalls_control,
            Some(HazardKind::Segfault) => &status.stalls_segfault,
            None => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Commits the next-state values.
    ///
    /// A stalled stage holds its input latch. The latch downstream of a
    /// stalled stage receives a bubble, so an instruction is never
    /// duplicated. A flushed latch receives the `FLUSH` marker.
    fn commit(&mut self) {
        let s = self.signals;

        let mem_wb = self
            .mem_wb
            .select(self.mem_wb_next, s.stall_w, s.stall_m.then_some(NOP_INSTRUCTION));

        let ex_mem_advances = !s.stall_m && !s.stall_e;
        let mut ex_mem = self
            .ex_mem
            .select(self.ex_mem_next, s.stall_m, s.stall_e.then_some(NOP_INSTRUCTION));
        if ex_mem_advances && ex_mem.valid {
            self.flags = ex_mem.flags;
            if ex_mem.ctrl.cache_request {
                self.next_seq += 1;
                ex_mem.seq = self.next_seq;
            }
        }

        let id_ex_squash = if s.flush_e {
            Some(FLUSH_INSTRUCTION)
        } else {
            s.stall_d.then_some(NOP_INSTRUCTION)
        };
        let id_ex = self.id_ex.select(self.id_ex_next, s.stall_e, id_ex_squash);

        let if_id_squash = if s.flush_d {
            Some(FLUSH_INSTRUCTION)
        } else {
            s.stall_f.then_some(NOP_INSTRUCTION)
        };
        let if_id = self.if_id.select(self.if_id_next, s.stall_d, if_id_squash);

        self.mem_wb = mem_wb;
        self.ex_mem = ex_mem;
        self.id_ex = id_ex;
        self.if_id = if_id;

        if !s.stall_f && self.pc_next != self.pc {
            self.pc = self.pc_next;
            let port = self.port();
            port.fetch.request(self.pc);
            port.status.pc.store(self.pc, Ordering::Release);
        }
    }
}
