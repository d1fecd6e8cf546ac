//! Processing Element control handle.
//!
//! A `PeHandle` is the capability a front end holds for one element. It
//! writes the element's command register and reads its telemetry; it never
//! touches pipeline state directly. Handles are cheap to clone and may be
//! used from any thread.
//!
//! Commands are not queued. Issuing a command while another is still
//! executing replaces it; callers that need a sequence of commands should
//! `wait_idle` in between.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::common::constants::{NUM_REGS, NUM_STAGES};
use crate::stats::PeStats;
use crate::sync::seqlock::Snapshot;
use crate::sync::shared::{ControlCommand, PeShared, SharedSystemState};

const WAIT_POLL: Duration = Duration::from_micros(50);

#[derive(Clone, Debug)]
pub struct PeHandle {
    id: usize,
    shared: Arc<SharedSystemState>,
}

impl PeHandle {
    /// Callers guarantee `id < NUM_PES`.
    pub(crate) fn new(id: usize, shared: Arc<SharedSystemState>) -> Self {
        Self { id, shared }
    }

    fn pe(&self) -> &PeShared {
        self.shared.pe(self.id)
    }

    fn issue(&self, cmd: ControlCommand) {
        let control = &self.pe().control;
        control.stop_requested.store(false, Ordering::Release);
        control.running.store(true, Ordering::Release);
        control.set_command(cmd);
        debug!("PE{} <- {:?}", self.id, cmd);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Reinitializes the element on its own thread.
    pub fn reset(&self) {
        self.issue(ControlCommand::Reset);
    }

    /// Executes one cycle.
    pub fn step(&self) {
        self.issue(ControlCommand::Step);
    }

    /// Executes `count` cycles, clamped to at least one. Stops early on a
    /// software interrupt or `stop_execution`.
    pub fn step_until(&self, count: u64) {
        self.pe()
            .control
            .step_count
            .store(count.max(1), Ordering::Release);
        self.issue(ControlCommand::StepUntil);
    }

    /// Executes cycles until a software interrupt or `stop_execution`.
    pub fn step_indefinitely(&self) {
        self.issue(ControlCommand::StepForever);
    }

    /// Asks the element to stop at the next cycle boundary.
    pub fn stop_execution(&self) {
        self.pe()
            .control
            .stop_requested
            .store(true, Ordering::Release);
    }

    /// True while a command is pending or executing.
    pub fn is_running(&self) -> bool {
        let control = &self.pe().control;
        control.running.load(Ordering::Acquire)
            || control.command() != Some(ControlCommand::Idle)
    }

    /// Polls until the element is idle.
    ///
    /// # Returns
    ///
    /// `false` if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_running() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(WAIT_POLL);
        }
        true
    }

    /// Consistent copy of the register file.
    pub fn registers(&self) -> Snapshot<NUM_REGS> {
        self.pe().registers.read()
    }

    /// Consistent copy of the instruction held by each stage (F, D, E, M, W).
    pub fn stages(&self) -> Snapshot<NUM_STAGES> {
        self.pe().tracking.read()
    }

    /// Software interrupts observed so far. Monotonic, never reset.
    pub fn swi_count(&self) -> u64 {
        self.pe().status.swi_count.load(Ordering::Acquire)
    }

    pub fn segfault(&self) -> bool {
        self.pe().status.segfault.load(Ordering::Acquire)
    }

    /// Current fetch address.
    pub fn pc(&self) -> u64 {
        self.pe().status.pc.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> PeStats {
        PeStats::capture(self.id, &self.pe().status)
    }
}
