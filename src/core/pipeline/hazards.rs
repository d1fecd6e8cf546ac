//! Hazard Detection Unit.
//!
//! Computes the per-stage stall and flush signals for one cycle. There is
//! no forwarding network: a read-after-write dependency always stalls
//! until the producer has written back. The unit is stateful only for
//! branches, which hold Fetch across several cycles until the branch's
//! outcome is confirmed in Writeback.

use log::trace;

/// Cause of the hazard that won priority this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    /// PC left the `[UPPER, LOWER]` window.
    Segfault,
    /// Instruction word not yet served.
    Fetch,
    /// Data cache request outstanding.
    Memory,
    /// Read-after-write dependency.
    Data,
    /// Branch in flight.
    Control,
}

/// Per-cycle inputs sampled from the latches and the memory channels.
#[derive(Clone, Copy, Debug, Default)]
pub struct HazardInputs {
    /// Fetch response for the current PC is available.
    pub fetch_ready: bool,
    /// The instruction in Memory has a cache request asserted.
    pub cache_request: bool,
    /// That request has been answered.
    pub cache_ready: bool,
    /// Sticky segmentation fault.
    pub segfault: bool,
    /// The instruction in Decode is a branch.
    pub branch_in_decode: bool,
    /// A branch in Execute evaluated taken this cycle.
    pub branch_taken_e: bool,
    /// A taken branch is in Writeback this cycle.
    pub branch_taken_w: bool,
    /// Registers read by the instruction in Decode.
    pub sources: [Option<usize>; 2],
    /// Destination register in Execute and whether it will be written.
    pub rd_e: usize,
    pub reg_write_e: bool,
    /// Destination register in Memory and whether it will be written.
    pub rd_m: usize,
    pub reg_write_m: bool,
}

/// Stall and flush outputs for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HazardSignals {
    pub stall_f: bool,
    pub stall_d: bool,
    pub stall_e: bool,
    pub stall_m: bool,
    pub stall_w: bool,
    pub flush_d: bool,
    pub flush_e: bool,
    /// Which rule produced these signals, if any.
    pub cause: Option<HazardKind>,
}

impl HazardSignals {
    fn stall_all(cause: HazardKind) -> Self {
        Self {
            stall_f: true,
            stall_d: true,
            stall_e: true,
            stall_m: true,
            stall_w: true,
            cause: Some(cause),
            ..Self::default()
        }
    }
}

/// Progress of the branch currently being resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchState {
    #[default]
    Idle,
    /// The branch left Decode last cycle and is now in Execute.
    Executing,
    /// The branch was taken; waiting for it to reach Writeback.
    AwaitingWriteback,
}

/// Hazard detection unit.
#[derive(Debug, Default)]
pub struct HazardUnit {
    branch: BranchState,
    branch_cycles: u32,
}

impl HazardUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets any in-flight branch.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn branch_state(&self) -> BranchState {
        self.branch
    }

    /// Checks for a read-after-write dependency on Execute or Memory.
    ///
    /// The zero register never creates a dependency.
    pub fn raw_hazard(inputs: &HazardInputs) -> bool {
        inputs.sources.iter().flatten().any(|&src| {
            src != 0
                && ((inputs.reg_write_e && inputs.rd_e == src)
                    || (inputs.reg_write_m && inputs.rd_m == src))
        })
    }

    /// Evaluates the hazard rules for one cycle.
    ///
    /// Rules are checked in priority order and the first match wins:
    /// segmentation fault, fetch latency, cache latency, RAW, branch.
    /// The branch sequence only advances on cycles in which none of the
    /// higher-priority rules fired.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Signals sampled this cycle
    ///
    /// # Returns
    ///
    /// The stall/flush signals to apply at commit.
    pub fn detect(&mut self, inputs: &HazardInputs) -> HazardSignals {
        if inputs.segfault {
            return HazardSignals::stall_all(HazardKind::Segfault);
        }

        // A branch in Execute that is not taken needs nothing further,
        // whatever else stalls this cycle.
        if self.branch == BranchState::Executing && !inputs.branch_taken_e {
            trace!("branch not taken after {} cycles", self.branch_cycles + 1);
            self.branch = BranchState::Idle;
        }

        let cache_stall = inputs.cache_request && !inputs.cache_ready;

        if self.fetch_blocks(inputs) {
            // A fetch stall alone would let an unanswered load leave Memory.
            if cache_stall {
                return HazardSignals::stall_all(HazardKind::Memory);
            }
            return HazardSignals {
                stall_f: true,
                stall_d: true,
                cause: Some(HazardKind::Fetch),
                ..HazardSignals::default()
            };
        }

        if cache_stall {
            return HazardSignals::stall_all(HazardKind::Memory);
        }

        if Self::raw_hazard(inputs) {
            trace!(
                "RAW hazard: sources {:?} vs E=r{}({}) M=r{}({})",
                inputs.sources,
                inputs.rd_e,
                inputs.reg_write_e,
                inputs.rd_m,
                inputs.reg_write_m
            );
            return HazardSignals {
                stall_f: true,
                stall_d: true,
                flush_e: true,
                cause: Some(HazardKind::Data),
                ..HazardSignals::default()
            };
        }

        self.branch_step(inputs)
    }

    /// Whether an unanswered fetch must hold Fetch and Decode.
    ///
    /// While a taken branch is in flight the word at the current PC is
    /// discarded anyway; waiting for it would only let the branch slip
    /// past the cycle that redirects the PC.
    fn fetch_blocks(&self, inputs: &HazardInputs) -> bool {
        !inputs.fetch_ready && self.branch == BranchState::Idle
    }

    fn branch_step(&mut self, inputs: &HazardInputs) -> HazardSignals {
        let hold = HazardSignals {
            stall_f: true,
            flush_d: true,
            cause: Some(HazardKind::Control),
            ..HazardSignals::default()
        };

        match self.branch {
            BranchState::Idle if inputs.branch_in_decode => {
                self.branch = BranchState::Executing;
                self.branch_cycles = 1;
                hold
            }
            BranchState::Idle => HazardSignals::default(),
            BranchState::Executing => {
                // Only reachable when the branch in Execute was taken.
                self.branch_cycles += 1;
                self.branch = BranchState::AwaitingWriteback;
                hold
            }
            BranchState::AwaitingWriteback => {
                self.branch_cycles += 1;
                if inputs.branch_taken_w {
                    trace!("branch taken, released after {} cycles", self.branch_cycles);
                    self.branch = BranchState::Idle;
                    HazardSignals {
                        flush_d: true,
                        cause: Some(HazardKind::Control),
                        ..HazardSignals::default()
                    }
                } else {
                    hold
                }
            }
        }
    }
}
