//! Per-element statistics reporting.
//!
//! Each Processing Element publishes atomic counters in its shared status
//! record. `PeStats` is a point-in-time copy of those counters with the
//! derived ratios used by the report.

use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::sync::shared::PeStatus;

/// Snapshot of one element's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeStats {
    pub pe: usize,
    pub pc: u64,
    pub segfault: bool,
    pub swi_count: u64,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub stalls_fetch: u64,
    pub stalls_data: u64,
    pub stalls_memory: u64,
    pub stalls_control: u64,
    pub stalls_segfault: u64,
}

impl PeStats {
    /// Copies the counters of element `pe`.
    pub fn capture(pe: usize, status: &PeStatus) -> Self {
        Self {
            pe,
            pc: status.pc.load(Ordering::Acquire),
            segfault: status.segfault.load(Ordering::Acquire),
            swi_count: status.swi_count.load(Ordering::Acquire),
            cycles: status.cycles.load(Ordering::Relaxed),
            instructions_retired: status.retired.load(Ordering::Relaxed),
            stalls_fetch: status.stalls_fetch.load(Ordering::Relaxed),
            stalls_data: status.stalls_data.load(Ordering::Relaxed),
            stalls_memory: status.stalls_memory.load(Ordering::Relaxed),
            stalls_control: status.stalls_control.load(Ordering::Relaxed),
            stalls_segfault: status.stalls_segfault.load(Ordering::Relaxed),
        }
    }

    /// Cycles per retired instruction, 0.0 before anything retires.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            return 0.0;
        }
        self.cycles as f64 / self.instructions_retired as f64
    }

    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.instructions_retired as f64 / self.cycles as f64
    }

    /// Prints a formatted summary of the counters.
    pub fn print(&self) {
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };
        let pct = |n: u64| (n as f64 / cyc as f64) * 100.0;

        println!("\n==========================================================");
        println!("PE{} STATISTICS", self.pe);
        println!("==========================================================");
        println!("pc                       {:#x}", self.pc);
        println!("segfault                 {}", self.segfault);
        println!("swi_count                {}", self.swi_count);
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("sim_cpi                  {:.4}", self.cpi());
        println!("----------------------------------------------------------");
        println!("STALL BREAKDOWN");
        println!(
            "  stalls.fetch           {} ({:.2}%)",
            self.stalls_fetch,
            pct(self.stalls_fetch)
        );
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data)
        );
        println!(
            "  stalls.memory          {} ({:.2}%)",
            self.stalls_memory,
            pct(self.stalls_memory)
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            pct(self.stalls_control)
        );
        println!(
            "  stalls.segfault        {} ({:.2}%)",
            self.stalls_segfault,
            pct(self.stalls_segfault)
        );
        println!("==========================================================");
    }
}
