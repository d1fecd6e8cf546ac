//! Shared helpers for the end-to-end tests.

#![allow(dead_code)]

use std::thread;
use std::time::{Duration, Instant};

use cpu_tlp_sim::common::constants::{REG_LOWER, REG_PEID, REG_UPPER};
use cpu_tlp_sim::config::Config;
use cpu_tlp_sim::isa::opcodes as op;
use cpu_tlp_sim::isa::Instruction;
use cpu_tlp_sim::sim::{loader, CpuSystem, PeHandle};

pub const REG1: usize = 1;
pub const REG2: usize = 2;
pub const REG3: usize = 3;
pub const REG4: usize = 4;
pub const REG5: usize = 5;
pub const PEID: usize = REG_PEID;
pub const UPPER: usize = REG_UPPER;
pub const LOWER: usize = REG_LOWER;

/// Generous bound for any single command to finish.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration with fast polling so tests do not wait on idle sleeps.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.timing.idle_sleep_us = 20;
    config.timing.step_forever_sleep_us = 0;
    config
}

/// Starts a system serving `program` from memory.
pub fn start(config: Config, program: &[Instruction]) -> CpuSystem {
    let mut system = CpuSystem::with_image(config, loader::image_from_instructions(program));
    system.initialize().expect("initialize");
    system
}

/// Waits for the handle's current command to finish.
pub fn wait(handle: &PeHandle) {
    assert!(
        handle.wait_idle(TIMEOUT),
        "PE{} did not return to idle",
        handle.id()
    );
}

/// Polls `cond` until it holds or `TIMEOUT` elapses.
pub fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while !cond() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_micros(100));
    }
    true
}

/// Runs until the element halts on SWI.
pub fn run_to_halt(handle: &PeHandle) {
    handle.step_indefinitely();
    wait(handle);
}

/// `MOVI REG1,#1; MOVI REG2,#0; <body>; ADDI REG1,REG1,#1; CMPI REG1,#11;
/// BLT <body>; SWI`
pub fn counting_loop(body: Instruction) -> Vec<Instruction> {
    vec![
        Instruction::rri(op::MOVI, REG1, 0, 1),
        Instruction::rri(op::MOVI, REG2, 0, 0),
        body,
        Instruction::rri(op::ADDI, REG1, REG1, 1),
        Instruction::rri(op::CMPI, 0, REG1, 11),
        Instruction::branch(op::BLT, -24),
        Instruction::swi(),
    ]
}

/// The loop accumulating `REG2 += REG1` for `REG1 = 1..=10`.
pub fn sum_program() -> Vec<Instruction> {
    counting_loop(Instruction::rrr(op::ADD, REG2, REG2, REG1))
}

/// The loop incrementing `REG2` once per iteration.
pub fn count_program() -> Vec<Instruction> {
    counting_loop(Instruction::rri(op::ADDI, REG2, REG2, 1))
}

/// The same loop with `BLT` re-entering at `MOVI REG2,#0`, so every pass
/// restarts the sum and REG2 ends at the last REG1 added, 10.
pub fn restarting_sum_program() -> Vec<Instruction> {
    let mut program = sum_program();
    program[5] = Instruction::branch(op::BLT, -32);
    program
}

/// A unique scratch path under the system temp directory.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tlpsim-{}-{}.bin", name, std::process::id()))
}
