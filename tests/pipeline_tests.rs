//! Cycle-level pipeline tests.
//!
//! These drive a `ProcessingElement` directly on the test thread and play
//! the memory side themselves: before every cycle the current fetch address
//! is served and any pending cache request is answered, so every fetch and
//! memory access completes with fixed latency.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use cpu_tlp_sim::config::PeConfig;
use cpu_tlp_sim::core::pe::ProcessingElement;
use cpu_tlp_sim::common::constants::{FLUSH_INSTRUCTION, NOP_INSTRUCTION, REG_LOWER};
use cpu_tlp_sim::core::pe::runner::{dispatch, Dispatch};
use cpu_tlp_sim::core::pipeline::latches::{IfId, MemWb};
use cpu_tlp_sim::core::pipeline::signals::ControlSignals;
use cpu_tlp_sim::core::pipeline::traits::PipelineLatch;
use cpu_tlp_sim::isa::opcodes as op;
use cpu_tlp_sim::isa::Instruction;
use cpu_tlp_sim::sim::loader;
use cpu_tlp_sim::soc::data_memory::service;
use cpu_tlp_sim::soc::instruction_memory::fetch_word;
use cpu_tlp_sim::soc::DataRam;
use cpu_tlp_sim::sync::shared::{ControlCommand, PeControl, SharedSystemState};

struct Bench {
    pe: ProcessingElement,
    shared: Arc<SharedSystemState>,
    image: Vec<u8>,
    ram: DataRam,
}

impl Bench {
    fn new(program: &[Instruction]) -> Self {
        let shared = Arc::new(SharedSystemState::new());
        let pe = ProcessingElement::new(0, Arc::clone(&shared), PeConfig::default(), false);
        Self {
            pe,
            shared,
            image: loader::image_from_instructions(program),
            ram: DataRam::new(1024),
        }
    }

    /// Answers the pending fetch and cache request.
    fn serve(&mut self) {
        let port = self.shared.pe(0);
        let pc = port.fetch.pc.load(Ordering::Acquire);
        if port.fetch.response(pc).is_none() {
            port.fetch.serve(pc, fetch_word(&self.image, pc));
        }
        if let Some(req) = port.cache.pending() {
            let data = service(&mut self.ram, 0, &req);
            port.cache.complete(req.seq, data);
        }
    }

    fn cycle(&mut self) {
        self.serve();
        self.pe.execute_cycle();
    }

    /// Serves and services the command register once.
    fn dispatch(&mut self) -> Dispatch {
        self.serve();
        let shared = Arc::clone(&self.shared);
        dispatch(&mut self.pe, &shared.pe(0).control)
    }

    fn control(&self) -> &PeControl {
        &self.shared.pe(0).control
    }

    /// Issues a command the way a front end does.
    fn issue(&self, cmd: ControlCommand) {
        let control = self.control();
        control.stop_requested.store(false, Ordering::Release);
        control.running.store(true, Ordering::Release);
        control.set_command(cmd);
    }

    fn cycles(&self) -> u64 {
        self.status(|s| s.cycles.load(Ordering::Relaxed))
    }

    fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.cycle();
        }
    }

    fn reg(&self, idx: usize) -> u64 {
        self.pe.regs.read(idx)
    }

    fn status(&self, f: impl Fn(&cpu_tlp_sim::sync::shared::PeStatus) -> u64) -> u64 {
        f(&self.shared.pe(0).status)
    }
}

/// Tests latch commit selection.
#[test]
fn test_latch_select() {
    let cur = IfId {
        pc: 8,
        inst: 1,
        valid: true,
    };
    let next = IfId {
        pc: 16,
        inst: 2,
        valid: true,
    };
    assert_eq!(cur.select(next, false, None), next);
    assert_eq!(cur.select(next, true, Some(FLUSH_INSTRUCTION)), cur);

    let flushed = cur.select(next, false, Some(FLUSH_INSTRUCTION));
    assert!(flushed.is_bubble());
    assert_eq!(flushed.instruction(), FLUSH_INSTRUCTION);
    assert_eq!(IfId::default().instruction(), NOP_INSTRUCTION);
}

/// Tests the five-cycle latency of a single instruction.
#[test]
fn test_writeback_latency() {
    let mut bench = Bench::new(&[Instruction::rri(op::MOVI, 1, 0, 1)]);
    bench.run(4);
    assert_eq!(bench.reg(1), 0);
    bench.cycle();
    assert_eq!(bench.reg(1), 1);
    assert_eq!(bench.shared.pe(0).registers.read().values[1], 1);
}

/// Tests that a RAW dependency stalls until the producer writes back.
#[test]
fn test_raw_stall_cycles() {
    let mut bench = Bench::new(&[
        Instruction::rri(op::MOVI, 1, 0, 5),
        Instruction::rrr(op::ADD, 2, 1, 1),
    ]);
    bench.run(7);
    assert_eq!(bench.reg(2), 0);
    bench.cycle();
    assert_eq!(bench.reg(2), 10);
    assert_eq!(bench.status(|s| s.stalls_data.load(Ordering::Relaxed)), 2);
}

/// Tests that a taken branch skips the fall-through instruction.
#[test]
fn test_taken_branch() {
    let mut bench = Bench::new(&[
        Instruction::branch(op::B, 16),
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::rri(op::MOVI, 2, 0, 2),
    ]);
    bench.run(9);
    assert_eq!(bench.reg(2), 0);
    bench.cycle();
    assert_eq!(bench.reg(2), 2);
    assert_eq!(bench.reg(1), 0);
    assert_eq!(bench.status(|s| s.stalls_control.load(Ordering::Relaxed)), 4);

    bench.run(10);
    assert_eq!(bench.reg(1), 0);
}

/// Tests that a not-taken branch costs one cycle and falls through.
#[test]
fn test_not_taken_branch() {
    let mut bench = Bench::new(&[
        Instruction::branch(op::BEQ, 16),
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::rri(op::MOVI, 2, 0, 2),
    ]);
    bench.run(20);
    assert_eq!(bench.reg(1), 1);
    assert_eq!(bench.reg(2), 2);
    assert_eq!(bench.status(|s| s.stalls_control.load(Ordering::Relaxed)), 1);
}

/// Tests that each memory access stalls for exactly the response latency.
#[test]
fn test_load_store_latency() {
    let mut bench = Bench::new(&[
        Instruction::rri(op::MOVI, 1, 0, 64),
        Instruction::store(op::STR, 1, 1, 0),
        Instruction::load(op::LDR, 2, 1, 0),
    ]);
    bench.run(40);
    assert_eq!(bench.reg(2), 64);
    assert_eq!(bench.status(|s| s.stalls_memory.load(Ordering::Relaxed)), 2);
}

/// Tests the accumulating loop at cycle level.
#[test]
fn test_sum_loop() {
    let program = vec![
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::rri(op::MOVI, 2, 0, 0),
        Instruction::rrr(op::ADD, 2, 2, 1),
        Instruction::rri(op::ADDI, 1, 1, 1),
        Instruction::rri(op::CMPI, 0, 1, 11),
        Instruction::branch(op::BLT, -24),
        Instruction::swi(),
    ];
    let mut bench = Bench::new(&program);

    let mut cycles = 0;
    while bench.status(|s| s.swi_count.load(Ordering::Acquire)) == 0 {
        assert!(cycles < 1_000, "loop did not reach SWI");
        bench.cycle();
        cycles += 1;
    }
    assert_eq!(bench.reg(1), 11);
    assert_eq!(bench.reg(2), 55);
    assert!(bench.shared.pe(0).control.stop_requested.load(Ordering::Acquire));
}

/// Tests that INC and DEC read and write the destination register.
#[test]
fn test_inc_dec() {
    let mut bench = Bench::new(&[
        Instruction::rri(op::MOVI, 3, 0, 7),
        Instruction::rri(op::INC, 3, 0, 0),
        Instruction::rri(op::INC, 3, 0, 0),
        Instruction::rri(op::DEC, 4, 0, 0),
    ]);
    bench.run(40);
    assert_eq!(bench.reg(3), 9);
    assert_eq!(bench.reg(4), u64::MAX);
}

/// Tests float arithmetic through the pipeline.
#[test]
fn test_float_pipeline() {
    let mut bench = Bench::new(&[
        Instruction::rrf(op::FMOVI, 1, 0, 1.5),
        Instruction::rrf(op::FADDI, 2, 1, 2.25),
        Instruction::rrr(op::FMUL, 3, 2, 2),
        Instruction::rrr(op::CDTI, 4, 0, 3),
    ]);
    bench.run(60);
    assert_eq!(f64::from_bits(bench.reg(2)), 3.75);
    assert_eq!(f64::from_bits(bench.reg(3)), 14.0625);
    assert_eq!(bench.reg(4), 14);
}

/// Tests the segmentation fault freeze and reset.
#[test]
fn test_segfault_freezes_pc() {
    let mut program = vec![Instruction::rri(op::MOVI, 11, 0, 8)];
    program.extend(std::iter::repeat(Instruction::nop()).take(8));
    let mut bench = Bench::new(&program);

    bench.run(20);
    assert!(bench.pe.segfault);
    let pc = bench.pe.pc;
    bench.run(20);
    assert_eq!(bench.pe.pc, pc);

    bench.pe.reset();
    assert!(!bench.pe.segfault);
    assert_eq!(bench.pe.pc, 0);
    assert!(!bench.shared.pe(0).status.segfault.load(Ordering::Acquire));
}

/// Tests that a window ending exactly at the last instruction does not
/// fault on the address prefetched past it.
#[test]
fn test_window_ending_at_swi() {
    let program = vec![
        Instruction::rri(op::MOVI, REG_LOWER, 0, 0x30),
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::rri(op::MOVI, 2, 0, 2),
        Instruction::rri(op::MOVI, 3, 0, 3),
        Instruction::rri(op::MOVI, 4, 0, 4),
        Instruction::rri(op::MOVI, 5, 0, 5),
        Instruction::swi(),
    ];
    let mut bench = Bench::new(&program);
    bench.issue(ControlCommand::StepForever);

    let mut passes = 0;
    while bench.dispatch() != Dispatch::Finished {
        passes += 1;
        assert!(passes < 1_000, "SWI never reached Decode");
    }

    assert!(!bench.pe.segfault);
    assert_eq!(bench.status(|s| s.swi_count.load(Ordering::Acquire)), 1);
    assert_eq!(bench.status(|s| s.stalls_segfault.load(Ordering::Relaxed)), 0);
    for reg in 1..=3 {
        assert_eq!(bench.reg(reg), reg as u64);
    }
    // The SWI halts from Decode; the two moves ahead of it are still in
    // flight.
    assert_eq!(bench.pe.mem_wb.inst, program[4].raw());
    assert_eq!(bench.pe.ex_mem.inst, program[5].raw());
    assert_eq!(bench.pe.id_ex.inst, program[6].raw());
}

/// Tests that fall-through fetches past the window behind a taken branch
/// are squashed without faulting; only decoding one faults.
#[test]
fn test_branch_at_window_edge() {
    let mut bench = Bench::new(&[
        Instruction::rri(op::MOVI, REG_LOWER, 0, 24),
        Instruction::rri(op::ADDI, 1, 1, 1),
        Instruction::rri(op::CMPI, 0, 1, 3),
        Instruction::branch(op::BLT, -16),
    ]);

    let mut cycles = 0;
    while !bench.pe.segfault {
        assert!(cycles < 1_000, "fall-through past the window never faulted");
        bench.cycle();
        cycles += 1;
    }
    assert_eq!(bench.reg(1), 3);

    let pc = bench.pe.pc;
    bench.run(10);
    assert_eq!(bench.pe.pc, pc);
    assert_eq!(bench.reg(1), 3);
}

/// Tests the counting loop whose branch re-enters at `MOVI REG2, #0`: each
/// pass overwrites REG2 with REG1, so it ends at 10.
#[test]
fn test_loop_restarting_at_clear() {
    let mut bench = Bench::new(&[
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::rri(op::MOVI, 2, 0, 0),
        Instruction::rrr(op::ADD, 2, 2, 1),
        Instruction::rri(op::ADDI, 1, 1, 1),
        Instruction::rri(op::CMPI, 0, 1, 11),
        Instruction::branch(op::BLT, -32),
        Instruction::swi(),
    ]);
    bench.issue(ControlCommand::StepForever);

    let mut passes = 0;
    while bench.dispatch() != Dispatch::Finished {
        passes += 1;
        assert!(passes < 2_000, "loop did not reach SWI");
    }

    assert_eq!(bench.reg(1), 11);
    assert_eq!(bench.reg(2), 10);
    assert_eq!(bench.status(|s| s.swi_count.load(Ordering::Acquire)), 1);
    assert_eq!(bench.control().command(), Some(ControlCommand::Idle));
}

/// Tests that a stop between cycles ends step-forever before another
/// cycle starts.
#[test]
fn test_stop_ends_step_forever_at_cycle_boundary() {
    let mut bench = Bench::new(&[Instruction::branch(op::B, 0)]);
    bench.issue(ControlCommand::StepForever);

    for expected in 1..=5 {
        assert_eq!(bench.dispatch(), Dispatch::Cycle(ControlCommand::StepForever));
        assert_eq!(bench.cycles(), expected);
    }

    bench.control().stop_requested.store(true, Ordering::Release);
    assert_eq!(bench.dispatch(), Dispatch::Finished);
    assert_eq!(bench.cycles(), 5);
    assert_eq!(bench.control().command(), Some(ControlCommand::Idle));
    assert!(!bench.control().running.load(Ordering::Acquire));

    assert_eq!(bench.dispatch(), Dispatch::Idle);
    assert_eq!(bench.cycles(), 5);
}

/// Tests that the cycle in which SWI leaves Decode is the last one run.
#[test]
fn test_swi_ends_step_forever_on_its_own_cycle() {
    let mut program = vec![
        Instruction::rri(op::MOVI, 1, 0, 1),
        Instruction::swi(),
    ];
    program.extend(std::iter::repeat(Instruction::nop()).take(4));
    let mut bench = Bench::new(&program);
    bench.issue(ControlCommand::StepForever);

    let swi = |b: &Bench| b.status(|s| s.swi_count.load(Ordering::Acquire));
    let mut last_cycle_raised = false;
    let mut passes = 0;
    loop {
        let before = swi(&bench);
        match bench.dispatch() {
            Dispatch::Cycle(_) => last_cycle_raised = swi(&bench) > before,
            Dispatch::Finished => break,
            Dispatch::Idle => panic!("command dropped before SWI"),
        }
        passes += 1;
        assert!(passes < 1_000, "SWI never reached Decode");
    }

    assert!(last_cycle_raised);
    assert_eq!(swi(&bench), 1);
    let cycles = bench.cycles();
    assert_eq!(bench.dispatch(), Dispatch::Idle);
    assert_eq!(bench.cycles(), cycles);
}

/// Tests that a stop also ends step-until with cycles still budgeted.
#[test]
fn test_stop_ends_step_until() {
    let mut bench = Bench::new(&[Instruction::branch(op::B, 0)]);
    bench.control().step_count.store(100, Ordering::Release);
    bench.issue(ControlCommand::StepUntil);

    for _ in 0..3 {
        assert_eq!(bench.dispatch(), Dispatch::Cycle(ControlCommand::StepUntil));
    }
    bench.control().stop_requested.store(true, Ordering::Release);
    assert_eq!(bench.dispatch(), Dispatch::Finished);
    assert_eq!(bench.cycles(), 3);
    assert_eq!(bench.control().step_count.load(Ordering::Acquire), 97);
}

/// Tests that Fetch is redirected only by an instruction selecting the
/// branch target on the PC mux.
#[test]
fn test_pc_mux_follows_pc_src() {
    let program = vec![Instruction::nop(); 4];
    for (pc_src, expected) in [(false, 8), (true, 0x40)] {
        let mut bench = Bench::new(&program);
        bench.pe.mem_wb = MemWb {
            valid: true,
            alu: 0x40,
            branch_taken: true,
            ctrl: ControlSignals {
                branch: true,
                pc_src,
                ..ControlSignals::default()
            },
            ..MemWb::default()
        };
        bench.cycle();
        assert_eq!(bench.pe.pc, expected, "pc_src={}", pc_src);
    }
}
