//! Thread-Level-Parallel CPU Simulator CLI.
//!
//! Loads a configuration and an instruction image, starts the four
//! Processing Elements, runs the selected ones and prints their final
//! register and statistics snapshots.
//!
//! # Usage
//!
//! 1. **Run**: `tlpsim --image prog.bin [--pe 0 --pe 2] [--cycles N]`. Without
//!    `--cycles` the elements step until a software interrupt, or until
//!    `--timeout-ms` elapses.
//! 2. **Listing**: `tlpsim --image prog.bin --disasm` prints the image
//!    disassembly and exits.

use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use env_logger::Env;
use serde::Serialize;

use cpu_tlp_sim::common::constants::{NUM_PES, NUM_REGS};
use cpu_tlp_sim::config::Config;
use cpu_tlp_sim::isa::disasm::{disassemble, disassemble_image, register_name};
use cpu_tlp_sim::sim::{loader, CpuSystem, PeHandle};
use cpu_tlp_sim::stats::PeStats;

/// Command-line arguments for the simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-core 5-stage pipeline simulator")]
struct Args {
    /// TOML configuration; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Instruction image, overriding `general.instruction_image`.
    #[arg(short, long)]
    image: Option<String>,

    /// Element to run. Repeatable; all elements when omitted.
    #[arg(long = "pe")]
    pes: Vec<usize>,

    /// Run exactly this many cycles instead of stepping until SWI.
    #[arg(long)]
    cycles: Option<u64>,

    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Print the disassembly of the image and exit.
    #[arg(long)]
    disasm: bool,

    /// Emit the final snapshots as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct PeReport {
    registers: [u64; NUM_REGS],
    register_version: u64,
    stages: Vec<String>,
    stats: PeStats,
}

impl PeReport {
    fn capture(handle: &PeHandle) -> Self {
        let registers = handle.registers();
        let stages = handle.stages();
        Self {
            registers: registers.values,
            register_version: registers.version,
            stages: stages.values.iter().map(|&w| disassemble(w)).collect(),
            stats: handle.stats(),
        }
    }

    fn print(&self) {
        self.stats.print();
        println!("REGISTERS (version {})", self.register_version);
        for (idx, value) in self.registers.iter().enumerate() {
            println!("  {:<6} {:#018x} ({})", register_name(idx), value, *value as i64);
        }
        println!("STAGES");
        for (name, text) in ["IF", "ID", "EX", "MEM", "WB"].iter().zip(&self.stages) {
            println!("  {:<4} {}", name, text);
        }
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    process::exit(1);
}

fn print_config(config: &Config) {
    println!("Global Configuration");
    println!("--------------------");
    println!("General:");
    println!("  Trace Pipeline:     {}", config.trace_enabled());
    println!(
        "  Instruction Image:  {}",
        config
            .general
            .instruction_image
            .as_deref()
            .unwrap_or("(none)")
    );
    println!("Timing:");
    println!("  Idle Sleep:         {} us", config.timing.idle_sleep_us);
    println!(
        "  Step Sleep:         {} us",
        config.timing.step_forever_sleep_us
    );
    println!("  Server Poll:        {} us", config.timing.server_poll_us);
    println!("Data Memory:");
    println!(
        "  Responder:          {} ({} bytes)",
        if config.data_memory.enabled {
            "Enabled"
        } else {
            "Disabled"
        },
        config.data_memory.size_val()
    );
    println!("Processing Elements:");
    for idx in 0..NUM_PES {
        let caps = config.pe_config(idx);
        println!(
            "  PE{}:                tracking={} swi_halts={}",
            idx, caps.instruction_tracking, caps.swi_halts
        );
    }
    println!("--------------------");
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fail(e)),
        None => Config::default(),
    };
    if let Some(image) = args.image {
        config.general.instruction_image = Some(image);
    }

    if args.disasm {
        let Some(path) = config.general.instruction_image.as_deref() else {
            fail("--disasm needs an instruction image")
        };
        let image = loader::load_image(path).unwrap_or_else(|e| fail(e));
        for (addr, word, text) in disassemble_image(&image) {
            println!("{:08x}:  {:016x}  {}", addr, word, text);
        }
        return;
    }

    if !args.json {
        print_config(&config);
    }

    let mut system = CpuSystem::new(config);
    if let Err(e) = system.initialize() {
        fail(e);
    }

    let indices: Vec<usize> = if args.pes.is_empty() {
        (0..NUM_PES).collect()
    } else {
        args.pes.clone()
    };
    let handles: Vec<PeHandle> = indices
        .iter()
        .map(|&idx| system.handle(idx).unwrap_or_else(|e| fail(e)))
        .collect();

    for handle in &handles {
        match args.cycles {
            Some(n) => handle.step_until(n),
            None => handle.step_indefinitely(),
        }
    }

    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    for handle in &handles {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !handle.wait_idle(remaining) {
            eprintln!("[!] PE{} still running after {} ms, stopping", handle.id(), args.timeout_ms);
            handle.stop_execution();
            handle.wait_idle(Duration::from_millis(100));
        }
    }

    let reports: Vec<PeReport> = handles.iter().map(PeReport::capture).collect();
    system.shutdown();

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(e),
        }
    } else {
        for report in &reports {
            report.print();
        }
    }
}
