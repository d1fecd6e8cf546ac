//! Architectural constants.
//!
//! Register indices, sentinel instruction words and system dimensions shared
//! by the Processing Elements, the instruction-memory server and the
//! telemetry published to the UI layer.

/// Number of Processing Elements in the system.
pub const NUM_PES: usize = 4;

/// Number of architectural registers per Processing Element.
pub const NUM_REGS: usize = 12;

/// Number of pipeline stages tracked for telemetry (F, D, E, M, W).
pub const NUM_STAGES: usize = 5;

/// Size of one instruction word in bytes.
pub const INSTRUCTION_BYTES: u64 = 8;

/// Hard-wired zero register.
pub const REG_ZERO: usize = 0;

/// Read-only Processing Element identity register.
pub const REG_PEID: usize = 9;

/// Lower end of the valid program-counter window (inclusive).
pub const REG_UPPER: usize = 10;

/// Upper end of the valid program-counter window (inclusive).
pub const REG_LOWER: usize = 11;

/// Encoding of the `NOP` instruction (opcode 0x4D, all fields zero).
pub const NOP_INSTRUCTION: u64 = 0x4D00_0000_0000_0000;

/// Marker placed into a latch when its instruction is discarded.
///
/// Decodes exactly like `NOP`; the reserved low bit only distinguishes it
/// in telemetry and disassembly.
pub const FLUSH_INSTRUCTION: u64 = 0x4D00_0000_0000_0001;

/// Word returned by the instruction server for an out-of-range fetch.
pub const ERROR_INSTRUCTION: u64 = 0x4D00_0000_0000_0000;

/// `served_pc` of a fetch port that holds no answer. Only meaningful
/// together with a clear `ready` flag; the address itself stays fetchable.
pub const UNSERVED_PC: u64 = u64::MAX;
