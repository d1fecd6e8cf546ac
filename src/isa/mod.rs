//! Instruction Set Architecture definitions.
//!
//! The simulated ISA uses fixed 64-bit instruction words:
//!
//! | bits  | field                                   |
//! |-------|-----------------------------------------|
//! | 63-56 | opcode                                  |
//! | 55-52 | destination register (`Rd`)             |
//! | 51-48 | first source register (`Rn`)            |
//! | 47-44 | second source register (`Rm`)           |
//! | 43-12 | 32-bit immediate / payload              |
//! | 11-0  | reserved                                |

/// Instruction disassembler.
pub mod disasm;

/// Instruction word field access and encoding.
pub mod instruction;

/// Opcode constants.
pub mod opcodes;

pub use disasm::disassemble;
pub use instruction::Instruction;
