//! Execution units.

/// Integer ALU and operation dispatch.
pub mod alu;

/// NZCV condition flags.
pub mod flags;

/// Double-precision floating-point operations.
pub mod fpu;
