//! Architectural state of a Processing Element.
//!
//! Twelve fixed-purpose 64-bit registers: `REG0` (reads as zero),
//! `REG1..REG8` (general purpose), `PEID` (element index, read-only) and
//! the `UPPER`/`LOWER` pair bounding the valid fetch window.

/// General-Purpose Register file implementation.
pub mod gpr;
