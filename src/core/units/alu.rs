//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the ALU used in the Execute stage. It handles
//! integer arithmetic, logical operations, shifts and rotates, the move
//! family and the special no-op selectors, and hands every floating-point
//! selector to the [`Fpu`].

use log::debug;

use crate::core::pipeline::signals::AluOp;
use crate::core::units::flags::Flags;
use crate::core::units::fpu::Fpu;

/// Bit mask for shift and rotate amounts (6 bits: 0-63).
const SHAMT_MASK: u64 = 0x3f;

/// Output of one ALU evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct AluResult {
    /// 64-bit result (an `f64` bit pattern for float operations).
    pub value: u64,
    /// Outgoing NZCV flags. Operations that do not produce flags pass the
    /// incoming flags through unchanged.
    pub flags: Flags,
}

/// Arithmetic Logic Unit.
pub struct Alu;

impl Alu {
    /// Computes flags for a 64-bit addition or subtraction.
    ///
    /// For subtraction C means "no borrow" (`a >= b`); for addition it is
    /// the unsigned carry out. V is signed overflow in both cases.
    ///
    /// # Arguments
    ///
    /// * `result` - The wrapped 64-bit result
    /// * `a` - First operand
    /// * `b` - Second operand, including any carry/borrow adjustment
    /// * `sub` - Whether the operation was a subtraction
    pub fn add_sub_flags(result: u64, a: u64, b: u64, sub: bool) -> Flags {
        let (sa, sb, sr) = ((a as i64) < 0, (b as i64) < 0, (result as i64) < 0);
        let (c, v) = if sub {
            (a >= b, sa != sb && sr != sa)
        } else {
            (result < a, sa == sb && sr != sa)
        };
        Flags::from_nzcv(sr, result == 0, c, v)
    }

    /// Replaces the C flag, keeping N, Z and V.
    ///
    /// The V rule of [`Alu::add_sub_flags`] still holds with a carry-in,
    /// but C has to come from both partial additions.
    fn with_carry(flags: Flags, c: bool) -> Flags {
        Flags::from_nzcv(flags.n(), flags.z(), c, flags.v())
    }

    /// Executes an ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation selector
    /// * `a` - First operand
    /// * `b` - Second operand (also the shift amount and the sole input of
    ///   unary operations)
    /// * `flags` - Incoming NZCV flags (C feeds ADC/SBC)
    ///
    /// # Returns
    ///
    /// The result value and the outgoing flags.
    pub fn execute(op: AluOp, a: u64, b: u64, flags: Flags) -> AluResult {
        if op.is_float() {
            return Fpu::execute(op, a, b, flags);
        }

        let carry = flags.c() as u64;
        let sh = (b & SHAMT_MASK) as u32;

        let logical = |value: u64| AluResult {
            value,
            flags: Flags::nz(value),
        };

        match op {
            AluOp::Add => {
                let value = a.wrapping_add(b);
                AluResult {
                    value,
                    flags: Self::add_sub_flags(value, a, b, false),
                }
            }
            AluOp::Sub => {
                let value = a.wrapping_sub(b);
                AluResult {
                    value,
                    flags: Self::add_sub_flags(value, a, b, true),
                }
            }
            AluOp::Adc => {
                let (partial, c1) = a.overflowing_add(b);
                let (value, c2) = partial.overflowing_add(carry);
                AluResult {
                    value,
                    flags: Self::with_carry(Self::add_sub_flags(value, a, b, false), c1 || c2),
                }
            }
            AluOp::Sbc => {
                // A - B - !C; C out means no borrow in either step.
                let (partial, b1) = a.overflowing_sub(b);
                let (value, b2) = partial.overflowing_sub(1 - carry);
                AluResult {
                    value,
                    flags: Self::with_carry(Self::add_sub_flags(value, a, b, true), !(b1 || b2)),
                }
            }
            AluOp::Mul => logical(a.wrapping_mul(b)),
            AluOp::Div => {
                let value = if b == 0 {
                    0
                } else {
                    (a as i64).wrapping_div(b as i64) as u64
                };
                logical(value)
            }
            AluOp::And => logical(a & b),
            AluOp::Orr => logical(a | b),
            AluOp::Eor => logical(a ^ b),
            AluOp::Bic => logical(a & !b),
            AluOp::Lsl => logical(a << sh),
            AluOp::Lsr => logical(a >> sh),
            AluOp::Asr => logical(((a as i64) >> sh) as u64),
            AluOp::Ror => logical(a.rotate_right(sh)),
            AluOp::Mov => AluResult {
                value: b,
                flags: flags.with_nz(b),
            },
            AluOp::Mvn => AluResult {
                value: !b,
                flags: flags.with_nz(!b),
            },
            AluOp::Crash => {
                debug!("CRASH operation executed");
                AluResult { value: 0, flags }
            }
            AluOp::Nothing => AluResult { value: 0, flags },
            // Float selectors were dispatched above.
            _ => AluResult { value: a, flags },
        }
    }
}
