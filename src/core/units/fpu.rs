//! Floating-Point Unit (FPU).
//!
//! This module implements the double-precision operations of the Execute
//! stage. Operands are 64-bit registers reinterpreted as IEEE-754 `f64`
//! bit patterns. Only the add/subtract selectors and the dedicated compare
//! produce flags; everything else passes the incoming flags through.

use crate::core::pipeline::signals::AluOp;
use crate::core::units::alu::AluResult;
use crate::core::units::flags::Flags;

/// Floating-Point Unit.
pub struct Fpu;

impl Fpu {
    /// Widens the single-precision immediate payload to an `f64` bit pattern.
    pub fn widen_f32(bits: u32) -> u64 {
        (f32::from_bits(bits) as f64).to_bits()
    }

    /// Compare-style flags for the result of `a + b` or `a - b`.
    ///
    /// Any NaN produces V alone ("unordered"). Subtraction additionally
    /// reports `a >= b` in C.
    fn arith_flags(a: f64, b: f64, r: f64, sub: bool) -> Flags {
        if a.is_nan() || b.is_nan() || r.is_nan() {
            return Flags::from_bits(Flags::V);
        }
        Flags::from_nzcv(r < 0.0, r == 0.0, sub && a >= b, false)
    }

    /// Direct comparison flags: Z on equality (`-0.0 == +0.0`, `inf == inf`),
    /// N when `a < b`, C when `a >= b`, V alone when unordered.
    pub fn compare(a: f64, b: f64) -> Flags {
        if a.is_nan() || b.is_nan() {
            return Flags::from_bits(Flags::V);
        }
        Flags::from_nzcv(a < b, a == b, a >= b, false)
    }

    /// Executes a floating-point operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation selector
    /// * `a` - First operand (`f64` bit pattern)
    /// * `b` - Second operand; the sole input of unary operations
    /// * `flags` - Incoming NZCV flags
    ///
    /// # Returns
    ///
    /// The 64-bit result and outgoing flags.
    pub fn execute(op: AluOp, a: u64, b: u64, flags: Flags) -> AluResult {
        let fa = f64::from_bits(a);
        let fb = f64::from_bits(b);
        let float = |r: f64| AluResult {
            value: r.to_bits(),
            flags,
        };

        match op {
            AluOp::FAdd => {
                let r = fa + fb;
                AluResult {
                    value: r.to_bits(),
                    flags: Self::arith_flags(fa, fb, r, false),
                }
            }
            AluOp::FSub => {
                let r = fa - fb;
                AluResult {
                    value: r.to_bits(),
                    flags: Self::arith_flags(fa, fb, r, true),
                }
            }
            AluOp::FMul => float(fa * fb),
            AluOp::FDiv => float(fa / fb),
            AluOp::FCopySign => float(fa.abs().copysign(fb)),
            AluOp::FSqrt => float(fb.sqrt()),
            AluOp::FNeg => float(-fb),
            AluOp::FAbs => float(fb.abs()),
            AluOp::FCdti => AluResult {
                value: fb as i64 as u64,
                flags,
            },
            AluOp::FCdtd => float(b as i64 as f64),
            AluOp::Rtnr => float(fb.round()),
            AluOp::Rtz => float(fb.trunc()),
            AluOp::Rtp => float(fb.ceil()),
            AluOp::Rtne => float(fb.floor()),
            AluOp::FMovi => AluResult { value: b, flags },
            AluOp::FMvni => AluResult { value: !b, flags },
            AluOp::FCmps => AluResult {
                value: 0,
                flags: Self::compare(fa, fb),
            },
            _ => AluResult { value: a, flags },
        }
    }
}
