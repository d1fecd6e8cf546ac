//! Unit tests for the Floating-Point Unit.

use cpu_tlp_sim::core::pipeline::signals::AluOp;
use cpu_tlp_sim::core::units::alu::Alu;
use cpu_tlp_sim::core::units::flags::Flags;
use cpu_tlp_sim::core::units::fpu::Fpu;

fn f(v: f64) -> u64 {
    v.to_bits()
}

fn run(op: AluOp, a: f64, b: f64) -> f64 {
    f64::from_bits(Alu::execute(op, f(a), f(b), Flags::default()).value)
}

/// Tests double-precision arithmetic.
#[test]
fn test_fpu_arith() {
    assert_eq!(run(AluOp::FAdd, 1.5, 2.25), 3.75);
    assert_eq!(run(AluOp::FSub, 1.5, 2.25), -0.75);
    assert_eq!(run(AluOp::FMul, 1.5, -2.0), -3.0);
    assert_eq!(run(AluOp::FDiv, 1.0, 4.0), 0.25);
    assert!(run(AluOp::FDiv, 1.0, 0.0).is_infinite());
    assert_eq!(run(AluOp::FCopySign, 3.0, -1.0), -3.0);
    assert_eq!(run(AluOp::FCopySign, -3.0, 1.0), 3.0);
}

/// Tests the compare-style flags of FADD/FSUB.
#[test]
fn test_fpu_arith_flags() {
    let r = Alu::execute(AluOp::FSub, f(2.0), f(2.0), Flags::default());
    assert!(r.flags.z());
    assert!(r.flags.c());

    let r = Alu::execute(AluOp::FSub, f(1.0), f(2.0), Flags::default());
    assert!(r.flags.n());
    assert!(!r.flags.c());

    let r = Alu::execute(AluOp::FAdd, f(f64::NAN), f(1.0), Flags::default());
    assert_eq!(r.flags, Flags::from_bits(Flags::V));
}

/// Tests that multiply/divide pass the incoming flags through.
#[test]
fn test_fpu_flags_passthrough() {
    let flags = Flags::from_bits(Flags::Z | Flags::C);
    assert_eq!(Alu::execute(AluOp::FMul, f(2.0), f(3.0), flags).flags, flags);
    assert_eq!(Alu::execute(AluOp::FSqrt, 0, f(9.0), flags).flags, flags);
}

/// Tests unary operations, which act on operand B.
#[test]
fn test_fpu_unary() {
    assert_eq!(run(AluOp::FSqrt, 0.0, 16.0), 4.0);
    assert!(run(AluOp::FSqrt, 0.0, -1.0).is_nan());
    assert_eq!(run(AluOp::FNeg, 0.0, 2.5), -2.5);
    assert_eq!(run(AluOp::FAbs, 0.0, -2.5), 2.5);
}

/// Tests the rounding family.
#[test]
fn test_fpu_rounding() {
    assert_eq!(run(AluOp::Rtnr, 0.0, 2.5), 3.0);
    assert_eq!(run(AluOp::Rtnr, 0.0, -2.5), -3.0);
    assert_eq!(run(AluOp::Rtz, 0.0, -2.7), -2.0);
    assert_eq!(run(AluOp::Rtp, 0.0, 2.1), 3.0);
    assert_eq!(run(AluOp::Rtne, 0.0, 2.9), 2.0);
    assert_eq!(run(AluOp::Rtne, 0.0, -2.1), -3.0);
}

/// Tests conversions between integers and doubles.
#[test]
fn test_fpu_conversions() {
    let r = Alu::execute(AluOp::FCdti, 0, f(-7.9), Flags::default());
    assert_eq!(r.value as i64, -7);

    let r = Alu::execute(AluOp::FCdtd, 0, (-3i64) as u64, Flags::default());
    assert_eq!(f64::from_bits(r.value), -3.0);
}

/// Tests the dedicated compare on signed zeros, infinities and NaN.
#[test]
fn test_fpu_compare() {
    let eq = Fpu::compare(-0.0, 0.0);
    assert!(eq.z());
    assert!(eq.c());
    assert!(!eq.n());

    let inf = Fpu::compare(f64::INFINITY, f64::INFINITY);
    assert!(inf.z());

    let lt = Fpu::compare(f64::NEG_INFINITY, 1.0);
    assert!(lt.n());
    assert!(!lt.c());

    let gt = Fpu::compare(2.0, 1.0);
    assert!(gt.c());
    assert!(!gt.z());

    assert_eq!(Fpu::compare(f64::NAN, 1.0), Flags::from_bits(Flags::V));

    let r = Alu::execute(AluOp::FCmps, f(1.0), f(1.0), Flags::default());
    assert_eq!(r.value, 0);
    assert!(r.flags.z());
}

/// Tests float immediate widening and the float moves.
#[test]
fn test_fpu_immediates() {
    assert_eq!(Fpu::widen_f32(1.5f32.to_bits()), f(1.5));
    assert_eq!(Fpu::widen_f32((-0.25f32).to_bits()), f(-0.25));

    let bits = f(1.5);
    assert_eq!(Alu::execute(AluOp::FMovi, 0, bits, Flags::default()).value, bits);
    assert_eq!(Alu::execute(AluOp::FMvni, 0, bits, Flags::default()).value, !bits);
}
