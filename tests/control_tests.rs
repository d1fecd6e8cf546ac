//! Unit tests for the control unit's opcode decode.

use cpu_tlp_sim::core::control::ControlUnit;
use cpu_tlp_sim::core::pipeline::signals::{
    AluOp, BranchCond, ControlSignals, DataType, OpASrc, OpBSrc,
};
use cpu_tlp_sim::isa::opcodes as op;

/// Tests that every reserved opcode decodes exactly like NOP.
#[test]
fn test_reserved_opcodes_are_nop() {
    let nop = ControlUnit::decode(op::NOP);
    assert_eq!(nop, ControlSignals::default());
    for opcode in (op::LAST_DEFINED + 1)..=u8::MAX {
        assert_eq!(ControlUnit::decode(opcode), nop, "opcode {:#04x}", opcode);
    }
}

/// Tests that every defined opcode except NOP produces some effect.
#[test]
fn test_defined_opcodes_decode() {
    for opcode in 0..=op::LAST_DEFINED {
        let sig = ControlUnit::decode(opcode);
        if opcode == op::NOP {
            continue;
        }
        assert!(
            sig.reg_write || sig.flags_update || sig.branch || sig.cache_request || sig.swi,
            "opcode {:#04x} decodes to nothing",
            opcode
        );
    }
}

/// Tests the integer register-register family.
#[test]
fn test_integer_reg_reg() {
    for opcode in op::ADD..=op::ROR {
        let sig = ControlUnit::decode(opcode);
        assert_eq!(sig.alu, AluOp::from_u8(opcode));
        assert!(sig.reg_write);
        assert!(sig.flags_update);
        assert!(!sig.use_imm);
        assert_eq!(sig.b_src, OpBSrc::Rm);
    }
}

/// Tests the integer immediate family.
#[test]
fn test_integer_immediate() {
    for opcode in op::ADDI..=op::RORI {
        let sig = ControlUnit::decode(opcode);
        assert_eq!(sig.alu, AluOp::from_u8(opcode - op::ADDI));
        assert!(sig.reg_write);
        assert!(sig.use_imm);
        assert_eq!(sig.b_src, OpBSrc::Imm);
        assert_eq!(sig.data_type, DataType::Integer);
    }
}

/// Tests INC and DEC.
#[test]
fn test_inc_dec() {
    let inc = ControlUnit::decode(op::INC);
    assert_eq!(inc.alu, AluOp::Add);
    assert_eq!(inc.a_src, OpASrc::Rd);
    assert_eq!(inc.b_src, OpBSrc::One);
    assert!(inc.reg_write && inc.flags_update);

    let dec = ControlUnit::decode(op::DEC);
    assert_eq!(dec.alu, AluOp::Sub);
    assert_eq!(dec.a_src, OpASrc::Rd);
}

/// Tests the floating-point families.
#[test]
fn test_float_families() {
    let fadd = ControlUnit::decode(op::FADD);
    assert_eq!(fadd.alu, AluOp::FAdd);
    assert!(fadd.reg_write);
    assert!(!fadd.flags_update);

    let fcs = ControlUnit::decode(op::FCOPYSIGN);
    assert_eq!(fcs.alu, AluOp::FCopySign);

    let faddi = ControlUnit::decode(op::FADDI);
    assert_eq!(faddi.alu, AluOp::FAdd);
    assert!(faddi.flags_update);
    assert_eq!(faddi.data_type, DataType::Float);

    assert_eq!(ControlUnit::decode(op::FSQRT).alu, AluOp::FSqrt);
    assert_eq!(ControlUnit::decode(op::RTNE).alu, AluOp::Rtne);

    let sqrti = ControlUnit::decode(op::FSQRTI);
    assert_eq!(sqrti.alu, AluOp::FSqrt);
    assert_eq!(sqrti.data_type, DataType::Float);
    assert_eq!(ControlUnit::decode(op::RTNEI).alu, AluOp::Rtne);
}

/// Tests the move family.
#[test]
fn test_moves() {
    let mov = ControlUnit::decode(op::MOV);
    assert_eq!(mov.alu, AluOp::Mov);
    assert!(mov.reg_write);
    assert!(!mov.flags_update);
    assert_eq!(mov.b_src, OpBSrc::Rm);

    let movi = ControlUnit::decode(op::MOVI);
    assert_eq!(movi.b_src, OpBSrc::Imm);
    assert_eq!(movi.data_type, DataType::Integer);

    assert_eq!(ControlUnit::decode(op::MVNI).alu, AluOp::Mvn);

    let fmovi = ControlUnit::decode(op::FMOVI);
    assert_eq!(fmovi.alu, AluOp::FMovi);
    assert_eq!(fmovi.data_type, DataType::Float);
    assert_eq!(ControlUnit::decode(op::FMVNI).alu, AluOp::FMvni);
}

/// Tests that comparisons update flags without writing a register.
#[test]
fn test_compares() {
    let expected = [
        (op::CMP, AluOp::Sub, false),
        (op::CMN, AluOp::Add, false),
        (op::TST, AluOp::And, false),
        (op::TEQ, AluOp::Eor, false),
        (op::CMPI, AluOp::Sub, true),
        (op::CMNI, AluOp::Add, true),
        (op::TSTI, AluOp::And, true),
        (op::TEQI, AluOp::Eor, true),
        (op::FCMP, AluOp::FSub, false),
        (op::FCMN, AluOp::FAdd, false),
        (op::FCMPS, AluOp::FCmps, false),
        (op::FCMPI, AluOp::FSub, true),
        (op::FCMNI, AluOp::FAdd, true),
        (op::FCMPSI, AluOp::FCmps, true),
    ];
    for (opcode, alu, imm) in expected {
        let sig = ControlUnit::decode(opcode);
        assert_eq!(sig.alu, alu, "opcode {:#04x}", opcode);
        assert!(!sig.reg_write);
        assert!(sig.flags_update);
        assert_eq!(sig.use_imm, imm);
    }
    assert_eq!(ControlUnit::decode(op::FCMPI).data_type, DataType::Float);
}

/// Tests branch decode and the condition for each branch opcode.
#[test]
fn test_branches() {
    let conds = [
        (op::B, BranchCond::Always),
        (op::BEQ, BranchCond::Eq),
        (op::BNE, BranchCond::Ne),
        (op::BLT, BranchCond::Lt),
        (op::BGT, BranchCond::Gt),
        (op::BUN, BranchCond::Unordered),
        (op::BORD, BranchCond::Ordered),
    ];
    for (opcode, cond) in conds {
        let sig = ControlUnit::decode(opcode);
        assert!(sig.branch);
        assert!(sig.pc_src);
        assert!(!sig.reg_write);
        assert_eq!(sig.branch_cond, cond);
        assert_eq!(sig.alu, AluOp::Add);
        assert_eq!(sig.a_src, OpASrc::Pc);
        assert_eq!(sig.b_src, OpBSrc::Imm);
    }
}

/// Tests loads and stores.
#[test]
fn test_memory_ops() {
    let ldr = ControlUnit::decode(op::LDR);
    assert!(ldr.reg_write && ldr.mem_op && ldr.cache_request);
    assert!(!ldr.cache_write && !ldr.cache_isb);
    assert_eq!(ldr.alu, AluOp::Add);

    let str_ = ControlUnit::decode(op::STR);
    assert!(!str_.reg_write);
    assert!(str_.cache_write && str_.cache_request);

    assert!(ControlUnit::decode(op::LDRB).cache_isb);
    let strb = ControlUnit::decode(op::STRB);
    assert!(strb.cache_isb && strb.cache_write);
}

/// Tests the software interrupt.
#[test]
fn test_swi() {
    let sig = ControlUnit::decode(op::SWI);
    assert!(sig.swi);
    assert_eq!(sig.alu, AluOp::Crash);
    assert!(!sig.reg_write);
}
