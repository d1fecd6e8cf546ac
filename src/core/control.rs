//! Control Unit.
//!
//! Pure decode from an 8-bit opcode to the [`ControlSignals`] bundle that
//! steers Execute, Memory and Writeback. The opcode space is organized in
//! families (integer register/immediate ALU, float ALU, moves, compares,
//! branches, memory, specials); every reserved opcode decodes exactly like
//! `NOP`.

use crate::core::pipeline::signals::{AluOp, BranchCond, ControlSignals, DataType, OpASrc, OpBSrc};
use crate::isa::opcodes as op;

/// Control unit.
pub struct ControlUnit;

impl ControlUnit {
    /// Register-writing ALU operation.
    fn alu(alu: AluOp, flags_update: bool) -> ControlSignals {
        ControlSignals {
            reg_write: true,
            flags_update,
            alu,
            ..ControlSignals::default()
        }
    }

    /// Adds an immediate operand of the given type.
    fn imm(mut sig: ControlSignals, data_type: DataType) -> ControlSignals {
        sig.use_imm = true;
        sig.b_src = OpBSrc::Imm;
        sig.data_type = data_type;
        sig
    }

    /// Flags-only comparison; the result is discarded.
    fn compare(alu: AluOp) -> ControlSignals {
        ControlSignals {
            flags_update: true,
            alu,
            ..ControlSignals::default()
        }
    }

    /// Unary INC/DEC: `Rd <- Rd op 1`.
    fn step(alu: AluOp) -> ControlSignals {
        ControlSignals {
            use_imm: true,
            a_src: OpASrc::Rd,
            b_src: OpBSrc::One,
            ..Self::alu(alu, true)
        }
    }

    fn memory(load: bool, byte: bool) -> ControlSignals {
        Self::imm(
            ControlSignals {
                reg_write: load,
                mem_op: true,
                cache_write: !load,
                cache_request: true,
                cache_isb: byte,
                alu: AluOp::Add,
                ..ControlSignals::default()
            },
            DataType::Integer,
        )
    }

    /// Decodes an opcode into its control signals.
    ///
    /// # Arguments
    ///
    /// * `opcode` - Bits 63-56 of the instruction word
    ///
    /// # Returns
    ///
    /// The signal bundle. Reserved opcodes yield the `NOP` bundle.
    pub fn decode(opcode: u8) -> ControlSignals {
        match opcode {
            op::ADD..=op::ROR => Self::alu(AluOp::from_u8(opcode), true),
            op::ADDI..=op::RORI => Self::imm(
                Self::alu(AluOp::from_u8(opcode - op::ADDI), true),
                DataType::Integer,
            ),
            op::INC => Self::step(AluOp::Add),
            op::DEC => Self::step(AluOp::Sub),

            op::FADD..=op::FCOPYSIGN => {
                Self::alu(AluOp::from_u8(opcode - op::FADD + AluOp::FAdd as u8), false)
            }
            op::FADDI..=op::FCOPYSIGNI => Self::imm(
                Self::alu(AluOp::from_u8(opcode - op::FADDI + AluOp::FAdd as u8), true),
                DataType::Float,
            ),
            op::FSQRT..=op::RTNE => {
                Self::alu(AluOp::from_u8(opcode - op::FSQRT + AluOp::FSqrt as u8), true)
            }
            op::FSQRTI..=op::RTNEI => Self::imm(
                Self::alu(AluOp::from_u8(opcode - op::FSQRTI + AluOp::FSqrt as u8), true),
                DataType::Float,
            ),

            op::MOV => Self::alu(AluOp::Mov, false),
            op::MVN => Self::alu(AluOp::Mvn, false),
            op::MOVI => Self::imm(Self::alu(AluOp::Mov, false), DataType::Integer),
            op::MVNI => Self::imm(Self::alu(AluOp::Mvn, false), DataType::Integer),
            op::FMOVI => Self::imm(Self::alu(AluOp::FMovi, false), DataType::Float),
            op::FMVNI => Self::imm(Self::alu(AluOp::FMvni, false), DataType::Float),

            op::CMP => Self::compare(AluOp::Sub),
            op::CMN => Self::compare(AluOp::Add),
            op::TST => Self::compare(AluOp::And),
            op::TEQ => Self::compare(AluOp::Eor),
            op::CMPI => Self::imm(Self::compare(AluOp::Sub), DataType::Integer),
            op::CMNI => Self::imm(Self::compare(AluOp::Add), DataType::Integer),
            op::TSTI => Self::imm(Self::compare(AluOp::And), DataType::Integer),
            op::TEQI => Self::imm(Self::compare(AluOp::Eor), DataType::Integer),
            op::FCMP => Self::compare(AluOp::FSub),
            op::FCMN => Self::compare(AluOp::FAdd),
            op::FCMPS => Self::compare(AluOp::FCmps),
            op::FCMPI => Self::imm(Self::compare(AluOp::FSub), DataType::Float),
            op::FCMNI => Self::imm(Self::compare(AluOp::FAdd), DataType::Float),
            op::FCMPSI => Self::imm(Self::compare(AluOp::FCmps), DataType::Float),

            op::B..=op::BORD => Self::imm(
                ControlSignals {
                    pc_src: true,
                    branch: true,
                    branch_cond: BranchCond::from_index(opcode - op::B + 1),
                    alu: AluOp::Add,
                    a_src: OpASrc::Pc,
                    ..ControlSignals::default()
                },
                DataType::Integer,
            ),

            op::SWI => ControlSignals {
                alu: AluOp::Crash,
                swi: true,
                ..ControlSignals::default()
            },

            op::LDR => Self::memory(true, false),
            op::STR => Self::memory(false, false),
            op::LDRB => Self::memory(true, true),
            op::STRB => Self::memory(false, true),

            _ => ControlSignals::default(),
        }
    }
}
