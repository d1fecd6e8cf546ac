//! Pipeline control signals and operation types.
//!
//! This module defines the control signals produced by the control unit in
//! Decode and carried down the pipeline: ALU operation selectors, branch
//! conditions, operand source selection and the memory/cache request bits.

use crate::core::units::flags::Flags;

/// ALU operation selector.
///
/// Discriminants are the hardware selector values `0x00..=0x22`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AluOp {
    /// Integer addition.
    Add = 0x00,
    /// Integer subtraction.
    Sub = 0x01,
    /// Add with carry.
    Adc = 0x02,
    /// Subtract with carry (borrow = !C).
    Sbc = 0x03,
    /// Integer multiply (low 64 bits).
    Mul = 0x04,
    /// Signed integer divide. Division by zero yields 0.
    Div = 0x05,
    And = 0x06,
    Orr = 0x07,
    Eor = 0x08,
    /// Bit clear (`a & !b`).
    Bic = 0x09,
    Lsl = 0x0A,
    Lsr = 0x0B,
    Asr = 0x0C,
    Ror = 0x0D,
    /// Double-precision addition.
    FAdd = 0x0E,
    /// Double-precision subtraction.
    FSub = 0x0F,
    FMul = 0x10,
    FDiv = 0x11,
    /// Magnitude of A with the sign of B.
    FCopySign = 0x12,
    FSqrt = 0x13,
    FNeg = 0x14,
    FAbs = 0x15,
    /// Double to signed integer (truncating).
    FCdti = 0x16,
    /// Signed integer to double.
    FCdtd = 0x17,
    /// Round to nearest, ties away from zero.
    Rtnr = 0x18,
    /// Round toward zero.
    Rtz = 0x19,
    /// Round toward positive infinity.
    Rtp = 0x1A,
    /// Round toward negative infinity.
    Rtne = 0x1B,
    /// Pass B through.
    Mov = 0x1C,
    /// Pass `!b` through.
    Mvn = 0x1D,
    /// Pass a float bit pattern through.
    FMovi = 0x1E,
    /// Pass the complement of a float bit pattern through.
    FMvni = 0x1F,
    /// Dedicated floating-point compare.
    FCmps = 0x20,
    /// Diagnostic-only operation issued for `SWI`.
    Crash = 0x21,
    /// No operation.
    #[default]
    Nothing = 0x22,
}

impl AluOp {
    /// Maps a raw selector value back to an operation.
    ///
    /// Unknown selectors map to `Nothing`.
    pub fn from_u8(raw: u8) -> Self {
        use AluOp::*;
        const TABLE: [AluOp; 0x23] = [
            Add, Sub, Adc, Sbc, Mul, Div, And, Orr, Eor, Bic, Lsl, Lsr, Asr, Ror, FAdd, FSub, FMul,
            FDiv, FCopySign, FSqrt, FNeg, FAbs, FCdti, FCdtd, Rtnr, Rtz, Rtp, Rtne, Mov, Mvn,
            FMovi, FMvni, FCmps, Crash, Nothing,
        ];
        TABLE.get(raw as usize).copied().unwrap_or(Nothing)
    }

    /// Whether the operation interprets its operands as IEEE-754 doubles.
    pub fn is_float(self) -> bool {
        matches!(self as u8, 0x0E..=0x1B | 0x1E..=0x20)
    }
}

/// Branch condition evaluated against the NZCV flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BranchCond {
    /// Not a branch.
    #[default]
    Never = 0,
    /// `B`
    Always = 1,
    /// `BEQ`: Z set.
    Eq = 2,
    /// `BNE`: Z clear.
    Ne = 3,
    /// `BLT`: N != V.
    Lt = 4,
    /// `BGT`: Z clear and N == V.
    Gt = 5,
    /// `BUN`: V set (unordered float compare).
    Unordered = 6,
    /// `BORD`: V clear.
    Ordered = 7,
}

impl BranchCond {
    /// Condition encoded by branch opcode offset `n` (1 = `B`).
    pub fn from_index(n: u8) -> Self {
        match n {
            1 => Self::Always,
            2 => Self::Eq,
            3 => Self::Ne,
            4 => Self::Lt,
            5 => Self::Gt,
            6 => Self::Unordered,
            7 => Self::Ordered,
            _ => Self::Never,
        }
    }

    /// Evaluates the condition.
    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Eq => flags.z(),
            Self::Ne => !flags.z(),
            Self::Lt => flags.n() != flags.v(),
            Self::Gt => !flags.z() && flags.n() == flags.v(),
            Self::Unordered => flags.v(),
            Self::Ordered => !flags.v(),
        }
    }
}

/// Interpretation of the 32-bit immediate field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataType {
    /// Sign-extended to 64 bits.
    #[default]
    Integer,
    /// Reinterpreted as `f32` and widened to an `f64` bit pattern.
    Float,
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OpASrc {
    /// Use the `Rn` register value.
    #[default]
    Rn,
    /// Use the `Rd` register value (INC/DEC).
    Rd,
    /// Use the instruction's own address (branch target computation).
    Pc,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OpBSrc {
    /// Use the `Rm` register value.
    #[default]
    Rm,
    /// Use the extended immediate.
    Imm,
    /// Use the constant 1 (INC/DEC).
    One,
}

/// Control signals for pipeline stage execution.
///
/// The all-false default is the signal bundle of `NOP`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ControlSignals {
    /// Enable write to the destination register.
    pub reg_write: bool,
    /// Instruction accesses data memory.
    pub mem_op: bool,
    /// Cache write enable (store).
    pub cache_write: bool,
    /// Assert a cache request in Memory.
    pub cache_request: bool,
    /// Byte-granular ("special") cache access.
    pub cache_isb: bool,
    /// PC mux select: a taken instruction in Writeback redirects Fetch to
    /// its ALU result.
    pub pc_src: bool,
    /// Commit the ALU's output flags.
    pub flags_update: bool,
    /// ALU operation to perform.
    pub alu: AluOp,
    /// Branch condition.
    pub branch_cond: BranchCond,
    /// Instruction is a branch.
    pub branch: bool,
    /// The immediate field is live. When clear, Decode extends nothing and
    /// the immediate reads as 0.
    pub use_imm: bool,
    /// How to extend the immediate field.
    pub data_type: DataType,
    /// Source selection for ALU operand A.
    pub a_src: OpASrc,
    /// Source selection for ALU operand B.
    pub b_src: OpBSrc,
    /// Instruction is a software interrupt.
    pub swi: bool,
}
