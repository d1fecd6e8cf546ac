//! Instruction word field access and encoding.

use crate::isa::opcodes;

const OPCODE_SHIFT: u32 = 56;
const RD_SHIFT: u32 = 52;
const RN_SHIFT: u32 = 48;
const RM_SHIFT: u32 = 44;
const IMM_SHIFT: u32 = 12;
const REG_MASK: u64 = 0xF;
const IMM_MASK: u64 = 0xFFFF_FFFF;

/// A 64-bit instruction word.
///
/// Immutable once fetched; the accessors only slice bit fields out of the
/// raw word and never validate them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Instruction(pub u64);

impl Instruction {
    /// Assembles an instruction word from its fields.
    ///
    /// Register indices are truncated to 4 bits.
    pub fn encode(opcode: u8, rd: usize, rn: usize, rm: usize, imm: u32) -> Self {
        Self(
            ((opcode as u64) << OPCODE_SHIFT)
                | ((rd as u64 & REG_MASK) << RD_SHIFT)
                | ((rn as u64 & REG_MASK) << RN_SHIFT)
                | ((rm as u64 & REG_MASK) << RM_SHIFT)
                | ((imm as u64 & IMM_MASK) << IMM_SHIFT),
        )
    }

    /// Three-register form: `OP Rd, Rn, Rm`.
    pub fn rrr(opcode: u8, rd: usize, rn: usize, rm: usize) -> Self {
        Self::encode(opcode, rd, rn, rm, 0)
    }

    /// Register-immediate form with a signed integer payload: `OP Rd, Rn, #imm`.
    pub fn rri(opcode: u8, rd: usize, rn: usize, imm: i32) -> Self {
        Self::encode(opcode, rd, rn, 0, imm as u32)
    }

    /// Register-immediate form with a single-precision payload: `OP Rd, Rn, #f`.
    pub fn rrf(opcode: u8, rd: usize, rn: usize, imm: f32) -> Self {
        Self::encode(opcode, rd, rn, 0, imm.to_bits())
    }

    /// PC-relative branch with a byte offset.
    pub fn branch(opcode: u8, offset: i32) -> Self {
        Self::encode(opcode, 0, 0, 0, offset as u32)
    }

    /// Load: `OP Rd, [Rn, #offset]`.
    pub fn load(opcode: u8, rd: usize, rn: usize, offset: i32) -> Self {
        Self::encode(opcode, rd, rn, 0, offset as u32)
    }

    /// Store: `OP Rm, [Rn, #offset]`.
    pub fn store(opcode: u8, rm: usize, rn: usize, offset: i32) -> Self {
        Self::encode(opcode, 0, rn, rm, offset as u32)
    }

    /// `SWI`.
    pub fn swi() -> Self {
        Self::encode(opcodes::SWI, 0, 0, 0, 0)
    }

    /// `NOP`.
    pub fn nop() -> Self {
        Self::encode(opcodes::NOP, 0, 0, 0, 0)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn opcode(self) -> u8 {
        (self.0 >> OPCODE_SHIFT) as u8
    }

    pub fn rd(self) -> usize {
        ((self.0 >> RD_SHIFT) & REG_MASK) as usize
    }

    pub fn rn(self) -> usize {
        ((self.0 >> RN_SHIFT) & REG_MASK) as usize
    }

    pub fn rm(self) -> usize {
        ((self.0 >> RM_SHIFT) & REG_MASK) as usize
    }

    /// Raw 32-bit immediate field.
    pub fn imm(self) -> u32 {
        ((self.0 >> IMM_SHIFT) & IMM_MASK) as u32
    }

    /// Immediate field sign-extended to 64 bits.
    pub fn imm_signed(self) -> i64 {
        self.imm() as i32 as i64
    }

    /// Immediate field reinterpreted as an IEEE-754 single-precision value.
    pub fn imm_float(self) -> f32 {
        f32::from_bits(self.imm())
    }
}

impl From<u64> for Instruction {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Instruction> for u64 {
    fn from(inst: Instruction) -> Self {
        inst.0
    }
}
