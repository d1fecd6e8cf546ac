//! Instruction Disassembler.
//!
//! Converts raw 64-bit instruction words into human-readable assembly
//! text. The output is used both by the pipeline trace and by anything
//! rendering the per-stage instruction tracking snapshot.

use std::fmt::Write;

use crate::common::constants::FLUSH_INSTRUCTION;
use crate::isa::instruction::Instruction;
use crate::isa::opcodes as op;

/// Operand layout of an instruction, selected by opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// `Rd, Rn, Rm`
    RegRegReg,
    /// `Rd, Rn, #int`
    RegRegInt,
    /// `Rd, Rn, #float`
    RegRegFloat,
    /// `Rd, Rm`
    RegReg,
    /// `Rd, #int`
    RegInt,
    /// `Rd, #float`
    RegFloat,
    /// `Rn, Rm`
    Compare,
    /// `Rn, #int`
    CompareInt,
    /// `Rn, #float`
    CompareFloat,
    /// `label_<offset>`
    Branch,
    /// `Rd, [Rn, #off]`
    Load,
    /// `Rm, [Rn, #off]`
    Store,
    None,
    Unknown,
}

fn format_of(opcode: u8) -> Format {
    match opcode {
        op::ADD..=op::ROR | op::FADD..=op::FCOPYSIGN => Format::RegRegReg,
        op::ADDI..=op::RORI => Format::RegRegInt,
        op::FADDI..=op::FCOPYSIGNI => Format::RegRegFloat,
        op::FSQRT..=op::MVN => Format::RegReg,
        op::INC | op::DEC | op::MOVI | op::MVNI => Format::RegInt,
        op::FMOVI | op::FMVNI | op::FSQRTI..=op::RTNEI => Format::RegFloat,
        op::CMP..=op::TEQ | op::FCMP..=op::FCMPS => Format::Compare,
        op::CMPI..=op::TEQI => Format::CompareInt,
        op::FCMPI..=op::FCMPSI => Format::CompareFloat,
        op::B..=op::BORD => Format::Branch,
        op::LDR | op::LDRB => Format::Load,
        op::STR | op::STRB => Format::Store,
        op::SWI | op::NOP => Format::None,
        _ => Format::Unknown,
    }
}

/// Returns the assembler mnemonic for an opcode, or `"???"` if the opcode
/// is reserved.
pub fn mnemonic(opcode: u8) -> &'static str {
    const MNEMONICS: [&str; op::LAST_DEFINED as usize + 1] = [
        "ADD", "SUB", "ADC", "SBC", "MUL", "DIV", "AND", "ORR", "EOR", "BIC", "LSL", "LSR", "ASR",
        "ROR", "ADDI", "SUBI", "ADCI", "SBCI", "MULI", "DIVI", "ANDI", "ORRI", "EORI", "BICI",
        "LSLI", "LSRI", "ASRI", "RORI", "INC", "DEC", "FADD", "FSUB", "FMUL", "FDIV",
        "FCOPYSIGN", "FADDI", "FSUBI", "FMULI", "FDIVI", "FCOPYSIGNI", "FSQRT", "FNEG", "FABS",
        "CDTI", "CDTD", "RTNR", "RTZ", "RTP", "RTNE", "MOV", "MVN", "MOVI", "MVNI", "FMOVI",
        "FMVNI", "CMP", "CMN", "TST", "TEQ", "CMPI", "CMNI", "TSTI", "TEQI", "FCMP", "FCMN",
        "FCMPS", "FCMPI", "FCMNI", "FCMPSI", "B", "BEQ", "BNE", "BLT", "BGT", "BUN", "BORD",
        "SWI", "NOP", "LDR", "STR", "LDRB", "STRB", "FSQRTI", "FNEGI", "FABSI", "CDTII",
        "CDTDI", "RTNRI", "RTZI", "RTPI", "RTNEI",
    ];
    MNEMONICS.get(opcode as usize).copied().unwrap_or("???")
}

/// Returns the architectural name of a register index.
///
/// Indices 0-8 are `REG0`..`REG8`, followed by `PEID`, `UPPER` and
/// `LOWER`. Anything else renders as `"???"`.
pub fn register_name(idx: usize) -> &'static str {
    const NAMES: [&str; 12] = [
        "REG0", "REG1", "REG2", "REG3", "REG4", "REG5", "REG6", "REG7", "REG8", "PEID", "UPPER",
        "LOWER",
    ];
    NAMES.get(idx).copied().unwrap_or("???")
}

fn int_imm(inst: Instruction) -> String {
    format!("#{}", inst.imm() as i32)
}

fn float_imm(inst: Instruction) -> String {
    format!("#{:.6}", inst.imm_float() as f64)
}

fn address(base: usize, offset: i32) -> String {
    if offset == 0 {
        format!("[{}]", register_name(base))
    } else {
        format!("[{}, #{}]", register_name(base), offset)
    }
}

/// Disassembles a single 64-bit instruction word.
///
/// The pipeline's internal `FLUSH` marker renders as `"FLUSH"` so that
/// squashed slots are distinguishable from real `NOP`s in a trace.
///
/// # Arguments
///
/// * `raw` - The raw instruction word.
///
/// # Returns
///
/// The mnemonic followed by its operands, e.g. `"ADD REG2, REG2, REG1"`.
pub fn disassemble(raw: u64) -> String {
    if raw == FLUSH_INSTRUCTION {
        return "FLUSH".to_string();
    }

    let inst = Instruction(raw);
    let (rd, rn, rm) = (
        register_name(inst.rd()),
        register_name(inst.rn()),
        register_name(inst.rm()),
    );
    let mut out = String::from(mnemonic(inst.opcode()));

    // Writing into a String cannot fail.
    let _ = match format_of(inst.opcode()) {
        Format::RegRegReg => write!(out, " {}, {}, {}", rd, rn, rm),
        Format::RegRegInt => write!(out, " {}, {}, {}", rd, rn, int_imm(inst)),
        Format::RegRegFloat => write!(out, " {}, {}, {}", rd, rn, float_imm(inst)),
        Format::RegReg => write!(out, " {}, {}", rd, rm),
        Format::RegInt => write!(out, " {}, {}", rd, int_imm(inst)),
        Format::RegFloat => write!(out, " {}, {}", rd, float_imm(inst)),
        Format::Compare => write!(out, " {}, {}", rn, rm),
        Format::CompareInt => write!(out, " {}, {}", rn, int_imm(inst)),
        Format::CompareFloat => write!(out, " {}, {}", rn, float_imm(inst)),
        Format::Branch => write!(out, " label_{}", inst.imm() as i32),
        Format::Load => write!(out, " {}, {}", rd, address(inst.rn(), inst.imm() as i32)),
        Format::Store => write!(out, " {}, {}", rm, address(inst.rn(), inst.imm() as i32)),
        Format::None => Ok(()),
        Format::Unknown => write!(out, " (unknown format)"),
    };
    out
}

/// Disassembles a flat little-endian instruction image.
///
/// Trailing bytes that do not form a complete 8-byte word are ignored.
///
/// # Returns
///
/// One `(byte address, raw word, text)` tuple per instruction.
pub fn disassemble_image(image: &[u8]) -> Vec<(u64, u64, String)> {
    image
        .chunks_exact(8)
        .enumerate()
        .map(|(i, chunk)| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            let raw = u64::from_le_bytes(bytes);
            ((i * 8) as u64, raw, disassemble(raw))
        })
        .collect()
}
