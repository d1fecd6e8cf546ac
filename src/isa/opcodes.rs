//! Opcode constants.
//!
//! Opcodes `0x00..=0x5A` are defined. Anything above `LAST_DEFINED` is
//! reserved and decodes as `NOP`.

pub const ADD: u8 = 0x00;
pub const SUB: u8 = 0x01;
pub const ADC: u8 = 0x02;
pub const SBC: u8 = 0x03;
pub const MUL: u8 = 0x04;
pub const DIV: u8 = 0x05;
pub const AND: u8 = 0x06;
pub const ORR: u8 = 0x07;
pub const EOR: u8 = 0x08;
pub const BIC: u8 = 0x09;
pub const LSL: u8 = 0x0A;
pub const LSR: u8 = 0x0B;
pub const ASR: u8 = 0x0C;
pub const ROR: u8 = 0x0D;

pub const ADDI: u8 = 0x0E;
pub const SUBI: u8 = 0x0F;
pub const ADCI: u8 = 0x10;
pub const SBCI: u8 = 0x11;
pub const MULI: u8 = 0x12;
pub const DIVI: u8 = 0x13;
pub const ANDI: u8 = 0x14;
pub const ORRI: u8 = 0x15;
pub const EORI: u8 = 0x16;
pub const BICI: u8 = 0x17;
pub const LSLI: u8 = 0x18;
pub const LSRI: u8 = 0x19;
pub const ASRI: u8 = 0x1A;
pub const RORI: u8 = 0x1B;
pub const INC: u8 = 0x1C;
pub const DEC: u8 = 0x1D;

pub const FADD: u8 = 0x1E;
pub const FSUB: u8 = 0x1F;
pub const FMUL: u8 = 0x20;
pub const FDIV: u8 = 0x21;
pub const FCOPYSIGN: u8 = 0x22;
pub const FADDI: u8 = 0x23;
pub const FSUBI: u8 = 0x24;
pub const FMULI: u8 = 0x25;
pub const FDIVI: u8 = 0x26;
pub const FCOPYSIGNI: u8 = 0x27;
pub const FSQRT: u8 = 0x28;
pub const FNEG: u8 = 0x29;
pub const FABS: u8 = 0x2A;
pub const CDTI: u8 = 0x2B;
pub const CDTD: u8 = 0x2C;
pub const RTNR: u8 = 0x2D;
pub const RTZ: u8 = 0x2E;
pub const RTP: u8 = 0x2F;
pub const RTNE: u8 = 0x30;

pub const MOV: u8 = 0x31;
pub const MVN: u8 = 0x32;
pub const MOVI: u8 = 0x33;
pub const MVNI: u8 = 0x34;
pub const FMOVI: u8 = 0x35;
pub const FMVNI: u8 = 0x36;

pub const CMP: u8 = 0x37;
pub const CMN: u8 = 0x38;
pub const TST: u8 = 0x39;
pub const TEQ: u8 = 0x3A;
pub const CMPI: u8 = 0x3B;
pub const CMNI: u8 = 0x3C;
pub const TSTI: u8 = 0x3D;
pub const TEQI: u8 = 0x3E;
pub const FCMP: u8 = 0x3F;
pub const FCMN: u8 = 0x40;
pub const FCMPS: u8 = 0x41;
pub const FCMPI: u8 = 0x42;
pub const FCMNI: u8 = 0x43;
pub const FCMPSI: u8 = 0x44;

pub const B: u8 = 0x45;
pub const BEQ: u8 = 0x46;
pub const BNE: u8 = 0x47;
pub const BLT: u8 = 0x48;
pub const BGT: u8 = 0x49;
pub const BUN: u8 = 0x4A;
pub const BORD: u8 = 0x4B;

pub const SWI: u8 = 0x4C;
pub const NOP: u8 = 0x4D;

pub const LDR: u8 = 0x4E;
pub const STR: u8 = 0x4F;
pub const LDRB: u8 = 0x50;
pub const STRB: u8 = 0x51;

pub const FSQRTI: u8 = 0x52;
pub const FNEGI: u8 = 0x53;
pub const FABSI: u8 = 0x54;
pub const CDTII: u8 = 0x55;
pub const CDTDI: u8 = 0x56;
pub const RTNRI: u8 = 0x57;
pub const RTZI: u8 = 0x58;
pub const RTPI: u8 = 0x59;
pub const RTNEI: u8 = 0x5A;

/// Highest defined opcode.
pub const LAST_DEFINED: u8 = RTNEI;
