//! NZCV condition flags.

use std::fmt;

/// Packed NZCV condition flags (`N = 8, Z = 4, C = 2, V = 1`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const N: u8 = 0x8;
    pub const Z: u8 = 0x4;
    pub const C: u8 = 0x2;
    pub const V: u8 = 0x1;

    /// Builds flags from a raw nibble. Upper bits are discarded.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0xF)
    }

    pub fn from_nzcv(n: bool, z: bool, c: bool, v: bool) -> Self {
        Self(
            (if n { Self::N } else { 0 })
                | (if z { Self::Z } else { 0 })
                | (if c { Self::C } else { 0 })
                | (if v { Self::V } else { 0 }),
        )
    }

    /// N and Z from a 64-bit result, keeping C and V from `self`.
    pub fn with_nz(self, result: u64) -> Self {
        Self::from_nzcv((result as i64) < 0, result == 0, self.c(), self.v())
    }

    /// N and Z from a 64-bit result with C and V cleared.
    pub fn nz(result: u64) -> Self {
        Self::from_nzcv((result as i64) < 0, result == 0, false, false)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn n(self) -> bool {
        self.0 & Self::N != 0
    }

    pub fn z(self) -> bool {
        self.0 & Self::Z != 0
    }

    pub fn c(self) -> bool {
        self.0 & Self::C != 0
    }

    pub fn v(self) -> bool {
        self.0 & Self::V != 0
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            bit(self.n(), 'N'),
            bit(self.z(), 'Z'),
            bit(self.c(), 'C'),
            bit(self.v(), 'V')
        )
    }
}
