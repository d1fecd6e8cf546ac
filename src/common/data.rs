//! Data-Memory Access Types.
//!
//! Classification of the requests a Processing Element places on its private
//! cache channel. The responder on the far side of the channel uses these to
//! decide how many bytes to move and in which direction.

/// Direction of a data-memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read access (`LDR`, `LDRB`).
    Read,

    /// Data write access (`STR`, `STRB`).
    Write,
}

/// Width of a data-memory access.
///
/// The special-read flag on the cache channel selects byte access; every
/// other request moves a full 64-bit little-endian word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessWidth {
    /// Single byte, zero-extended on read.
    Byte,

    /// 64-bit double word.
    Double,
}

impl AccessWidth {
    /// Number of bytes moved by an access of this width.
    pub fn bytes(self) -> usize {
        match self {
            AccessWidth::Byte => 1,
            AccessWidth::Double => 8,
        }
    }
}
