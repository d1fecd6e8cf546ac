//! Data-Memory Backend Interface.
//!
//! The cache channel of each Processing Element is answered by a responder
//! thread; the storage it reads and writes sits behind this trait so that
//! a richer cache or coherence model can replace the flat RAM.

use crate::common::data::AccessWidth;

/// Storage answering data-cache requests.
pub trait DataBackend: Send {
    /// Returns the user-friendly name of the backend.
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Addressable size in bytes.
    fn size(&self) -> usize;

    /// Reads `width` bytes at `addr`, little-endian and zero-extended.
    ///
    /// # Returns
    ///
    /// `None` if the access falls outside the backend.
    fn read(&mut self, addr: u64, width: AccessWidth) -> Option<u64>;

    /// Writes the low `width` bytes of `value` at `addr`, little-endian.
    ///
    /// # Returns
    ///
    /// `false` if the access falls outside the backend.
    fn write(&mut self, addr: u64, width: AccessWidth, value: u64) -> bool;
}
