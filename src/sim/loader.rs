//! Instruction Image Loading.
//!
//! Instruction images are flat binaries: a sequence of 8-byte
//! little-endian words with no header, word `n` at byte address `8 * n`.

use std::fs;
use std::path::Path;

use crate::common::error::SimError;
use crate::isa::Instruction;

/// Reads an image file from disk.
pub fn load_image(path: impl AsRef<Path>) -> Result<Vec<u8>, SimError> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds an image from raw instruction words.
pub fn image_from_words(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Builds an image from encoded instructions.
pub fn image_from_instructions(program: &[Instruction]) -> Vec<u8> {
    program.iter().flat_map(|i| i.raw().to_le_bytes()).collect()
}

/// Writes an image file.
pub fn write_image(path: impl AsRef<Path>, program: &[Instruction]) -> Result<(), SimError> {
    let path = path.as_ref();
    fs::write(path, image_from_instructions(program)).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })
}
