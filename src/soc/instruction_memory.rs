//! Instruction Memory Server.
//!
//! One background thread serves instruction fetches for every Processing
//! Element from an in-memory copy of the instruction image. It is a
//! level-triggered polling producer: each round it compares every
//! element's published fetch address with the last address it served and,
//! on a change, publishes the 8-byte little-endian word at that address.
//!
//! Correctness relies on an element never moving its fetch address while
//! it still waits for the previous one, which the pipeline guarantees by
//! stalling Fetch until the response for the current PC is visible.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, trace, warn};

use crate::common::constants::{ERROR_INSTRUCTION, INSTRUCTION_BYTES, NUM_PES};
use crate::common::error::SimError;
use crate::sim::loader;
use crate::sync::shared::SharedSystemState;

/// Where the instruction image comes from.
#[derive(Clone, Debug, Default)]
pub enum ImageSource {
    /// Flat binary file, re-read on every reload.
    File(PathBuf),
    /// In-memory image.
    Bytes(Vec<u8>),
    /// No image; every fetch returns the error instruction.
    #[default]
    Empty,
}

impl ImageSource {
    /// Loads the image, degrading to an empty image if a file cannot be
    /// read.
    pub fn load(&self) -> Vec<u8> {
        match self {
            ImageSource::File(path) => loader::load_image(path).unwrap_or_else(|e| {
                warn!("{}; instruction memory is empty", e);
                Vec::new()
            }),
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::Empty => Vec::new(),
        }
    }
}

/// Reads the instruction word at byte address `addr`.
///
/// # Returns
///
/// The little-endian word, or `ERROR_INSTRUCTION` when `addr + 8` exceeds
/// the image.
pub fn fetch_word(memory: &[u8], addr: u64) -> u64 {
    let Ok(start) = usize::try_from(addr) else {
        return ERROR_INSTRUCTION;
    };
    match start.checked_add(INSTRUCTION_BYTES as usize) {
        Some(end) if end <= memory.len() => {
            let mut word = [0u8; 8];
            word.copy_from_slice(&memory[start..end]);
            u64::from_le_bytes(word)
        }
        _ => ERROR_INSTRUCTION,
    }
}

/// Handshake between the server thread and its owner.
#[derive(Debug, Default)]
struct ServerControl {
    reload_requested: AtomicBool,
    /// Incremented by the thread after each completed reload.
    generation: AtomicU64,
    image_len: AtomicUsize,
}

/// The instruction memory server and its thread.
pub struct InstructionMemoryServer {
    shared: Arc<SharedSystemState>,
    source: ImageSource,
    poll: Duration,
    control: Arc<ServerControl>,
    handle: Option<JoinHandle<()>>,
}

impl InstructionMemoryServer {
    pub fn new(shared: Arc<SharedSystemState>, source: ImageSource, poll: Duration) -> Self {
        Self {
            shared,
            source,
            poll,
            control: Arc::new(ServerControl::default()),
            handle: None,
        }
    }

    /// Loads the image and spawns the server thread.
    ///
    /// A missing or unreadable image file is not an error: the server
    /// starts with an empty image.
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.handle.is_some() {
            return Err(SimError::AlreadyInitialized);
        }

        let memory = self.source.load();
        info!("instruction memory loaded ({} bytes)", memory.len());
        self.control.image_len.store(memory.len(), Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let control = Arc::clone(&self.control);
        let source = self.source.clone();
        let poll = self.poll;
        let name = "imem-server".to_string();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || serve(shared, control, source, memory, poll))
            .map_err(|source| SimError::Spawn { name, source })?;

        self.handle = Some(handle);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Size of the image currently served.
    pub fn image_len(&self) -> usize {
        self.control.image_len.load(Ordering::Acquire)
    }

    /// Reloads the image from its source.
    ///
    /// Dispatch pauses while the thread reloads; every element's last
    /// served address and ready flag are reset, so each element is served
    /// again from the new image.
    ///
    /// # Returns
    ///
    /// The size of the new image in bytes.
    pub fn reload(&self, timeout: Duration) -> Result<usize, SimError> {
        if self.handle.is_none() {
            return Err(SimError::NotInitialized);
        }
        let generation = self.control.generation.load(Ordering::Acquire);
        self.control.reload_requested.store(true, Ordering::Release);

        let deadline = Instant::now() + timeout;
        while self.control.generation.load(Ordering::Acquire) == generation {
            if Instant::now() >= deadline {
                return Err(SimError::ReloadTimeout(timeout.as_millis() as u64));
            }
            thread::sleep(Duration::from_micros(50));
        }
        Ok(self.image_len())
    }

    /// Joins the server thread. The global stop flag must already be set.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("instruction memory server panicked");
            }
        }
    }
}

fn serve(
    shared: Arc<SharedSystemState>,
    control: Arc<ServerControl>,
    source: ImageSource,
    mut memory: Vec<u8>,
    poll: Duration,
) {
    // Address last served per PE; `None` until the first serve.
    let mut last: [Option<u64>; NUM_PES] = [None; NUM_PES];
    info!("instruction memory server started");

    while !shared.stop_requested() {
        if control.reload_requested.load(Ordering::Acquire) {
            for pe in &shared.pes {
                pe.fetch.invalidate();
            }
            memory = source.load();
            last = [None; NUM_PES];
            control.image_len.store(memory.len(), Ordering::Release);
            control.reload_requested.store(false, Ordering::Release);
            control.generation.fetch_add(1, Ordering::AcqRel);
            info!("instruction memory reloaded ({} bytes)", memory.len());
        }

        for (idx, pe) in shared.pes.iter().enumerate() {
            let pc = pe.fetch.pc.load(Ordering::Acquire);
            if last[idx] == Some(pc) {
                continue;
            }
            let word = fetch_word(&memory, pc);
            pe.fetch.serve(pc, word);
            last[idx] = Some(pc);
            trace!("imem: PE{} pc={:#x} -> {:#018x}", idx, pc, word);
        }

        if poll.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(poll);
        }
    }

    info!("instruction memory server stopped");
}
