//! Reference Data-Memory Responder.
//!
//! The simulator treats the data cache as an external collaborator that
//! only has to honor the cache-channel contract: observe `{address, write
//! enable, special, request}` and answer with `{data, ready}`. This module
//! provides the simplest such collaborator, one thread serving all four
//! channels from a shared flat RAM, so load/store programs can run
//! end-to-end.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, trace, warn};

use crate::common::data::{AccessType, AccessWidth};
use crate::common::error::SimError;
use crate::soc::traits::DataBackend;
use crate::sync::shared::{CacheRequest, SharedSystemState};

/// Flat byte-addressable RAM.
#[derive(Debug, Clone)]
pub struct DataRam {
    bytes: Vec<u8>,
}

impl DataRam {
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    fn range(&self, addr: u64, width: AccessWidth) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(addr).ok()?;
        let end = start.checked_add(width.bytes())?;
        (end <= self.bytes.len()).then_some(start..end)
    }
}

impl DataBackend for DataRam {
    fn name(&self) -> &str {
        "ram"
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&mut self, addr: u64, width: AccessWidth) -> Option<u64> {
        let range = self.range(addr, width)?;
        let mut buf = [0u8; 8];
        buf[..width.bytes()].copy_from_slice(&self.bytes[range]);
        Some(u64::from_le_bytes(buf))
    }

    fn write(&mut self, addr: u64, width: AccessWidth, value: u64) -> bool {
        let Some(range) = self.range(addr, width) else {
            return false;
        };
        self.bytes[range].copy_from_slice(&value.to_le_bytes()[..width.bytes()]);
        true
    }
}

/// Performs one channel request against `backend`.
///
/// Out-of-range accesses are logged and answered with 0 so the requesting
/// element is never left stalled.
///
/// # Returns
///
/// The data to return on the channel (0 for writes).
pub fn service(backend: &mut dyn DataBackend, pe: usize, req: &CacheRequest) -> u64 {
    let width = if req.special {
        AccessWidth::Byte
    } else {
        AccessWidth::Double
    };
    let kind = if req.write_enable {
        AccessType::Write
    } else {
        AccessType::Read
    };

    trace!(
        "dmem: PE{} {:?} {:?} addr={:#x} seq={}",
        pe,
        kind,
        width,
        req.address,
        req.seq
    );

    match kind {
        AccessType::Read => backend.read(req.address, width).unwrap_or_else(|| {
            warn!(
                "PE{} read of {:#x} outside {} ({} bytes)",
                pe,
                req.address,
                backend.name(),
                backend.size()
            );
            0
        }),
        AccessType::Write => {
            if !backend.write(req.address, width, req.write_data) {
                warn!(
                    "PE{} write to {:#x} outside {} ({} bytes)",
                    pe,
                    req.address,
                    backend.name(),
                    backend.size()
                );
            }
            0
        }
    }
}

/// Responder thread owning a data backend.
pub struct DataMemory {
    shared: Arc<SharedSystemState>,
    backend: Option<Box<dyn DataBackend>>,
    poll: Duration,
    handle: Option<JoinHandle<Box<dyn DataBackend>>>,
}

impl DataMemory {
    pub fn new(shared: Arc<SharedSystemState>, backend: Box<dyn DataBackend>, poll: Duration) -> Self {
        Self {
            shared,
            backend: Some(backend),
            poll,
            handle: None,
        }
    }

    /// Spawns the responder thread.
    pub fn start(&mut self) -> Result<(), SimError> {
        let Some(mut backend) = self.backend.take() else {
            return Err(SimError::AlreadyInitialized);
        };
        let shared = Arc::clone(&self.shared);
        let poll = self.poll;
        let name = "dmem-responder".to_string();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                info!("data memory responder started ({} bytes)", backend.size());
                while !shared.stop_requested() {
                    for (idx, pe) in shared.pes.iter().enumerate() {
                        if let Some(req) = pe.cache.pending() {
                            let data = service(&mut *backend, idx, &req);
                            pe.cache.complete(req.seq, data);
                        }
                    }
                    if poll.is_zero() {
                        thread::yield_now();
                    } else {
                        thread::sleep(poll);
                    }
                }
                info!("data memory responder stopped");
                backend
            })
            .map_err(|source| SimError::Spawn { name, source })?;

        self.handle = Some(handle);
        Ok(())
    }

    /// Joins the responder after the global stop flag has been raised and
    /// takes the backend back, so its contents can be inspected.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(backend) => self.backend = Some(backend),
                Err(_) => warn!("data memory responder panicked"),
            }
        }
    }

    /// The backend, available before `start` and after `join`.
    pub fn backend(&mut self) -> Option<&mut (dyn DataBackend + 'static)> {
        self.backend.as_deref_mut()
    }
}
