//! The multi-core system.
//!
//! `CpuSystem` owns the shared state and every background thread: one per
//! Processing Element, the instruction memory server and, when enabled,
//! the data-memory responder. Front ends drive the elements through
//! `PeHandle`s obtained from the system.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::common::constants::NUM_PES;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::pe::{runner, ProcessingElement};
use crate::sim::handle::PeHandle;
use crate::soc::data_memory::{DataMemory, DataRam};
use crate::soc::instruction_memory::{ImageSource, InstructionMemoryServer};
use crate::soc::traits::DataBackend;
use crate::sync::shared::SharedSystemState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Stopped,
}

pub struct CpuSystem {
    config: Config,
    shared: Arc<SharedSystemState>,
    imem: InstructionMemoryServer,
    dmem: Option<DataMemory>,
    pe_threads: Vec<JoinHandle<()>>,
    lifecycle: Lifecycle,
}

impl CpuSystem {
    /// Builds a system serving the image named in the configuration, or an
    /// empty image if none is named.
    pub fn new(config: Config) -> Self {
        let source = match &config.general.instruction_image {
            Some(path) => ImageSource::File(PathBuf::from(path)),
            None => ImageSource::Empty,
        };
        Self::with_source(config, source)
    }

    /// Builds a system serving an in-memory image.
    pub fn with_image(config: Config, image: Vec<u8>) -> Self {
        Self::with_source(config, ImageSource::Bytes(image))
    }

    pub fn with_source(config: Config, source: ImageSource) -> Self {
        let shared = Arc::new(SharedSystemState::new());

        let imem = InstructionMemoryServer::new(
            Arc::clone(&shared),
            source,
            Duration::from_micros(config.timing.server_poll_us),
        );

        let dmem = config.data_memory.enabled.then(|| {
            DataMemory::new(
                Arc::clone(&shared),
                Box::new(DataRam::new(config.data_memory.size_val())),
                Duration::from_micros(config.timing.responder_poll_us),
            )
        });

        Self {
            config,
            shared,
            imem,
            dmem,
            pe_threads: Vec::with_capacity(NUM_PES),
            lifecycle: Lifecycle::Created,
        }
    }

    /// Starts the memory-side threads and one thread per element.
    ///
    /// Every element starts in its reset state with an `Idle` command.
    /// A system can be initialized once; a stopped system cannot be
    /// restarted.
    pub fn initialize(&mut self) -> Result<(), SimError> {
        if self.lifecycle != Lifecycle::Created {
            return Err(SimError::AlreadyInitialized);
        }
        self.lifecycle = Lifecycle::Running;

        if let Err(e) = self.spawn_all() {
            self.shutdown();
            return Err(e);
        }

        info!(
            "system initialized: {} PEs, image {} bytes, data memory {}",
            NUM_PES,
            self.imem.image_len(),
            if self.dmem.is_some() { "on" } else { "off" }
        );
        Ok(())
    }

    fn spawn_all(&mut self) -> Result<(), SimError> {
        self.imem.start()?;
        if let Some(dmem) = self.dmem.as_mut() {
            dmem.start()?;
        }

        let trace = self.config.trace_enabled();
        for id in 0..NUM_PES {
            let pe = ProcessingElement::new(
                id,
                Arc::clone(&self.shared),
                self.config.pe_config(id),
                trace,
            );
            let timing = self.config.timing.clone();
            let name = format!("pe{}", id);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || runner::run(pe, timing))
                .map_err(|source| SimError::Spawn { name, source })?;
            self.pe_threads.push(handle);
        }
        Ok(())
    }

    /// Raises the global stop flag and joins every thread.
    ///
    /// Elements observe the flag at their next loop iteration, so at most
    /// one cycle per element completes after the call starts. Calling this
    /// more than once is harmless.
    pub fn shutdown(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }
        self.shared.request_stop();

        for (id, handle) in self.pe_threads.drain(..).enumerate() {
            if handle.join().is_err() {
                warn!("PE{} thread panicked", id);
            }
        }
        self.imem.join();
        if let Some(dmem) = self.dmem.as_mut() {
            dmem.join();
        }

        self.lifecycle = Lifecycle::Stopped;
        info!("system shut down");
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Control handle for element `idx`.
    pub fn handle(&self, idx: usize) -> Result<PeHandle, SimError> {
        if idx >= NUM_PES {
            return Err(SimError::InvalidPe(idx));
        }
        Ok(PeHandle::new(idx, Arc::clone(&self.shared)))
    }

    /// One handle per element, in index order.
    pub fn handles(&self) -> Vec<PeHandle> {
        (0..NUM_PES)
            .map(|idx| PeHandle::new(idx, Arc::clone(&self.shared)))
            .collect()
    }

    /// Re-reads the instruction image while the system runs.
    ///
    /// # Returns
    ///
    /// The size of the new image in bytes.
    pub fn reload_instruction_memory(&self) -> Result<usize, SimError> {
        if self.lifecycle != Lifecycle::Running {
            return Err(SimError::NotInitialized);
        }
        let timeout = Duration::from_millis(self.config.timing.reload_timeout_ms);
        let len = self.imem.reload(timeout)?;
        info!("instruction memory reloaded: {} bytes", len);
        Ok(len)
    }

    /// Shared state, for telemetry readers.
    pub fn shared(&self) -> Arc<SharedSystemState> {
        Arc::clone(&self.shared)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The data-memory backend. Only reachable while the responder thread
    /// is not running (before `initialize` or after `shutdown`).
    pub fn data_memory(&mut self) -> Option<&mut (dyn DataBackend + 'static)> {
        self.dmem.as_mut()?.backend()
    }
}

impl Drop for CpuSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}
