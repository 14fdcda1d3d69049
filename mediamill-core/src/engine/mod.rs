//! Engine lifecycle, private storage, and serialized invocation.
//!
//! One `Engine` instance is shared by every job in the process. It owns
//! the scratch directory that stands in for the transcoder's storage
//! namespace, and it serializes invocations so concurrent jobs cannot
//! corrupt each other's staged inputs, outputs, or progress stream.
//!
//! The `EngineHandle` is the capability through which all call sites reach
//! the engine: constructed once at process start, lazily initializing the
//! engine on first use. Initialization happens exactly once no matter how
//! many callers race into `ensure_loaded`, and a failed initialization is
//! terminal for the process — repeated attempts are expensive and the
//! usual cause (a missing engine binary) will reliably fail again.

mod executor;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;
pub mod staging;

pub use executor::{EngineEvent, EngineProcess, EngineSpawner, SidecarProcess, SidecarSpawner};
pub use staging::StagedFile;

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::probe::{FfprobeProber, MediaProber};
use crate::progress::ProgressRelay;
use once_cell::sync::OnceCell;
use staging::SlotNamer;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Lifecycle of the shared engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

/// Owner of the lazily-initialized shared engine.
pub struct EngineHandle {
    config: CoreConfig,
    spawner: Arc<dyn EngineSpawner>,
    prober: Arc<dyn MediaProber>,
    cell: OnceCell<Result<Arc<Engine>, String>>,
    loading: AtomicBool,
}

impl EngineHandle {
    /// Creates a handle backed by the real engine binary.
    #[must_use]
    pub fn new(config: CoreConfig) -> Self {
        Self::with_parts(config, Arc::new(SidecarSpawner), Arc::new(FfprobeProber))
    }

    /// Creates a handle with injected spawner and prober implementations.
    #[must_use]
    pub fn with_parts(
        config: CoreConfig,
        spawner: Arc<dyn EngineSpawner>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        Self {
            config,
            spawner,
            prober,
            cell: OnceCell::new(),
            loading: AtomicBool::new(false),
        }
    }

    /// Current lifecycle state, for surfaces that render a persistent
    /// "engine unavailable" condition.
    pub fn state(&self) -> EngineState {
        match self.cell.get() {
            Some(Ok(_)) => EngineState::Ready,
            Some(Err(_)) => EngineState::Failed,
            None if self.loading.load(Ordering::SeqCst) => EngineState::Loading,
            None => EngineState::Unloaded,
        }
    }

    /// Returns the ready engine, initializing it on first use.
    ///
    /// Concurrent callers during initialization converge on the same
    /// in-flight attempt. The caller that triggered a failed attempt gets
    /// the initialization error; every later caller gets an
    /// "engine unavailable" error carrying the original message.
    pub fn ensure_loaded(&self) -> CoreResult<Arc<Engine>> {
        let mut first_caller = false;
        let slot = self.cell.get_or_init(|| {
            first_caller = true;
            self.loading.store(true, Ordering::SeqCst);
            let result = Engine::load(&self.config, Arc::clone(&self.spawner));
            self.loading.store(false, Ordering::SeqCst);
            match result {
                Ok(engine) => Ok(Arc::new(engine)),
                Err(e) => {
                    log::error!("engine initialization failed: {e}");
                    Err(e.to_string())
                }
            }
        });
        match slot {
            Ok(engine) => Ok(Arc::clone(engine)),
            Err(message) if first_caller => Err(CoreError::EngineInit(message.clone())),
            Err(message) => Err(CoreError::EngineUnavailable(message.clone())),
        }
    }

    /// The duration prober used for progress-reporting jobs.
    pub fn prober(&self) -> &dyn MediaProber {
        self.prober.as_ref()
    }
}

/// The shared transcoding engine: binary access, private storage, and the
/// invocation lock.
pub struct Engine {
    scratch: TempDir,
    spawner: Arc<dyn EngineSpawner>,
    namer: SlotNamer,
    exec_lock: Mutex<()>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scratch", &self.scratch.path())
            .field("namer", &self.namer)
            .finish_non_exhaustive()
    }
}

impl Engine {
    fn load(config: &CoreConfig, spawner: Arc<dyn EngineSpawner>) -> CoreResult<Self> {
        config.validate()?;
        spawner.preflight()?;
        let base = config.scratch_base_dir();
        std::fs::create_dir_all(&base)?;
        let scratch = TempFileBuilder::new()
            .prefix("mediamill_")
            .tempdir_in(&base)?;
        log::info!("engine ready, scratch namespace at {}", scratch.path().display());
        Ok(Self {
            scratch,
            spawner,
            namer: SlotNamer::new(),
            exec_lock: Mutex::new(()),
        })
    }

    /// The engine's private storage directory.
    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Copies `bytes` into the private namespace under a collision-proof
    /// slot name. The returned guard unstages the slot when dropped.
    pub fn stage(&self, prefix: &str, extension: &str, bytes: &[u8]) -> CoreResult<StagedFile> {
        let name = self.namer.next_name(prefix, extension);
        StagedFile::write(self.scratch.path(), name, bytes)
    }

    /// Reserves a uniquely-named output slot. The engine invocation is
    /// expected to create the file; the guard reclaims it either way.
    #[must_use]
    pub fn reserve_output(&self, prefix: &str, extension: &str) -> StagedFile {
        StagedFile::reserve(self.scratch.path(), self.namer.next_name(prefix, extension))
    }

    /// Runs one engine invocation to completion.
    ///
    /// Invocations are serialized: at most one is in flight at any
    /// instant, because the engine's storage namespace and progress stream
    /// are shared. The optional relay receives progress for this
    /// invocation only.
    pub fn invoke(&self, args: &[String], mut relay: Option<ProgressRelay<'_>>) -> CoreResult<()> {
        let _exec_guard = self
            .exec_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        log::debug!("engine invocation: {}", args.join(" "));

        let mut process = self.spawner.spawn(args, self.scratch.path())?;
        let mut stderr_buffer = String::new();
        process.handle_events(&mut |event| match event {
            EngineEvent::Progress { out_time_secs } => {
                if let Some(relay) = relay.as_mut() {
                    relay.observe_seconds(out_time_secs);
                }
            }
            EngineEvent::Log(line) | EngineEvent::Error(line) => {
                stderr_buffer.push_str(&line);
                stderr_buffer.push('\n');
            }
        })?;

        let status = process.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(command_failed_error(
                "ffmpeg",
                status,
                stderr_buffer.trim_end().to_string(),
            ))
        }
    }
}
