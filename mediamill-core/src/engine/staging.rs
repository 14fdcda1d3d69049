//! Staged-slot management for the engine's private storage namespace.
//!
//! Every byte buffer the engine reads, and every output it writes, lives
//! in a uniquely-named slot under the engine's scratch directory. A slot
//! is an RAII guard: dropping it reclaims the storage on every exit path,
//! so a failed job can never leak staged bytes into the shared namespace.

use crate::error::{CoreError, CoreResult};
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Produces slot names that cannot collide across concurrent jobs: a
/// process-wide monotonic counter plus a random suffix.
#[derive(Debug, Default)]
pub(crate) struct SlotNamer {
    counter: AtomicU64,
}

impl SlotNamer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_name(&self, prefix: &str, extension: &str) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!("{prefix}_{seq}_{suffix}.{extension}")
    }
}

/// A uniquely-named file slot inside the engine's scratch directory.
///
/// The backing file is deleted when the slot is dropped. A reserved slot
/// whose file was never produced unstages as a no-op.
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Stages `bytes` into the namespace under `name`.
    pub(crate) fn write(dir: &Path, name: String, bytes: &[u8]) -> CoreResult<Self> {
        let path = dir.join(name);
        fs::write(&path, bytes)?;
        log::debug!("staged {} ({} bytes)", path.display(), bytes.len());
        Ok(Self { path })
    }

    /// Reserves a slot name without creating the file; the engine
    /// invocation is expected to produce it.
    pub(crate) fn reserve(dir: &Path, name: String) -> Self {
        Self {
            path: dir.join(name),
        }
    }

    /// The slot's bare name inside the namespace.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the slot's full content back out of the namespace.
    pub fn read(&self) -> CoreResult<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CoreError::OutputMissing(self.file_name().to_string())
            } else {
                CoreError::Io(e)
            }
        })
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                log::warn!("failed to unstage {}: {}", self.path.display(), e);
            }
        } else {
            log::debug!("unstaged {}", self.path.display());
        }
    }
}
