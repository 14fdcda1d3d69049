//! Core configuration.
//!
//! Instances of `CoreConfig` are created by consumers of the library (like
//! mediamill-cli) and handed to `EngineHandle::new` to control where the
//! engine keeps its private scratch storage.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Configuration for the mediamill-core library.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    /// Base directory under which the engine creates its private scratch
    /// directory. Defaults to the system temp directory.
    pub scratch_base: Option<PathBuf>,
}

impl CoreConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that the configured paths are usable before the engine loads.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(base) = &self.scratch_base {
            if base.as_os_str().is_empty() {
                return Err(CoreError::Config(
                    "scratch base directory must not be empty".to_string(),
                ));
            }
            if base.exists() && !base.is_dir() {
                return Err(CoreError::Config(format!(
                    "scratch base '{}' exists but is not a directory",
                    base.display()
                )));
            }
        }
        Ok(())
    }

    /// The directory the engine's scratch directory is created in.
    #[must_use]
    pub fn scratch_base_dir(&self) -> PathBuf {
        self.scratch_base
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_file_as_scratch_base() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = CoreConfig {
            scratch_base: Some(file.path().to_path_buf()),
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_accepts_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            scratch_base: Some(dir.path().to_path_buf()),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.scratch_base_dir(), dir.path());
    }
}
