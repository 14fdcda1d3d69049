//! Media duration probing.
//!
//! Progress reporting needs the input's duration to turn the engine's
//! out-time clock into a fraction. Probing is best-effort: a job whose
//! input cannot be probed still runs, it just reports no progress.

use crate::error::{CoreError, CoreResult};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Something that can report a media file's duration.
pub trait MediaProber: Send + Sync {
    /// Duration of the media at `path` in seconds, if the container
    /// declares one.
    fn duration_secs(&self, path: &Path) -> CoreResult<Option<f64>>;
}

/// Concrete `MediaProber` backed by the ffprobe binary.
#[derive(Debug, Clone, Default)]
pub struct FfprobeProber;

impl MediaProber for FfprobeProber {
    fn duration_secs(&self, path: &Path) -> CoreResult<Option<f64>> {
        log::debug!("probing duration of {}", path.display());
        match ffprobe(path) {
            Ok(metadata) => Ok(metadata
                .format
                .duration
                .as_deref()
                .and_then(|d| d.parse::<f64>().ok())),
            Err(err) => Err(map_ffprobe_error(err)),
        }
    }
}

fn map_ffprobe_error(err: FfProbeError) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => CoreError::ProbeFailed(format!("ffprobe: {io_err}")),
        FfProbeError::Status(output) => CoreError::ProbeFailed(format!(
            "ffprobe exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        FfProbeError::Deserialize(err) => {
            CoreError::ProbeFailed(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::ProbeFailed(format!("unknown ffprobe error: {err:?}")),
    }
}
