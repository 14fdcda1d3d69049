//! Engine process abstraction.
//!
//! Spawning of the embedded transcoder is hidden behind the
//! `EngineSpawner` / `EngineProcess` traits so the job runner can be
//! exercised against scripted processes in tests. The production
//! implementation drives ffmpeg through ffmpeg-sidecar.

use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use crate::utils::parse_engine_time;
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// A single event surfaced by a running engine invocation.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Transcode position, in seconds of output media time.
    Progress { out_time_secs: f64 },
    /// A line of engine log output.
    Log(String),
    /// An error line on the engine's diagnostic stream.
    Error(String),
}

/// An active engine invocation.
pub trait EngineProcess: Send {
    /// Drains events from the running invocation into the handler.
    fn handle_events(&mut self, handler: &mut dyn FnMut(EngineEvent)) -> CoreResult<()>;

    /// Waits for the invocation to finish and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Something that can verify and spawn engine invocations.
pub trait EngineSpawner: Send + Sync {
    /// Verifies the engine binary can be started at all. Called once, from
    /// engine initialization.
    fn preflight(&self) -> CoreResult<()>;

    /// Spawns one engine invocation with `args`, rooted in `scratch_dir` so
    /// bare slot names in the argument list resolve inside the engine's
    /// private namespace.
    fn spawn(&self, args: &[String], scratch_dir: &Path) -> CoreResult<Box<dyn EngineProcess>>;
}

// --- Concrete implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing
/// `EngineProcess`.
pub struct SidecarProcess(FfmpegChild);

impl EngineProcess for SidecarProcess {
    fn handle_events(&mut self, handler: &mut dyn FnMut(EngineEvent)) -> CoreResult<()> {
        let iterator = self.0.iter().map_err(|e| {
            command_failed_error("ffmpeg", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            match event {
                FfmpegEvent::Progress(progress) => {
                    let out_time_secs = parse_engine_time(&progress.time)
                        .or_else(|| progress.time.parse::<f64>().ok())
                        .unwrap_or(0.0);
                    handler(EngineEvent::Progress { out_time_secs });
                }
                FfmpegEvent::Log(_level, message) => handler(EngineEvent::Log(message)),
                FfmpegEvent::Error(error) => handler(EngineEvent::Error(error)),
                _ => {}
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete `EngineSpawner` backed by ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl EngineSpawner for SidecarSpawner {
    fn preflight(&self) -> CoreResult<()> {
        let result = Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match result {
            Ok(status) if status.success() => {
                log::debug!("found engine binary: ffmpeg");
                Ok(())
            }
            Ok(status) => Err(command_failed_error(
                "ffmpeg",
                status,
                "version check exited unsuccessfully",
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("engine binary 'ffmpeg' not found on PATH");
                Err(CoreError::DependencyNotFound("ffmpeg".to_string()))
            }
            Err(e) => Err(command_start_error("ffmpeg", e)),
        }
    }

    fn spawn(&self, args: &[String], scratch_dir: &Path) -> CoreResult<Box<dyn EngineProcess>> {
        let mut cmd = FfmpegCommand::new();
        cmd.args(["-hide_banner", "-y"]);
        cmd.args(args.iter().map(String::as_str));
        cmd.as_inner_mut().current_dir(scratch_dir);
        log::debug!("spawning engine: {cmd:?}");
        cmd.spawn()
            .map(|child| Box::new(SidecarProcess(child)) as Box<dyn EngineProcess>)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}
