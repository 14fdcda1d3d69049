//! Job execution.
//!
//! One operation per job kind, all following the same skeleton: ensure
//! the engine is ready, stage the inputs into its private namespace,
//! invoke it once, read the output slot back, and unstage everything.
//! Unstaging is carried by the slot guards, so it happens on the failure
//! path too — a failed job leaves nothing behind in the shared namespace.

mod args;

use crate::engine::EngineHandle;
use crate::error::{CoreError, CoreResult};
use crate::progress::ProgressRelay;
use std::fmt;
use std::path::Path;

/// An in-memory input: a file name (for its extension) plus full content.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk into memory.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CoreError::InvalidRequest(format!(
                    "cannot determine file name for '{}'",
                    path.display()
                ))
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self { name, bytes })
    }

    /// The extension of the original file name, if it has one.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// One user-initiated media operation, handled as a unit.
#[derive(Debug, Clone)]
pub enum JobRequest {
    /// Transcode a single file to `target_format`.
    Convert {
        input: InputFile,
        target_format: String,
    },
    /// Keep the [start, end) range of a single file, re-encoded to
    /// `target_format`.
    Cut {
        input: InputFile,
        start_secs: f64,
        end_secs: f64,
        target_format: String,
    },
    /// Concatenate two or more files, in selection order.
    Join {
        inputs: Vec<InputFile>,
        target_format: String,
    },
    /// Transcode a video file to an audio-only `target_format`; the
    /// demuxer drops the video stream implicitly.
    ExtractAudio {
        input: InputFile,
        target_format: String,
    },
    /// Mux a video stream and an audio stream into an mp4 container
    /// without re-encoding.
    Merge { video: InputFile, audio: InputFile },
}

impl JobRequest {
    /// Short operation name for logs and error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            JobRequest::Convert { .. } => "convert",
            JobRequest::Cut { .. } => "cut",
            JobRequest::Join { .. } => "join",
            JobRequest::ExtractAudio { .. } => "extract",
            JobRequest::Merge { .. } => "merge",
        }
    }

    /// Rejects malformed requests before any engine interaction. A request
    /// that fails here has staged nothing and touched nothing shared.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            JobRequest::Convert { target_format, .. }
            | JobRequest::ExtractAudio { target_format, .. } => check_format(target_format),
            JobRequest::Cut {
                start_secs,
                end_secs,
                target_format,
                ..
            } => {
                check_format(target_format)?;
                if !start_secs.is_finite()
                    || !end_secs.is_finite()
                    || *start_secs < 0.0
                    || start_secs >= end_secs
                {
                    return Err(CoreError::InvalidRequest(format!(
                        "cut range requires 0 <= start < end, got start={start_secs} end={end_secs}"
                    )));
                }
                Ok(())
            }
            JobRequest::Join {
                inputs,
                target_format,
            } => {
                check_format(target_format)?;
                if inputs.len() < 2 {
                    return Err(CoreError::InvalidRequest(format!(
                        "join requires at least 2 input files, got {}",
                        inputs.len()
                    )));
                }
                Ok(())
            }
            JobRequest::Merge { .. } => Ok(()),
        }
    }
}

impl fmt::Display for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// The produced file content plus its declared MIME type.
///
/// The MIME type follows the requested format token, not the container
/// the engine actually produced.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub data: Vec<u8>,
    pub mime_type: String,
}

fn check_format(target_format: &str) -> CoreResult<()> {
    if target_format.is_empty() || !target_format.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CoreError::InvalidRequest(format!(
            "target format must be an extension-like token, got \"{target_format}\""
        )));
    }
    Ok(())
}

fn audio_mime(target_format: &str) -> String {
    format!("audio/{target_format}")
}

/// Wires the caller's callback to the upcoming invocation, if the input's
/// duration can be probed. Best-effort: a job whose duration is unknown
/// runs without progress rather than failing.
fn build_relay<'cb>(
    handle: &EngineHandle,
    progress: Option<&'cb mut dyn FnMut(u8)>,
    staged_path: &Path,
    input_name: &str,
) -> Option<ProgressRelay<'cb>> {
    let callback = progress?;
    let duration = handle
        .prober()
        .duration_secs(staged_path)
        .unwrap_or_else(|e| {
            log::warn!("duration probe failed for {input_name}: {e}");
            None
        });
    match duration.and_then(|d| ProgressRelay::new(d, callback)) {
        Some(relay) => Some(relay),
        None => {
            log::warn!("duration of {input_name} unknown, progress reporting disabled");
            None
        }
    }
}

/// Runs one job to completion against the shared engine.
///
/// The progress callback is honored for Convert and ExtractAudio; it is
/// wired to the engine for the duration of this invocation only.
pub fn run_job(
    handle: &EngineHandle,
    request: &JobRequest,
    progress: Option<&mut dyn FnMut(u8)>,
) -> CoreResult<JobResult> {
    request.validate()?;
    let engine = handle.ensure_loaded()?;
    log::info!("starting {} job", request.kind_name());

    match request {
        JobRequest::Convert {
            input,
            target_format,
        }
        | JobRequest::ExtractAudio {
            input,
            target_format,
        } => {
            let staged = engine.stage("in", input.extension().unwrap_or("bin"), &input.bytes)?;
            let output = engine.reserve_output("out", target_format);
            let relay = build_relay(handle, progress, staged.path(), &input.name);
            engine.invoke(
                &args::convert_args(staged.file_name(), output.file_name()),
                relay,
            )?;
            let data = output.read()?;
            Ok(JobResult {
                data,
                mime_type: audio_mime(target_format),
            })
        }

        JobRequest::Cut {
            input,
            start_secs,
            end_secs,
            target_format,
        } => {
            let staged = engine.stage("in", input.extension().unwrap_or("bin"), &input.bytes)?;
            let output = engine.reserve_output("out", target_format);
            engine.invoke(
                &args::cut_args(
                    staged.file_name(),
                    *start_secs,
                    *end_secs,
                    output.file_name(),
                ),
                None,
            )?;
            let data = output.read()?;
            Ok(JobResult {
                data,
                mime_type: audio_mime(target_format),
            })
        }

        JobRequest::Join {
            inputs,
            target_format,
        } => {
            let mut staged = Vec::with_capacity(inputs.len());
            for input in inputs {
                staged.push(engine.stage(
                    "in",
                    input.extension().unwrap_or("bin"),
                    &input.bytes,
                )?);
            }
            let manifest_text = args::concat_manifest(staged.iter().map(|s| s.file_name()));
            let manifest = engine.stage("list", "txt", manifest_text.as_bytes())?;
            let output = engine.reserve_output("out", target_format);
            engine.invoke(
                &args::join_args(manifest.file_name(), output.file_name()),
                None,
            )?;
            let data = output.read()?;
            Ok(JobResult {
                data,
                mime_type: audio_mime(target_format),
            })
        }

        JobRequest::Merge { video, audio } => {
            let staged_video = engine.stage("in", video.extension().unwrap_or("bin"), &video.bytes)?;
            let staged_audio = engine.stage("in", audio.extension().unwrap_or("bin"), &audio.bytes)?;
            let output = engine.reserve_output("out", "mp4");
            engine.invoke(
                &args::merge_args(
                    staged_video.file_name(),
                    staged_audio.file_name(),
                    output.file_name(),
                ),
                None,
            )?;
            let data = output.read()?;
            Ok(JobResult {
                data,
                mime_type: "video/mp4".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::engine::mocks::{MockEngineSpawner, MockProber, MockProcessPlan};
    use crate::engine::EngineEvent;
    use std::sync::Arc;

    fn handle_with(spawner: MockEngineSpawner, duration: Option<f64>) -> EngineHandle {
        EngineHandle::with_parts(
            CoreConfig::default(),
            Arc::new(spawner),
            Arc::new(MockProber::new(duration)),
        )
    }

    fn scratch_entries(handle: &EngineHandle) -> usize {
        let engine = handle.ensure_loaded().unwrap();
        std::fs::read_dir(engine.scratch_dir()).unwrap().count()
    }

    fn sample_input(name: &str) -> InputFile {
        InputFile::new(name, b"fake media bytes".to_vec())
    }

    #[test]
    fn test_convert_returns_output_bytes_and_mime() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success().with_output(b"converted"));
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);

        let request = JobRequest::Convert {
            input: sample_input("song.wav"),
            target_format: "mp3".to_string(),
        };
        let result = run_job(&handle, &request, None).unwrap();
        assert_eq!(result.data, b"converted");
        assert_eq!(result.mime_type, "audio/mp3");

        let invocations = probe.invocations();
        assert_eq!(invocations.len(), 1);
        let args = &invocations[0].args;
        assert_eq!(args[0], "-i");
        assert!(args[1].starts_with("in_") && args[1].ends_with(".wav"));
        assert!(args[2].starts_with("out_") && args[2].ends_with(".mp3"));

        assert_eq!(scratch_entries(&handle), 0);
    }

    #[test]
    fn test_convert_reports_progress_through_relay() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(
            MockProcessPlan::success()
                .with_event(EngineEvent::Progress { out_time_secs: 20.0 })
                .with_event(EngineEvent::Progress { out_time_secs: 55.5 })
                .with_event(EngineEvent::Progress { out_time_secs: 100.0 })
                .with_output(b"x"),
        );
        let handle = handle_with(spawner, Some(100.0));

        let mut reported = Vec::new();
        let mut callback = |percent: u8| reported.push(percent);
        let request = JobRequest::Convert {
            input: sample_input("song.wav"),
            target_format: "ogg".to_string(),
        };
        run_job(&handle, &request, Some(&mut callback)).unwrap();
        assert_eq!(reported, vec![20, 55, 100]);
    }

    #[test]
    fn test_progress_silent_when_duration_unknown() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(
            MockProcessPlan::success()
                .with_event(EngineEvent::Progress { out_time_secs: 5.0 })
                .with_output(b"x"),
        );
        let handle = handle_with(spawner, None);

        let mut reported = Vec::new();
        let mut callback = |percent: u8| reported.push(percent);
        let request = JobRequest::Convert {
            input: sample_input("song.wav"),
            target_format: "mp3".to_string(),
        };
        run_job(&handle, &request, Some(&mut callback)).unwrap();
        assert!(reported.is_empty());
    }

    #[test]
    fn test_progress_is_not_delivered_to_later_jobs() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(
            MockProcessPlan::success()
                .with_event(EngineEvent::Progress { out_time_secs: 50.0 })
                .with_output(b"x"),
        );
        spawner.push_plan(
            MockProcessPlan::success()
                .with_event(EngineEvent::Progress { out_time_secs: 80.0 })
                .with_output(b"y"),
        );
        let handle = handle_with(spawner, Some(100.0));

        let mut reported = Vec::new();
        let mut callback = |percent: u8| reported.push(percent);
        let first = JobRequest::Convert {
            input: sample_input("a.wav"),
            target_format: "mp3".to_string(),
        };
        run_job(&handle, &first, Some(&mut callback)).unwrap();
        assert_eq!(reported, vec![50]);

        // Second job requests no progress; its engine events must not
        // reach the first job's callback.
        let second = JobRequest::Convert {
            input: sample_input("b.wav"),
            target_format: "mp3".to_string(),
        };
        run_job(&handle, &second, None).unwrap();
        assert_eq!(reported, vec![50]);
    }

    #[test]
    fn test_cut_invokes_with_time_bounds() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success().with_output(b"cut"));
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);

        let request = JobRequest::Cut {
            input: sample_input("song.mp3"),
            start_secs: 5.0,
            end_secs: 15.0,
            target_format: "mp3".to_string(),
        };
        let result = run_job(&handle, &request, None).unwrap();
        assert_eq!(result.mime_type, "audio/mp3");

        let args = &probe.invocations()[0].args;
        let joined = args.join(" ");
        assert!(joined.contains("-ss 5 -to 15"));
        assert!(!joined.contains("-c copy"));
        assert_eq!(scratch_entries(&handle), 0);
    }

    #[test]
    fn test_join_manifest_lists_inputs_in_selection_order() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success().with_output(b"joined"));
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);

        let request = JobRequest::Join {
            inputs: vec![sample_input("a.mp3"), sample_input("b.mp3")],
            target_format: "mp3".to_string(),
        };
        run_job(&handle, &request, None).unwrap();

        let invocation = &probe.invocations()[0];
        assert!(invocation.args.starts_with(&[
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
        ]));
        let manifest = invocation.manifest.as_deref().unwrap();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("file 'in_") && lines[0].ends_with(".mp3'"));
        assert!(lines[1].starts_with("file 'in_"));
        assert_eq!(scratch_entries(&handle), 0);
    }

    // Selection order is observable through the staged extensions: each
    // manifest line carries the extension of the input staged into it.
    fn join_manifest_for(inputs: Vec<InputFile>) -> Vec<String> {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success().with_output(b"joined"));
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);
        let request = JobRequest::Join {
            inputs,
            target_format: "mp3".to_string(),
        };
        run_job(&handle, &request, None).unwrap();
        let manifest = probe.invocations()[0].manifest.clone().unwrap();
        manifest.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_join_order_follows_input_order() {
        let lines = join_manifest_for(vec![sample_input("first.wav"), sample_input("second.ogg")]);
        assert!(lines[0].ends_with(".wav'"));
        assert!(lines[1].ends_with(".ogg'"));

        // Swapping the inputs swaps the manifest order.
        let lines = join_manifest_for(vec![sample_input("second.ogg"), sample_input("first.wav")]);
        assert!(lines[0].ends_with(".ogg'"));
        assert!(lines[1].ends_with(".wav'"));
    }

    #[test]
    fn test_merge_produces_video_mp4() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success().with_output(b"muxed"));
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);

        let request = JobRequest::Merge {
            video: sample_input("clip.mp4"),
            audio: sample_input("track.mp3"),
        };
        let result = run_job(&handle, &request, None).unwrap();
        assert_eq!(result.mime_type, "video/mp4");

        let joined = probe.invocations()[0].args.join(" ");
        assert!(joined.contains("-c copy"));
        assert_eq!(joined.matches("-i ").count(), 2);
    }

    #[test]
    fn test_failed_invocation_cleans_up_and_surfaces_stderr() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(
            MockProcessPlan::failure(1)
                .with_event(EngineEvent::Error("Invalid data found".to_string())),
        );
        let handle = handle_with(spawner, None);

        let request = JobRequest::Convert {
            input: sample_input("broken.wav"),
            target_format: "mp3".to_string(),
        };
        match run_job(&handle, &request, None) {
            Err(CoreError::CommandFailed { stderr, .. }) => {
                assert!(stderr.contains("Invalid data found"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        // Failure path still unstages every slot the job created.
        assert_eq!(scratch_entries(&handle), 0);
    }

    #[test]
    fn test_missing_output_is_an_error_and_cleans_up() {
        let spawner = MockEngineSpawner::new();
        spawner.push_plan(MockProcessPlan::success()); // no fabricated output
        let handle = handle_with(spawner, None);

        let request = JobRequest::Convert {
            input: sample_input("song.wav"),
            target_format: "mp3".to_string(),
        };
        assert!(matches!(
            run_job(&handle, &request, None),
            Err(CoreError::OutputMissing(_))
        ));
        assert_eq!(scratch_entries(&handle), 0);
    }

    #[test]
    fn test_validation_rejects_before_engine_interaction() {
        let spawner = MockEngineSpawner::new();
        let probe = spawner.clone();
        let handle = handle_with(spawner, None);

        let too_few = JobRequest::Join {
            inputs: vec![sample_input("only.mp3")],
            target_format: "mp3".to_string(),
        };
        assert!(matches!(
            run_job(&handle, &too_few, None),
            Err(CoreError::InvalidRequest(_))
        ));

        let inverted = JobRequest::Cut {
            input: sample_input("song.mp3"),
            start_secs: 15.0,
            end_secs: 5.0,
            target_format: "mp3".to_string(),
        };
        assert!(matches!(
            run_job(&handle, &inverted, None),
            Err(CoreError::InvalidRequest(_))
        ));

        let bad_format = JobRequest::Convert {
            input: sample_input("song.mp3"),
            target_format: String::new(),
        };
        assert!(matches!(
            run_job(&handle, &bad_format, None),
            Err(CoreError::InvalidRequest(_))
        ));

        // Rejected before any engine interaction: not even a preflight ran.
        assert_eq!(probe.preflight_calls(), 0);
        assert!(probe.invocations().is_empty());
    }
}
