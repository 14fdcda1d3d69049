//! Core library for the mediamill media conversion toolkit.
//!
//! mediamill drives a single shared ffmpeg instance through five job
//! kinds: convert, cut, join, extract audio from video, and merge. Inputs
//! are in-memory files staged into the engine's private scratch namespace
//! under collision-resistant names; invocations are serialized so
//! concurrent jobs never corrupt each other's slots or progress stream,
//! and every staged slot is reclaimed whether the job succeeds or fails.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediamill_core::{CoreConfig, EngineHandle, InputFile, JobRequest, run_job};
//! use std::path::Path;
//!
//! let handle = EngineHandle::new(CoreConfig::default());
//!
//! let request = JobRequest::Convert {
//!     input: InputFile::from_path(Path::new("song.wav")).unwrap(),
//!     target_format: "mp3".to_string(),
//! };
//! let mut on_progress = |percent: u8| println!("{percent}%");
//! let result = run_job(&handle, &request, Some(&mut on_progress)).unwrap();
//! assert_eq!(result.mime_type, "audio/mp3");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod jobs;
pub mod probe;
pub mod progress;
pub mod utils;

// Re-exports for public API
pub use config::CoreConfig;
pub use engine::{Engine, EngineHandle, EngineState, StagedFile};
pub use error::{CoreError, CoreResult};
pub use jobs::{InputFile, JobRequest, JobResult, run_job};
pub use probe::{FfprobeProber, MediaProber};
pub use progress::ProgressRelay;
pub use utils::{format_bytes, format_time, parse_time};
