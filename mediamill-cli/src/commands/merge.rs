// mediamill-cli/src/commands/merge.rs

use crate::cli::MergeArgs;
use crate::commands::{derive_output_path, execute};
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest};

pub fn run(handle: &EngineHandle, args: MergeArgs, json: bool) -> CoreResult<()> {
    let video = InputFile::from_path(&args.video)?;
    let audio = InputFile::from_path(&args.audio)?;
    let output_path = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.video, "_merged", "mp4"));
    let request = JobRequest::Merge { video, audio };
    execute(handle, json, &request, &output_path, false)
}
