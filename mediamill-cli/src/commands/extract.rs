// mediamill-cli/src/commands/extract.rs

use crate::cli::ExtractArgs;
use crate::commands::{derive_output_path, execute};
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest};

pub fn run(handle: &EngineHandle, args: ExtractArgs, json: bool) -> CoreResult<()> {
    let input = InputFile::from_path(&args.input)?;
    let output_path = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.input, "_audio", &args.format));
    let request = JobRequest::ExtractAudio {
        input,
        target_format: args.format,
    };
    execute(handle, json, &request, &output_path, !args.no_progress)
}
