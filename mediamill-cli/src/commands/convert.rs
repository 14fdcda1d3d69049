// mediamill-cli/src/commands/convert.rs

use crate::cli::ConvertArgs;
use crate::commands::{derive_output_path, execute};
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest};

pub fn run(handle: &EngineHandle, args: ConvertArgs, json: bool) -> CoreResult<()> {
    let input = InputFile::from_path(&args.input)?;
    let output_path = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.input, "", &args.format));
    let request = JobRequest::Convert {
        input,
        target_format: args.format,
    };
    execute(handle, json, &request, &output_path, !args.no_progress)
}
