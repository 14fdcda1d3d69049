// mediamill-cli/src/commands/cut.rs

use crate::cli::CutArgs;
use crate::commands::{derive_output_path, execute};
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest, parse_time};

pub fn run(handle: &EngineHandle, args: CutArgs, json: bool) -> CoreResult<()> {
    let start_secs = parse_time(&args.start)?;
    let end_secs = parse_time(&args.end)?;

    // Like the converter UI, the cut keeps the input's own format unless
    // the caller asks for another one.
    let format = args.format.unwrap_or_else(|| {
        args.input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp3")
            .to_string()
    });

    let input = InputFile::from_path(&args.input)?;
    let output_path = args
        .output
        .unwrap_or_else(|| derive_output_path(&args.input, "_cut", &format));
    let request = JobRequest::Cut {
        input,
        start_secs,
        end_secs,
        target_format: format,
    };
    execute(handle, json, &request, &output_path, false)
}
