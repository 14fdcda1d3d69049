// mediamill-cli/src/commands/join.rs

use crate::cli::JoinArgs;
use crate::commands::execute;
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest};
use std::path::PathBuf;

pub fn run(handle: &EngineHandle, args: JoinArgs, json: bool) -> CoreResult<()> {
    // Join order is the order the files were given on the command line.
    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        inputs.push(InputFile::from_path(path)?);
    }

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("joined.{}", args.format)));
    let request = JobRequest::Join {
        inputs,
        target_format: args.format,
    };
    execute(handle, json, &request, &output_path, false)
}
