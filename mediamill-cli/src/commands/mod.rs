// mediamill-cli/src/commands/mod.rs
//
// One module per subcommand, plus the shared job execution path: run the
// request against the engine handle, write the produced bytes to disk,
// and print a summary.

pub mod convert;
pub mod cut;
pub mod extract;
pub mod join;
pub mod merge;

use crate::output::{self, JobSummary};
use indicatif::{ProgressBar, ProgressStyle};
use mediamill_core::{CoreResult, EngineHandle, InputFile, JobRequest, run_job};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Runs the request, writes the output file, and prints the job summary.
pub(crate) fn execute(
    handle: &EngineHandle,
    json: bool,
    request: &JobRequest,
    output_path: &Path,
    show_progress: bool,
) -> CoreResult<()> {
    let operation = request.kind_name();
    let (input_names, input_bytes) = describe_inputs(request);
    let started = Instant::now();

    let job = if show_progress {
        if json {
            let mut callback = |percent: u8| output::print_json_progress(operation, percent);
            run_job(handle, request, Some(&mut callback as &mut dyn FnMut(u8)))?
        } else {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("  {bar:40.cyan/blue} {pos:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let mut callback = |percent: u8| bar.set_position(u64::from(percent));
            let result = run_job(handle, request, Some(&mut callback as &mut dyn FnMut(u8)));
            bar.finish_and_clear();
            result?
        }
    } else {
        run_job(handle, request, None)?
    };

    std::fs::write(output_path, &job.data)?;
    JobSummary::new(
        operation,
        input_names,
        output_path.display().to_string(),
        input_bytes,
        job.data.len() as u64,
        job.mime_type.clone(),
        started.elapsed().as_secs_f64(),
    )
    .print(json);
    Ok(())
}

fn describe_inputs(request: &JobRequest) -> (Vec<String>, u64) {
    let files: Vec<&InputFile> = match request {
        JobRequest::Convert { input, .. }
        | JobRequest::Cut { input, .. }
        | JobRequest::ExtractAudio { input, .. } => vec![input],
        JobRequest::Join { inputs, .. } => inputs.iter().collect(),
        JobRequest::Merge { video, audio } => vec![video, audio],
    };
    let names = files.iter().map(|f| f.name.clone()).collect();
    let total_bytes = files.iter().map(|f| f.bytes.len() as u64).sum();
    (names, total_bytes)
}

/// Output path next to the input: `<stem><suffix>.<format>`, stepping
/// aside to `<stem>_converted.<format>` if that would overwrite the input.
pub(crate) fn derive_output_path(input: &Path, suffix: &str, format: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let candidate = input.with_file_name(format!("{stem}{suffix}.{format}"));
    if candidate == input {
        input.with_file_name(format!("{stem}_converted.{format}"))
    } else {
        candidate
    }
}
