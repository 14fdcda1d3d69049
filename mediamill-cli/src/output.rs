// mediamill-cli/src/output.rs
//
// Result and error presentation: styled text for terminals, JSON lines
// for --json mode.

use mediamill_core::{CoreError, format_bytes, format_time};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Summary of one finished job.
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub event: &'static str,
    pub operation: &'static str,
    pub inputs: Vec<String>,
    pub output: String,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub mime_type: String,
    pub elapsed_secs: f64,
    pub finished_at: String,
}

impl JobSummary {
    pub fn new(
        operation: &'static str,
        inputs: Vec<String>,
        output: String,
        input_bytes: u64,
        output_bytes: u64,
        mime_type: String,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            event: "summary",
            operation,
            inputs,
            output,
            input_bytes,
            output_bytes,
            mime_type,
            elapsed_secs,
            finished_at: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn print(&self, json: bool) {
        if json {
            match serde_json::to_string(self) {
                Ok(line) => println!("{line}"),
                Err(e) => log::error!("failed to serialize job summary: {e}"),
            }
            return;
        }
        println!(
            "{} {}: {} -> {}",
            "[OK]".green(),
            self.operation,
            self.inputs.join(" + "),
            self.output.bold()
        );
        println!("  Input size:  {}", format_bytes(self.input_bytes));
        println!("  Output size: {}", format_bytes(self.output_bytes));
        println!("  MIME type:   {}", self.mime_type);
        println!("  Elapsed:     {}", format_time(self.elapsed_secs));
    }
}

/// One progress line in --json mode.
pub fn print_json_progress(operation: &'static str, percent: u8) {
    println!(
        "{}",
        serde_json::json!({ "event": "progress", "operation": operation, "percent": percent })
    );
}

/// Reports a failed operation on stderr. Engine-unavailable conditions are
/// permanent for the process, so they get a distinct message instead of a
/// per-action one.
pub fn print_error(operation: &str, error: &CoreError) {
    match error {
        CoreError::EngineInit(message)
        | CoreError::EngineUnavailable(message) => {
            eprintln!(
                "{} {}",
                "media engine unavailable:".red().bold(),
                message
            );
            eprintln!("  (is ffmpeg installed and on PATH? The engine is not retried once it fails.)");
        }
        CoreError::DependencyNotFound(dependency) => {
            eprintln!(
                "{} {dependency} not found on PATH",
                "media engine unavailable:".red().bold()
            );
        }
        _ => {
            eprintln!("{} {error}", format!("{operation} failed:").red().bold());
        }
    }
}
