// mediamill-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "mediamill: media conversion toolkit",
    long_about = "Converts, cuts, joins, extracts, and merges media files using ffmpeg via the mediamill-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON lines instead of styled text.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Base directory for the engine's private scratch storage.
    #[arg(long, global = true, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts an audio file to another format
    Convert(ConvertArgs),
    /// Cuts a time range out of an audio file
    Cut(CutArgs),
    /// Joins two or more audio files end to end
    Join(JoinArgs),
    /// Extracts the audio track from a video file
    Extract(ExtractArgs),
    /// Merges a video stream and an audio stream into an mp4
    Merge(MergeArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Input audio file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Target audio format (mp3, wav, ogg, aac, ...)
    #[arg(short = 'f', long = "format", default_value = "mp3", value_name = "FORMAT")]
    pub format: String,

    /// Output file (defaults next to the input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct CutArgs {
    /// Input audio file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Start of the kept range, as "M:SS" or plain seconds
    #[arg(long, value_name = "TIME", default_value = "0:00")]
    pub start: String,

    /// End of the kept range (absolute position), as "M:SS" or plain seconds
    #[arg(long, value_name = "TIME", required = true)]
    pub end: String,

    /// Target format (defaults to the input file's extension)
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Output file (defaults next to the input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct JoinArgs {
    /// Input files, joined in the order given (at least 2)
    #[arg(required = true, num_args = 2.., value_name = "INPUT_FILE")]
    pub inputs: Vec<PathBuf>,

    /// Target audio format
    #[arg(short = 'f', long = "format", default_value = "mp3", value_name = "FORMAT")]
    pub format: String,

    /// Output file (defaults to joined.<format> in the current directory)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Input video file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Target audio format
    #[arg(short = 'f', long = "format", default_value = "mp3", value_name = "FORMAT")]
    pub format: String,

    /// Output file (defaults next to the input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// Input video file
    #[arg(long, required = true, value_name = "VIDEO_FILE")]
    pub video: PathBuf,

    /// Input audio file
    #[arg(long, required = true, value_name = "AUDIO_FILE")]
    pub audio: PathBuf,

    /// Output file (defaults next to the video input)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,
}
