// mediamill-cli/src/main.rs
//
// Command-line front end for the mediamill media conversion toolkit.
//
// Responsibilities:
// - Parsing CLI arguments (`cli` module).
// - Configuring mediamill-core and constructing the engine handle once
//   for the process.
// - Dispatching to the subcommand implementations (`commands` module).
// - Reporting failures with the failed operation named, and surfacing
//   engine-unavailable conditions persistently rather than per-action.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use mediamill_core::{CoreConfig, EngineHandle};
use std::process;

fn main() {
    logging::init();
    let cli = Cli::parse();

    let config = CoreConfig {
        scratch_base: cli.scratch_dir.clone(),
    };
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        process::exit(2);
    }

    // One handle for the process; every subcommand reaches the shared
    // engine through it.
    let handle = EngineHandle::new(config);

    let json = cli.json;
    let (operation, result) = match cli.command {
        Commands::Convert(args) => ("Convert", commands::convert::run(&handle, args, json)),
        Commands::Cut(args) => ("Cut", commands::cut::run(&handle, args, json)),
        Commands::Join(args) => ("Join", commands::join::run(&handle, args, json)),
        Commands::Extract(args) => ("Extract", commands::extract::run(&handle, args, json)),
        Commands::Merge(args) => ("Merge", commands::merge::run(&handle, args, json)),
    };

    if let Err(e) = result {
        output::print_error(operation, &e);
        process::exit(1);
    }
}
