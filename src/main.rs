#![deny(unsafe_code)]
pub mod commands;
mod version;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::error::ErrorKind;
use commands::command::Command;
use commands::correct::Correct;
use env_logger::Env;
use log::info;

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Long-read consensus correction.
///
/// Each target read is corrected by building an alignment graph from the reads aligned to it
/// and calling consensus over the graph's best path. Corrected sequences are written to stdout.
#[derive(Parser, Debug)]
#[command(name = "dagcorrect", styles = STYLES, version = version::VERSION.as_str())]
struct Args {
    /// Log debug messages
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    verbose: bool,

    #[command(flatten)]
    correct: Correct,
}

fn main() -> Result<()> {
    // Capture full command line BEFORE clap parsing for logging
    let command_line = std::env::args().collect::<Vec<_>>().join(" ");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Running dagcorrect version {}", version::VERSION.as_str());
    args.correct.execute(&command_line)
}
