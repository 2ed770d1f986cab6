//! Wavpress CLI - transcode audio files into levelled WAV.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wavpress")]
#[command(author, version, about = "Offline audio transcoder: decode, resample, compress, write WAV", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcode an audio file to WAV
    Transcode(commands::transcode::TranscodeArgs),

    /// Show stream information for an audio file
    Info(commands::info::InfoArgs),

    /// List factory presets or print one as TOML
    Presets(commands::presets::PresetsArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v when set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Transcode(args) => commands::transcode::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
