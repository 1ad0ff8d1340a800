//! Diodering CLI - render, inspect and manage presets for the diode ring modulator.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "diodering")]
#[command(author, version, about = "Analog-modeled diode ring modulator", long_about = None)]
struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ring-modulate an input file with a carrier file
    Process(commands::process::ProcessArgs),

    /// List a module's parameters and ports
    Info(commands::info::InfoArgs),

    /// Print the diode transfer curve as CSV
    Curve(commands::curve::CurveArgs),

    /// List, show and save presets
    Presets(commands::presets::PresetsArgs),

    /// Generate test signals for inputs and carriers
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Curve(args) => commands::curve::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
