//! filterchain CLI - command-line interface for the filter chain engine.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filterchain")]
#[command(author, version, about = "Filter chain engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an audio file through a graph
    Process(commands::process::ProcessArgs),

    /// Run real-time audio processing through a graph
    Realtime(commands::realtime::RealtimeArgs),

    /// List and manage audio devices
    Devices(commands::devices::DevicesArgs),

    /// List the built-in plugin catalog and describe a plugin's ports
    Effects(commands::effects::EffectsArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),

    /// Manage graph presets (list, show, save, delete, copy)
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    tracing::debug!(command = ?std::mem::discriminant(&cli.command), "dispatching command");

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Realtime(args) => commands::realtime::run(args),
        Commands::Devices(args) => commands::devices::run(args),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
