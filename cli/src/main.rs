mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{clip, config, frames, subtract};
use snowcommand::DashboardConfig;
use tracing_subscriber::{fmt, EnvFilter};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = DashboardConfig::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Clip(args) => clip::run(&cli, &settings, args),
        Commands::Subtract(args) => subtract::run(&cli, &settings, args),
        Commands::Frames(args) => frames::run(&cli, &settings, args),
        Commands::Config => config::run(&cli, &settings),
    }
}

/// `RUST_LOG` wins; otherwise `-v` / `-vv` raise the level from info.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> { run() }
