use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod style;
mod tui;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    let no_color = cli.no_color || config.no_color;

    match cli.command {
        Commands::Watch { interval, count } => {
            commands::cmd_watch(
                &config,
                commands::WatchArgs {
                    interval,
                    count,
                    no_color,
                    quiet: cli.quiet,
                },
            )
            .await
        }
        Commands::Dashboard => tui::run(&config).await,
        Commands::History { count, format } => {
            commands::cmd_history(&config, count, format, no_color)
        }
        Commands::Reset { yes } => commands::cmd_reset(&config, yes),
    }
}
