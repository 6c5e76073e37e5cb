//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tirta")]
#[command(author, version, about = "Terminal dashboard for tirta water-quality sensors", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base URL of the sensor API (overrides the config file)
    #[arg(short = 'u', long, global = true)]
    pub api_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the sensor API and print classified readings
    Watch {
        /// Poll interval in seconds
        #[arg(short, long, default_value = "10")]
        interval: u64,

        /// Number of readings to take (0 for unlimited)
        #[arg(short, long, default_value = "0")]
        count: u32,
    },

    /// Interactive terminal dashboard with live charts
    Dashboard,

    /// Print the locally stored reading history
    History {
        /// Number of records to print (0 for all)
        #[arg(short, long, default_value = "0")]
        count: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Clear the locally stored reading history
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Output format for the history command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// JSON array
    Json,
    /// CSV with a header row
    Csv,
}
