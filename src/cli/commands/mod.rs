//! Argument parsing and command dispatch.

mod crawl;
mod history;
mod init;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use snapprice::config::{CategoryOrder, Settings};

#[derive(Parser)]
#[command(name = "snapprice")]
#[command(about = "Marketplace price crawler with freshness-gated price history")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to ./snapprice.toml when present)
    #[arg(short, long, global = true, env = "SNAPPRICE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables
    Init,

    /// Crawl categories and record prices
    Crawl {
        /// Number of category cycles to run (0 = run until stopped)
        #[arg(long, default_value = "0")]
        cycles: u64,
        /// Category to crawl (repeatable; overrides the settings file)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// How the next category is picked
        #[arg(long, value_enum)]
        order: Option<CategoryOrder>,
    },

    /// Show an item and its recorded prices
    History {
        /// Marketplace source id (e.g. an ASIN)
        source_id: String,
        /// Maximum number of samples to show (0 = all)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Crawl {
            cycles,
            categories,
            order,
        } => crawl::cmd_crawl(&settings, cycles, categories, order).await,
        Commands::History { source_id, limit } => {
            history::cmd_history(&settings, &source_id, limit).await
        }
    }
}
