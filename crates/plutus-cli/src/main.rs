use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plutus_core::{market::Commodity, AppConfig};

mod commands;

#[derive(Parser)]
#[command(name = "plutus")]
#[command(author, version, about = "Agricultural commodity quotes, news and market insights")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest news, newest first
    News {
        /// Feed URL (defaults to the configured feed)
        #[arg(short, long)]
        url: Option<String>,
        /// Maximum number of articles to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
        /// Request a sentiment score for each headline
        #[arg(short, long)]
        sentiment: bool,
        /// Print the articles as JSON
        #[arg(long)]
        json: bool,
        /// Include each article's description
        #[arg(short, long)]
        details: bool,
        /// Open the article at this position (1-based) in the browser
        #[arg(short, long)]
        open: Option<usize>,
    },
    /// Show the latest quote for every configured commodity
    Quotes,
    /// Show historical prices for a commodity
    History {
        /// Commodity name or ticker (e.g. corn, ZC=F)
        commodity: Commodity,
        /// Range (e.g. 5d, 1mo, 1y)
        #[arg(short, long)]
        range: Option<String>,
        /// Bar interval (e.g. 1d, 1wk)
        #[arg(short, long)]
        interval: Option<String>,
    },
    /// Show day, month and year price predictions for a commodity
    Predict {
        /// Commodity name or ticker (e.g. corn, ZC=F)
        commodity: Commodity,
    },
    /// Poll quotes continuously and load the news once (default)
    Watch,
    /// Show the configuration file location
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::News { url, limit, sentiment, json, details, open }) => {
            let options = commands::news::NewsOptions {
                url,
                limit,
                sentiment,
                json,
                details,
                open,
            };
            commands::news::run(&config, options).await
        }
        Some(Commands::Quotes) => commands::quotes::run(&config).await,
        Some(Commands::History { commodity, range, interval }) => {
            commands::history::run(&config, commodity, range, interval).await
        }
        Some(Commands::Predict { commodity }) => commands::predict::run(&config, commodity).await,
        Some(Commands::Watch) | None => commands::watch::run(config).await,
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}
