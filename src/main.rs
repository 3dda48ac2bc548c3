//! ipad-pricer - Cross-store iPad Air price comparison CLI
//!
//! Scrapes retail sites with TLS fingerprint emulation and reports price
//! spreads for iPad Air models listed on more than one store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ipad_pricer::commands::{NormalizeCommand, ReportCommand};
use ipad_pricer::config::{Config, OutputFormat};
use ipad_pricer::sources::{RateClient, SourceId};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ipad-pricer",
    version,
    about = "Cross-store iPad Air price comparison CLI",
    long_about = "Scrapes iPad Air listings from multiple retail sites, normalizes their titles, and reports per-model price spreads."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Delay between requests in milliseconds
    #[arg(long, default_value = "500", global = true, env = "IPAD_DELAY")]
    delay: u64,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the price spread report (default)
    #[command(alias = "r")]
    Report,

    /// Show how a raw listing title normalizes
    #[command(alias = "n")]
    Normalize {
        /// Raw listing title
        title: String,
    },

    /// Show the current GBP to EUR conversion rate
    Rate,

    /// List supported retail sources
    Sources,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;
    config.delay_ms = cli.delay;

    match cli.command.unwrap_or(Commands::Report) {
        Commands::Report => {
            let cmd = ReportCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Normalize { title } => {
            let cmd = NormalizeCommand::new(config);
            let output = cmd.execute(&title)?;
            println!("{}", output);
        }

        Commands::Rate => {
            let client = RateClient::new()?;
            let rate = client.gbp_to_eur().await;
            println!("1 GBP = {} EUR", rate);
        }

        Commands::Sources => {
            println!("Supported retail sources:\n");
            for source in SourceId::all() {
                let url = match source {
                    SourceId::Plaisio => &config.plaisio_url,
                    SourceId::Apple => &config.apple_url,
                };
                println!("  {:<8} {}", source.to_string(), url);
            }
        }
    }

    Ok(())
}
