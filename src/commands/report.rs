//! Report command: fetch all sources, normalize, and diff.

use crate::catalog::{aggregate, Money, Product};
use crate::config::Config;
use crate::format::Formatter;
use crate::sources::{AppleStore, PlaisioStore, RateClient, Storefront};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Builds the cross-store price spread report.
pub struct ReportCommand {
    config: Config,
}

impl ReportCommand {
    /// Creates a new report command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches every store and returns the formatted report.
    pub async fn execute(&self) -> Result<String> {
        let rate_client = RateClient::new().context("Failed to create rate client")?;
        let rate = rate_client.gbp_to_eur().await;

        let plaisio =
            PlaisioStore::new(&self.config).context("Failed to create Plaisio client")?;
        let apple =
            AppleStore::new(&self.config, rate).context("Failed to create Apple client")?;

        self.execute_with_sources(&[&plaisio, &apple]).await
    }

    /// Builds the report from the given sources (for testing).
    ///
    /// A source that fails outright contributes nothing; the report is built
    /// from whatever the remaining sources returned.
    pub async fn execute_with_sources(&self, sources: &[&dyn Storefront]) -> Result<String> {
        let mut products: Vec<Product> = Vec::new();

        for source in sources {
            let id = source.id();
            let listings = match source.fetch().await {
                Ok(listings) => listings,
                Err(e) => {
                    warn!("[{}] Fetch failed: {:#}", id, e);
                    continue;
                }
            };

            for listing in listings {
                match Money::parse(&listing.price) {
                    Ok(price) => products.push(Product::from_title(&listing.title, price, id)),
                    Err(e) => {
                        warn!("[{}] Skipping '{}': unusable price '{}': {}",
                            id, listing.title, listing.price, e);
                    }
                }
            }
        }

        info!("Normalized {} listings across {} sources", products.len(), sources.len());

        let report = aggregate(products);
        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_report(&report))
    }
}
