//! Plaisio store adapter: paginated HTML catalog pages.

use crate::config::Config;
use crate::sources::{RawListing, SourceId, Storefront};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

// Selectors for the Plaisio product grid
mod selectors {
    use scraper::Selector;
    use std::sync::LazyLock;

    pub static PRODUCT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("ul.product-list div.product div.product-bottom-part").unwrap()
    });

    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".product-title a div").unwrap());

    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse(".price-container .price .price").unwrap());
}

/// HTTP client for the Plaisio catalog.
pub struct PlaisioStore {
    client: Client,
    base_url: String,
    page_size: u32,
    max_pages: u32,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl PlaisioStore {
    /// Creates a new Plaisio client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new Plaisio client with a custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.unwrap_or_else(|| config.plaisio_url.clone()),
            page_size: config.page_size,
            max_pages: config.max_pages,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        })
    }

    async fn get(&self, url: &str) -> Result<String> {
        self.delay().await;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "el-GR,el;q=0.9,en;q=0.8")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        tokio::time::sleep(Duration::from_millis(self.delay_ms + jitter)).await;
    }
}

/// Parses one catalog page into raw listings.
///
/// Plaisio renders prices without a currency code; the amounts are EUR, so
/// the `"EUR "` prefix is attached here. Cards missing a title or price are
/// skipped.
pub fn parse_listing_page(html: &str) -> Vec<RawListing> {
    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for card in document.select(&selectors::PRODUCT) {
        let title = card
            .select(&selectors::TITLE)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string());

        let price = card
            .select(&selectors::PRICE)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string());

        match (title, price) {
            (Some(title), Some(price)) if !title.is_empty() && !price.is_empty() => {
                listings.push(RawListing { title, price: format!("EUR {}", price) });
            }
            _ => debug!("Skipping incomplete product card"),
        }
    }

    listings
}

/// Counts the product cards on a page, including incomplete ones.
///
/// Pagination stops when a page renders no cards at all, not when every card
/// on it happened to be unparsable.
fn count_cards(html: &str) -> usize {
    Html::parse_document(html).select(&selectors::PRODUCT).count()
}

#[async_trait]
impl Storefront for PlaisioStore {
    async fn fetch(&self) -> Result<Vec<RawListing>> {
        let mut listings = Vec::new();
        let mut page = 1;

        while page <= self.max_pages {
            let url = format!("{};page={};pagesize={}", self.base_url, page, self.page_size);

            let html = match self.get(&url).await {
                Ok(html) => html,
                Err(e) => {
                    // Keep whatever earlier pages yielded; the run goes on.
                    warn!("[PLAISIO] Failed to retrieve page {}: {:#}", page, e);
                    break;
                }
            };

            let cards = count_cards(&html);
            if cards == 0 {
                debug!("[PLAISIO] Page {} is empty, stopping", page);
                break;
            }

            let page_listings = parse_listing_page(&html);
            info!("[PLAISIO] Scraped page {} with {} products", page, cards);
            listings.extend(page_listings);
            page += 1;
        }

        info!("[PLAISIO] Found {} products", listings.len());
        Ok(listings)
    }

    fn id(&self) -> SourceId {
        SourceId::Plaisio
    }
}
