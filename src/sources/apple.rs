//! Apple store adapter: single page with an embedded JSON metrics payload.
//!
//! The UK education store prices in GBP, so listings run through the
//! converter with the current GBP→EUR rate before they leave this module.

use crate::catalog::convert_price;
use crate::config::Config;
use crate::sources::{RawListing, SourceId, Storefront};
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::Html;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

mod selectors {
    use scraper::Selector;
    use std::sync::LazyLock;

    pub static METRICS: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(r#"script#metrics[type="application/json"]"#).unwrap()
    });
}

#[derive(Debug, Deserialize)]
struct MetricsPayload {
    data: MetricsData,
}

#[derive(Debug, Deserialize)]
struct MetricsData {
    products: Vec<MetricsProduct>,
}

#[derive(Debug, Deserialize)]
struct MetricsProduct {
    name: String,
    price: MetricsPrice,
}

#[derive(Debug, Deserialize)]
struct MetricsPrice {
    // Observed both as a JSON number and as a string, depending on the page.
    #[serde(rename = "fullPrice")]
    full_price: serde_json::Value,
}

impl MetricsPrice {
    fn as_repr(&self) -> String {
        match &self.full_price {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// HTTP client for the Apple store page.
pub struct AppleStore {
    client: Client,
    url: String,
    rate: f64,
}

impl AppleStore {
    /// Creates a new Apple client with the given GBP→EUR conversion rate.
    pub fn new(config: &Config, rate: f64) -> Result<Self> {
        Self::with_url(config, None, rate)
    }

    /// Creates a new Apple client with a custom URL (for testing).
    pub fn with_url(config: &Config, url: Option<String>, rate: f64) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, url: url.unwrap_or_else(|| config.apple_url.clone()), rate })
    }

    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-GB,en;q=0.9")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }
}

/// Extracts listings from the embedded `script#metrics` payload.
///
/// A page without the payload yields no listings; that happens on consent
/// walls and error pages, so it is logged rather than treated as fatal.
pub fn parse_metrics_page(html: &str, rate: f64) -> Result<Vec<RawListing>> {
    let payload = {
        let document = Html::parse_document(html);
        let Some(script) = document.select(&selectors::METRICS).next() else {
            warn!("[APPLE] No metrics payload found on page");
            return Ok(Vec::new());
        };
        script.text().collect::<String>()
    };

    let metrics: MetricsPayload =
        serde_json::from_str(&payload).context("Failed to parse metrics payload")?;

    let listings = metrics
        .data
        .products
        .into_iter()
        .map(|product| RawListing {
            title: product.name,
            price: convert_price(&product.price.as_repr(), rate),
        })
        .collect();

    Ok(listings)
}

#[async_trait]
impl Storefront for AppleStore {
    async fn fetch(&self) -> Result<Vec<RawListing>> {
        let html = self.get(&self.url).await?;
        let listings = parse_metrics_page(&html, self.rate)?;
        info!("[APPLE] Found {} products", listings.len());
        Ok(listings)
    }

    fn id(&self) -> SourceId {
        SourceId::Apple
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config() -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
    }

    fn make_metrics_page(products: &str) -> String {
        format!(
            r#"<html><body>
                <script id="metrics" type="application/json">
                    {{"data": {{"products": [{}]}}}}
                </script>
            </body></html>"#,
            products
        )
    }

    #[test]
    fn test_parse_metrics_page_number_price() {
        let html = make_metrics_page(
            r#"{"name": "iPad Air 11-inch 128GB Wi-Fi Blue", "price": {"fullPrice": 529}}"#,
        );

        let listings = parse_metrics_page(&html, 1.17).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].title, "iPad Air 11-inch 128GB Wi-Fi Blue");
        assert_eq!(listings[0].price, "EUR 618.93");
    }

    #[test]
    fn test_parse_metrics_page_string_price() {
        let html = make_metrics_page(
            r#"{"name": "iPad Air 13-inch 256GB Wi-Fi Purple", "price": {"fullPrice": "799.00"}}"#,
        );

        let listings = parse_metrics_page(&html, 1.0).unwrap();
        assert_eq!(listings[0].price, "EUR 799.00");
    }

    #[test]
    fn test_parse_metrics_page_junk_price_passes_through() {
        let html = make_metrics_page(
            r#"{"name": "iPad Air", "price": {"fullPrice": "call us"}}"#,
        );

        let listings = parse_metrics_page(&html, 1.17).unwrap();
        assert_eq!(listings[0].price, "call us");
    }

    #[test]
    fn test_parse_metrics_page_missing_payload() {
        let listings = parse_metrics_page("<html><body></body></html>", 1.0).unwrap();
        assert!(listings.is_empty());
    }

    #[test]
    fn test_parse_metrics_page_malformed_payload() {
        let html = r#"<html><body>
            <script id="metrics" type="application/json">not json</script>
        </body></html>"#;

        assert!(parse_metrics_page(html, 1.0).is_err());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        let html = make_metrics_page(
            r#"{"name": "iPad Air 11-inch 128GB Wi-Fi Blue", "price": {"fullPrice": 529}},
               {"name": "iPad Air 13-inch 256GB Wi-Fi Purple", "price": {"fullPrice": 799}}"#,
        );

        Mock::given(method("GET"))
            .and(path("/uk-edu/shop/buy-ipad/ipad-air/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&mock_server)
            .await;

        let url = format!("{}/uk-edu/shop/buy-ipad/ipad-air/", mock_server.uri());
        let store = AppleStore::with_url(&make_test_config(), Some(url), 1.17).unwrap();

        let listings = store.fetch().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].price, "EUR 618.93");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let store =
            AppleStore::with_url(&make_test_config(), Some(mock_server.uri()), 1.0).unwrap();
        let result = store.fetch().await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_page_without_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let store =
            AppleStore::with_url(&make_test_config(), Some(mock_server.uri()), 1.0).unwrap();
        let listings = store.fetch().await.unwrap();
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn test_store_id() {
        let store =
            AppleStore::with_url(&make_test_config(), Some("http://localhost".to_string()), 1.0)
                .unwrap();
        assert_eq!(store.id(), SourceId::Apple);
    }
}
