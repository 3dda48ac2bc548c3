//! Exchange-rate collaborator for GBP→EUR conversion.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

const EXCHANGE_RATE_BASE: &str = "https://api.exchangerate-api.com";

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Exchange-rate HTTP client.
pub struct RateClient {
    client: Client,
    base_url: String,
}

impl RateClient {
    /// Creates a new rate client.
    pub fn new() -> Result<Self> {
        Self::with_base_url(EXCHANGE_RATE_BASE.to_string())
    }

    /// Creates a new rate client with a custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Returns the current GBP→EUR rate.
    ///
    /// This is the system's only fallback policy: any failure here logs a
    /// diagnostic and degrades to a rate of 1.0 so the run can finish with
    /// unconverted amounts rather than abort.
    pub async fn gbp_to_eur(&self) -> f64 {
        match self.fetch_rate().await {
            Ok(rate) => {
                info!("Conversion rate 1 GBP = {} EUR", rate);
                rate
            }
            Err(e) => {
                warn!("Failed to retrieve conversion rate: {:#}. Falling back to 1.0", e);
                1.0
            }
        }
    }

    async fn fetch_rate(&self) -> Result<f64> {
        let url = format!("{}/v4/latest/GBP", self.base_url);
        debug!("GET {}", url);

        let response =
            self.client.get(&url).send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Rate service returned status: {}", status);
        }

        let body = response.text().await.context("Failed to read response body")?;
        let latest: LatestRates =
            serde_json::from_str(&body).context("Failed to parse rate response")?;

        let rate = latest
            .rates
            .get("EUR")
            .copied()
            .context("Rate response has no EUR entry")?;

        if !rate.is_finite() || rate <= 0.0 {
            anyhow::bail!("Rate service returned unusable rate: {}", rate);
        }

        Ok(rate)
    }
}
