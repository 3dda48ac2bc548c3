//! Retail source adapters: one client per store, plus the exchange-rate
//! collaborator.

pub mod apple;
pub mod plaisio;
pub mod rates;

pub use apple::AppleStore;
pub use plaisio::PlaisioStore;
pub use rates::RateClient;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retail sites listings can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceId {
    Plaisio,
    Apple,
}

impl SourceId {
    /// Returns all known sources, in fetch order.
    pub fn all() -> &'static [SourceId] {
        &[SourceId::Plaisio, SourceId::Apple]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceId::Plaisio => "PLAISIO",
            SourceId::Apple => "APPLE",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plaisio" => Ok(SourceId::Plaisio),
            "apple" => Ok(SourceId::Apple),
            _ => Err(format!("Unknown source '{}'. Valid sources: plaisio, apple", s)),
        }
    }
}

/// A listing as scraped, before normalization.
///
/// `price` carries the `"CCY amount"` shape, e.g. `"EUR 849,00"`; adapters
/// that see other currencies convert before emitting.
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    pub title: String,
    pub price: String,
}

/// Trait for retail source fetching - enables mocking for tests.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Fetches all current listings from the store.
    async fn fetch(&self) -> Result<Vec<RawListing>>;

    /// Returns the store identifier.
    fn id(&self) -> SourceId;
}
