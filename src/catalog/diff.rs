//! Cross-source grouping and price spread computation.

use crate::catalog::models::Product;
use crate::catalog::Money;
use crate::sources::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One observed price for a product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub price: Money,
    pub source: SourceId,
}

/// All listings that normalized to the same canonical title, in the order
/// they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGroup {
    /// Canonical title shared by every entry.
    pub title: String,
    /// Difference between the highest and lowest observed amount.
    pub spread: f64,
    /// Observed prices, first-seen order preserved.
    pub entries: Vec<PriceEntry>,
}

impl ProductGroup {
    /// Returns the cheapest entry (first on ties).
    pub fn cheapest(&self) -> Option<&PriceEntry> {
        self.entries
            .iter()
            .min_by(|a, b| a.price.amount.total_cmp(&b.price.amount))
    }

    /// Returns the most expensive entry.
    pub fn most_expensive(&self) -> Option<&PriceEntry> {
        self.entries
            .iter()
            .max_by(|a, b| a.price.amount.total_cmp(&b.price.amount))
    }
}

/// Spread report over all multi-listing product groups, cheapest spread first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    pub groups: Vec<ProductGroup>,
}

impl SpreadReport {
    /// Returns the number of comparable groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no product appeared in more than one listing.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Groups products by canonical title and computes per-group price spreads.
///
/// Groups with a single listing are dropped: there is nothing to compare.
/// The result is sorted ascending by spread; the sort is stable, so equal
/// spreads keep their group encounter order.
pub fn aggregate(products: Vec<Product>) -> SpreadReport {
    let mut groups: Vec<ProductGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for product in products {
        let entry = PriceEntry { price: product.price, source: product.source };
        match index.get(&product.title) {
            Some(&i) => groups[i].entries.push(entry),
            None => {
                index.insert(product.title.clone(), groups.len());
                groups.push(ProductGroup { title: product.title, spread: 0.0, entries: vec![entry] });
            }
        }
    }

    groups.retain(|g| g.entries.len() > 1);

    for group in &mut groups {
        let currencies: Vec<_> = group.entries.iter().map(|e| e.price.currency).collect();
        if currencies.windows(2).any(|w| w[0] != w[1]) {
            warn!("Mixed currencies in group '{}'; spread compares raw amounts", group.title);
        }

        let amounts = group.entries.iter().map(|e| e.price.amount);
        let min = amounts.clone().fold(f64::INFINITY, f64::min);
        let max = amounts.fold(f64::NEG_INFINITY, f64::max);
        group.spread = max - min;
    }

    groups.sort_by(|a, b| a.spread.total_cmp(&b.spread));

    debug!("Aggregated {} comparable product groups", groups.len());
    SpreadReport { groups }
}
