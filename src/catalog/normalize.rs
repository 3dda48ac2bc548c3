//! Title normalization and price conversion.
//!
//! Raw listing titles differ per store ("Apple iPad Air 11\" M2 128GB Wi-Fi
//! Blue" vs "iPad Air 11-inch Blue 128GB WiFi"); normalization maps them onto
//! a fixed canonical template so the same model matches across sources.

use crate::catalog::models::{Money, Product};
use crate::catalog::vocab::{Capacity, Colour, Connectivity, PanelSize};
use crate::sources::SourceId;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").unwrap());

/// The four attributes extracted from a raw title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub size: PanelSize,
    pub capacity: Capacity,
    pub connectivity: Connectivity,
    pub colour: Colour,
}

impl Attributes {
    /// Extracts all attributes from a raw title. Never fails; anything the
    /// vocabulary does not recognize comes back as `Unknown`.
    pub fn from_title(raw_title: &str) -> Self {
        Self {
            size: PanelSize::detect(raw_title),
            capacity: Capacity::detect(raw_title),
            connectivity: Connectivity::detect(raw_title),
            colour: Colour::detect(raw_title),
        }
    }

    /// Synthesizes the canonical title. Always this exact shape, regardless
    /// of how the source phrased the listing.
    pub fn canonical_title(&self) -> String {
        format!(
            "Apple iPad Air {}-inch {} {} {}",
            self.size, self.capacity, self.connectivity, self.colour
        )
    }
}

impl Product {
    /// Builds a normalized product from a raw listing title.
    ///
    /// This is the only way a `Product` is constructed; the canonical title is
    /// derived here and never set independently afterwards.
    pub fn from_title(raw_title: &str, price: Money, source: SourceId) -> Self {
        let attrs = Attributes::from_title(raw_title);
        Product {
            title: attrs.canonical_title(),
            size: attrs.size,
            capacity: attrs.capacity,
            connectivity: attrs.connectivity,
            colour: attrs.colour,
            price,
            source,
        }
    }
}

/// Converts a loosely-formatted price to EUR.
///
/// The first decimal-number substring is taken as the amount and multiplied
/// by `rate`. Input with no digits at all is returned unchanged; that is a
/// deliberate passthrough for junk data, not an error.
pub fn convert_price(amount_repr: &str, rate: f64) -> String {
    let Some(value) = extract_amount(amount_repr) else {
        return amount_repr.to_string();
    };
    match Money::eur(value * rate) {
        Ok(money) => money.to_string(),
        Err(_) => amount_repr.to_string(),
    }
}

/// Extracts the first decimal number from text, if any.
fn extract_amount(text: &str) -> Option<f64> {
    AMOUNT.find(text).and_then(|m| m.as_str().parse().ok())
}
