//! Data models for listings, monetary amounts, and normalized products.

use crate::catalog::vocab::{Capacity, Colour, Connectivity, PanelSize};
use crate::sources::SourceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currencies the pipeline can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
}

impl Currency {
    /// Returns the 3-letter ISO code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(MoneyError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Errors from constructing or parsing a monetary amount.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MoneyError {
    #[error("amount is not a finite number: {0}")]
    NotFinite(f64),
    #[error("amount is negative: {0}")]
    Negative(f64),
    #[error("unknown currency code '{0}'")]
    UnknownCurrency(String),
    #[error("malformed price '{0}', expected '<CCY> <amount>'")]
    Malformed(String),
}

/// A currency-tagged amount, validated at construction.
///
/// Displays in the wire shape used throughout the report: `"EUR 618.93"`
/// (code, one space, exactly 2 fraction digits).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub currency: Currency,
    pub amount: f64,
}

impl Money {
    /// Creates a new amount. Rejects non-finite and negative values.
    pub fn new(currency: Currency, amount: f64) -> Result<Self, MoneyError> {
        if !amount.is_finite() {
            return Err(MoneyError::NotFinite(amount));
        }
        if amount < 0.0 {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self { currency, amount })
    }

    /// Creates a EUR amount.
    pub fn eur(amount: f64) -> Result<Self, MoneyError> {
        Self::new(Currency::Eur, amount)
    }

    /// Parses a `"CCY amount"` string, e.g. `"EUR 618.93"` or `"EUR 849,00"`.
    ///
    /// Both period and comma decimal separators are accepted since EU retail
    /// sites render prices either way.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let malformed = || MoneyError::Malformed(s.to_string());

        let mut tokens = s.split_whitespace();
        let code = tokens.next().ok_or_else(malformed)?;
        let amount_text = tokens.next().ok_or_else(malformed)?;
        if tokens.next().is_some() {
            return Err(malformed());
        }

        let currency = code.parse::<Currency>()?;
        let amount = parse_decimal(amount_text).ok_or_else(malformed)?;
        Self::new(currency, amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// Parses a decimal number from text, handling both EU and US separators.
pub(crate) fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned: String =
        text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',').collect();

    if cleaned.is_empty() {
        return None;
    }

    // The decimal separator, if any, is whichever comes last.
    let last_comma = cleaned.rfind(',');
    let last_period = cleaned.rfind('.');

    let normalized = match (last_comma, last_period) {
        (Some(_), None) => cleaned.replace(',', "."),
        (None, Some(_)) => cleaned,
        (Some(c), Some(p)) => {
            if c > p {
                // EU format: 1.234,56 -> 1234.56
                cleaned.replace('.', "").replace(',', ".")
            } else {
                // US format: 1,234.56 -> 1234.56
                cleaned.replace(',', "")
            }
        }
        (None, None) => cleaned,
    };

    normalized.parse().ok()
}

/// A normalized product listing.
///
/// `title` is always the canonical title derived from the four attributes,
/// never the raw source phrasing. Two differently-worded listings collapse to
/// the same title exactly when all four attributes agree, which is what makes
/// cross-source matching work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Canonical title, the cross-source grouping key.
    pub title: String,
    /// Screen size.
    pub size: PanelSize,
    /// Storage capacity token, e.g. "128GB".
    pub capacity: Capacity,
    /// Wi-Fi or cellular.
    pub connectivity: Connectivity,
    /// Finish colour.
    pub colour: Colour,
    /// Listing price.
    pub price: Money,
    /// Retail site the listing came from.
    pub source: SourceId,
}
