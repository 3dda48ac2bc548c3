//! Attribute vocabulary for iPad Air listing titles.
//!
//! All detection patterns live here. Adding a colour or a screen size is a
//! one-line change to the relevant table, not a regex hunt through the
//! normalizer.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

// Word-anchored so that "118GB" or a model number like "A2311" never reads
// as a screen size.
static SIZE_11: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b11\b").unwrap());
static SIZE_13: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b13\b").unwrap());

// Unit is case-sensitive: "128gb" in a slug is not a capacity claim.
static CAPACITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d+)(GB|TB)\b").unwrap());

static CELLULAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(cellular|5g)\b").unwrap());
static WIFI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bwi-?fi\b").unwrap());

static COLOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(purple|silver|space gray|gold|blue|green|red|pink|starlight)\b").unwrap()
});

/// Screen size of the listed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelSize {
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "13")]
    Thirteen,
    Unknown,
}

impl PanelSize {
    /// Detects the screen size in a raw title. "11" is checked before "13";
    /// first match wins.
    pub fn detect(title: &str) -> Self {
        if SIZE_11.is_match(title) {
            PanelSize::Eleven
        } else if SIZE_13.is_match(title) {
            PanelSize::Thirteen
        } else {
            PanelSize::Unknown
        }
    }
}

impl fmt::Display for PanelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PanelSize::Eleven => "11",
            PanelSize::Thirteen => "13",
            PanelSize::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Storage capacity token, e.g. "128GB" or "1TB".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Capacity {
    Known(String),
    Unknown,
}

impl Capacity {
    /// Detects the first capacity token in a raw title.
    pub fn detect(title: &str) -> Self {
        match CAPACITY.find(title) {
            Some(m) => Capacity::Known(m.as_str().to_string()),
            None => Capacity::Unknown,
        }
    }

    /// Returns the capacity in gigabytes, with TB scaled up.
    pub fn gigabytes(&self) -> Option<u64> {
        let Capacity::Known(token) = self else {
            return None;
        };
        let caps = CAPACITY.captures(token)?;
        let value: u64 = caps[1].parse().ok()?;
        match &caps[2] {
            "TB" => Some(value * 1024),
            _ => Some(value),
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Known(token) => write!(f, "{}", token),
            Capacity::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<Capacity> for String {
    fn from(capacity: Capacity) -> Self {
        capacity.to_string()
    }
}

impl From<String> for Capacity {
    fn from(s: String) -> Self {
        if s == "Unknown" {
            Capacity::Unknown
        } else {
            Capacity::Known(s)
        }
    }
}

/// Network connectivity of the listed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connectivity {
    #[serde(rename = "5G")]
    Cellular,
    #[serde(rename = "Wi-Fi")]
    WiFi,
    Unknown,
}

impl Connectivity {
    /// Detects connectivity. The cellular check runs first: a title listing
    /// "Wi-Fi + Cellular" is a cellular model.
    pub fn detect(title: &str) -> Self {
        if CELLULAR.is_match(title) {
            Connectivity::Cellular
        } else if WIFI.is_match(title) {
            Connectivity::WiFi
        } else {
            Connectivity::Unknown
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Connectivity::Cellular => "5G",
            Connectivity::WiFi => "Wi-Fi",
            Connectivity::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// Finish colours Apple ships the iPad Air in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    Purple,
    Silver,
    #[serde(rename = "Space Gray")]
    SpaceGray,
    Gold,
    Blue,
    Green,
    Red,
    Pink,
    Starlight,
    Unknown,
}

impl Colour {
    /// Detects the first known colour name in a raw title, case-insensitively.
    pub fn detect(title: &str) -> Self {
        let Some(m) = COLOUR.find(title) else {
            return Colour::Unknown;
        };
        match m.as_str().to_lowercase().as_str() {
            "purple" => Colour::Purple,
            "silver" => Colour::Silver,
            "space gray" => Colour::SpaceGray,
            "gold" => Colour::Gold,
            "blue" => Colour::Blue,
            "green" => Colour::Green,
            "red" => Colour::Red,
            "pink" => Colour::Pink,
            "starlight" => Colour::Starlight,
            _ => Colour::Unknown,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Colour::Purple => "Purple",
            Colour::Silver => "Silver",
            Colour::SpaceGray => "Space Gray",
            Colour::Gold => "Gold",
            Colour::Blue => "Blue",
            Colour::Green => "Green",
            Colour::Red => "Red",
            Colour::Pink => "Pink",
            Colour::Starlight => "Starlight",
            Colour::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}
