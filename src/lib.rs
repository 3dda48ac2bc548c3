//! ipad-pricer - Cross-store iPad Air price comparison CLI
//!
//! Scrapes iPad Air listings from multiple retail sites, normalizes their
//! titles onto one canonical form, and reports price spreads for models
//! listed more than once.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod format;
pub mod sources;

pub use catalog::{Currency, Money, Product, SpreadReport};
pub use config::Config;
pub use sources::SourceId;
