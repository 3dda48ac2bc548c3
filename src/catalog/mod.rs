//! Normalization core: models, attribute vocabulary, title normalization,
//! and cross-source price diffing.

pub mod diff;
pub mod models;
pub mod normalize;
pub mod vocab;

pub use diff::{aggregate, PriceEntry, ProductGroup, SpreadReport};
pub use models::{Currency, Money, MoneyError, Product};
pub use normalize::{convert_price, Attributes};
pub use vocab::{Capacity, Colour, Connectivity, PanelSize};
