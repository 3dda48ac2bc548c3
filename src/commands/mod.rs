//! CLI command implementations.

pub mod normalize;
pub mod report;

pub use normalize::NormalizeCommand;
pub use report::ReportCommand;
