//! Normalize command: shows how a raw title maps onto the canonical form.

use crate::catalog::Attributes;
use crate::config::{Config, OutputFormat};
use anyhow::Result;

/// Inspects title normalization for a single raw title.
pub struct NormalizeCommand {
    config: Config,
}

impl NormalizeCommand {
    /// Creates a new normalize command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Normalizes the title and returns the extracted attributes.
    pub fn execute(&self, title: &str) -> Result<String> {
        let attrs = Attributes::from_title(title);

        match self.config.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "input": title,
                    "canonical": attrs.canonical_title(),
                    "size": attrs.size,
                    "capacity": attrs.capacity,
                    "gigabytes": attrs.capacity.gigabytes(),
                    "connectivity": attrs.connectivity,
                    "colour": attrs.colour,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            _ => {
                let mut lines = Vec::new();
                lines.push(format!("Input:        {}", title));
                lines.push(format!("Canonical:    {}", attrs.canonical_title()));
                lines.push(format!("Size:         {}", attrs.size));
                lines.push(format!("Capacity:     {}", attrs.capacity));
                if let Some(gb) = attrs.capacity.gigabytes() {
                    lines.push(format!("Gigabytes:    {}", gb));
                }
                lines.push(format!("Connectivity: {}", attrs.connectivity));
                lines.push(format!("Colour:       {}", attrs.colour));
                Ok(lines.join("\n"))
            }
        }
    }
}
