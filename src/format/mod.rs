//! Output formatting for spread reports (table, JSON, markdown, CSV).

use crate::catalog::SpreadReport;
use crate::config::OutputFormat;

/// Formats spread reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full report.
    pub fn format_report(&self, report: &SpreadReport) -> String {
        if report.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No comparable products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_report(report),
            OutputFormat::Table => self.table_report(report),
            OutputFormat::Markdown => self.markdown_report(report),
            OutputFormat::Csv => self.csv_report(report),
        }
    }

    // JSON formatting

    fn json_report(&self, report: &SpreadReport) -> String {
        serde_json::to_string_pretty(&report.groups).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_report(&self, report: &SpreadReport) -> String {
        let mut lines = Vec::new();

        for group in &report.groups {
            let cheapest_amount = group.cheapest().map(|e| e.price.amount);

            lines.push(group.title.clone());
            for entry in &group.entries {
                let marker = if Some(entry.price.amount) == cheapest_amount {
                    "  <- cheapest"
                } else {
                    ""
                };
                lines.push(format!("  - {}: {}{}", entry.source, entry.price, marker));
            }
            lines.push(format!("  Price difference: {:.2}", group.spread));
            lines.push(String::new());
        }

        lines.push(format!("Total: {} comparable products", report.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_report(&self, report: &SpreadReport) -> String {
        let mut lines = Vec::new();

        for group in &report.groups {
            let cheapest_amount = group.cheapest().map(|e| e.price.amount);

            lines.push(format!("## {}", group.title));
            lines.push(String::new());
            for entry in &group.entries {
                let marker = if Some(entry.price.amount) == cheapest_amount {
                    " **(cheapest)**"
                } else {
                    ""
                };
                lines.push(format!("- **{}:** {}{}", entry.source, entry.price, marker));
            }
            lines.push(format!("- **Price difference:** {:.2}", group.spread));
            lines.push(String::new());
        }

        lines.push(format!("*{} comparable products*", report.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "title,source,currency,amount,spread".to_string()
    }

    fn csv_report(&self, report: &SpreadReport) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for group in &report.groups {
            let title = Self::csv_escape(&group.title);
            for entry in &group.entries {
                lines.push(format!(
                    "{},{},{},{:.2},{:.2}",
                    title,
                    entry.source,
                    entry.price.currency,
                    entry.price.amount,
                    group.spread
                ));
            }
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{aggregate, Money, Product};
    use crate::sources::SourceId;

    fn make_report() -> SpreadReport {
        aggregate(vec![
            Product::from_title(
                "iPad Air 11 128GB Wi-Fi Blue",
                Money::eur(649.0).unwrap(),
                SourceId::Plaisio,
            ),
            Product::from_title(
                "Apple iPad Air 11-inch WiFi 128GB blue",
                Money::eur(618.93).unwrap(),
                SourceId::Apple,
            ),
            Product::from_title(
                "iPad Air 13 256GB 5G Purple",
                Money::eur(999.0).unwrap(),
                SourceId::Plaisio,
            ),
            Product::from_title(
                "iPad Air 13 Cellular 256GB Purple",
                Money::eur(1003.0).unwrap(),
                SourceId::Apple,
            ),
        ])
    }

    #[test]
    fn test_table_report() {
        let output = Formatter::new(OutputFormat::Table).format_report(&make_report());

        assert!(output.contains("Apple iPad Air 11-inch 128GB Wi-Fi Blue"));
        assert!(output.contains("  - PLAISIO: EUR 649.00"));
        assert!(output.contains("  - APPLE: EUR 618.93  <- cheapest"));
        assert!(output.contains("  Price difference: 30.07"));
        assert!(output.contains("Total: 2 comparable products"));
    }

    #[test]
    fn test_table_report_sorted_ascending() {
        let output = Formatter::new(OutputFormat::Table).format_report(&make_report());

        // The 5G group has the smaller spread, so it prints first.
        let pos_5g = output.find("Apple iPad Air 13-inch 256GB 5G Purple").unwrap();
        let pos_wifi = output.find("Apple iPad Air 11-inch 128GB Wi-Fi Blue").unwrap();
        assert!(pos_5g < pos_wifi);
    }

    #[test]
    fn test_table_empty() {
        let output = Formatter::new(OutputFormat::Table).format_report(&SpreadReport::default());
        assert_eq!(output, "No comparable products found.");
    }

    #[test]
    fn test_json_report() {
        let output = Formatter::new(OutputFormat::Json).format_report(&make_report());

        assert!(output.starts_with('['));
        assert!(output.contains("Apple iPad Air 11-inch 128GB Wi-Fi Blue"));
        assert!(output.contains("\"PLAISIO\""));
        assert!(output.contains("\"spread\""));
    }

    #[test]
    fn test_json_empty() {
        let output = Formatter::new(OutputFormat::Json).format_report(&SpreadReport::default());
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_markdown_report() {
        let output = Formatter::new(OutputFormat::Markdown).format_report(&make_report());

        assert!(output.contains("## Apple iPad Air 11-inch 128GB Wi-Fi Blue"));
        assert!(output.contains("- **APPLE:** EUR 618.93 **(cheapest)**"));
        assert!(output.contains("- **Price difference:** 30.07"));
        assert!(output.contains("*2 comparable products*"));
    }

    #[test]
    fn test_markdown_empty() {
        let output = Formatter::new(OutputFormat::Markdown).format_report(&SpreadReport::default());
        assert_eq!(output, "No comparable products found.");
    }

    #[test]
    fn test_csv_report() {
        let output = Formatter::new(OutputFormat::Csv).format_report(&make_report());

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "title,source,currency,amount,spread");
        // 2 groups x 2 entries
        assert_eq!(lines.len(), 5);
        assert!(output.contains("Apple iPad Air 11-inch 128GB Wi-Fi Blue,PLAISIO,EUR,649.00,30.07"));
    }

    #[test]
    fn test_csv_empty() {
        let output = Formatter::new(OutputFormat::Csv).format_report(&SpreadReport::default());
        assert_eq!(output, "title,source,currency,amount,spread");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
    }
}
