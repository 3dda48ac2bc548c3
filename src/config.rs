//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_PLAISIO_URL: &str =
    "https://www.plaisio.gr/tilefonia-tablet/tablet/apple?location=categories=%CE%A4%CE%B7%CE%BB%CE%B5%CF%86%CF%89%CE%BD%CE%AF%CE%B1+%26+tablet,tablet;brand=apple;tab_model=ipad+air+6th+gen";

const DEFAULT_APPLE_URL: &str = "https://www.apple.com/uk-edu/shop/buy-ipad/ipad-air/";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Plaisio catalog URL (pagination parameters are appended per page)
    #[serde(default = "default_plaisio_url")]
    pub plaisio_url: String,

    /// Apple store page URL
    #[serde(default = "default_apple_url")]
    pub apple_url: String,

    /// Products requested per Plaisio page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Safety cap on Plaisio pagination
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Base delay between requests in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_plaisio_url() -> String {
    DEFAULT_PLAISIO_URL.to_string()
}

fn default_apple_url() -> String {
    DEFAULT_APPLE_URL.to_string()
}

fn default_page_size() -> u32 {
    48
}

fn default_max_pages() -> u32 {
    20
}

fn default_delay_ms() -> u64 {
    500
}

fn default_delay_jitter_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plaisio_url: default_plaisio_url(),
            apple_url: default_apple_url(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("ipad-pricer").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("IPAD_PLAISIO_URL") {
            self.plaisio_url = url;
        }

        if let Ok(url) = std::env::var("IPAD_APPLE_URL") {
            self.apple_url = url;
        }

        if let Ok(delay) = std::env::var("IPAD_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.plaisio_url.contains("plaisio.gr"));
        assert!(config.apple_url.contains("apple.com"));
        assert_eq!(config.page_size, 48);
        assert_eq!(config.max_pages, 20);
        assert_eq!(config.delay_ms, 500);
        assert_eq!(config.delay_jitter_ms, 500);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "invalid".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
        assert!(err.contains("table, json, markdown, csv"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Markdown.to_string(), "markdown");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            plaisio_url = "https://example.test/catalog"
            page_size = 24
            delay_ms = 1000
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.plaisio_url, "https://example.test/catalog");
        assert_eq!(config.page_size, 24);
        assert_eq!(config.delay_ms, 1000);
        assert_eq!(config.format, OutputFormat::Json);
        // Unspecified fields fall back to defaults
        assert!(config.apple_url.contains("apple.com"));
        assert_eq!(config.max_pages, 20);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            apple_url = "https://example.test/ipad"
            max_pages = 3
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.apple_url, "https://example.test/ipad");
        assert_eq!(config.max_pages, 3);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let result = Config::from_file("/nonexistent/path/config.toml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let result = Config::from_file(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "delay_ms = 1234").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.delay_ms, 1234);
    }

    #[test]
    fn test_config_with_env() {
        let orig_plaisio = std::env::var("IPAD_PLAISIO_URL").ok();
        let orig_delay = std::env::var("IPAD_DELAY").ok();

        std::env::set_var("IPAD_PLAISIO_URL", "https://env.test/catalog");
        std::env::set_var("IPAD_DELAY", "2500");

        let config = Config::new().with_env();
        assert_eq!(config.plaisio_url, "https://env.test/catalog");
        assert_eq!(config.delay_ms, 2500);

        match orig_plaisio {
            Some(v) => std::env::set_var("IPAD_PLAISIO_URL", v),
            None => std::env::remove_var("IPAD_PLAISIO_URL"),
        }
        match orig_delay {
            Some(v) => std::env::set_var("IPAD_DELAY", v),
            None => std::env::remove_var("IPAD_DELAY"),
        }
    }

    #[test]
    fn test_config_with_env_invalid_delay_ignored() {
        let orig_delay = std::env::var("IPAD_DELAY").ok();

        std::env::set_var("IPAD_DELAY", "not_a_number");
        let config = Config::new().with_env();
        assert_eq!(config.delay_ms, 500);

        match orig_delay {
            Some(v) => std::env::set_var("IPAD_DELAY", v),
            None => std::env::remove_var("IPAD_DELAY"),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config { page_size: 12, format: OutputFormat::Csv, ..Config::default() };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.page_size, 12);
        assert_eq!(parsed.format, OutputFormat::Csv);
        assert_eq!(parsed.plaisio_url, config.plaisio_url);
    }
}
