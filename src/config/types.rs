use crate::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Main configuration structure for ico-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub traffic: TrafficConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Event source website (only "icodrops.com" is supported)
    pub source: String,

    /// Deadline cutoff date, `YYYY/MM/DD` or `YYYY-MM-DD`; events ending
    /// before it are dropped from the crawl
    pub deadline: String,

    /// Courtesy delay between traffic lookups (milliseconds)
    #[serde(rename = "interval-ms", default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Output name component; the state file becomes `icoEvent(<name>).json`
    pub name: String,
}

impl CrawlConfig {
    /// The deadline parsed as a date.
    pub fn deadline_date(&self) -> Result<NaiveDate, ConfigError> {
        parse_deadline(&self.deadline)
    }
}

/// Parses a deadline in either of the accepted formats.
pub fn parse_deadline(text: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(text, "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .map_err(|_| {
            ConfigError::Validation(format!(
                "deadline must be YYYY/MM/DD or YYYY-MM-DD, got '{}'",
                text
            ))
        })
}

fn default_interval_ms() -> u64 {
    1000
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the crawl state file and CSV report are written to
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Traffic data service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrafficConfig {
    /// Base URL of the traffic data service
    pub endpoint: String,
}
