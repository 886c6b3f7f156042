//! ico-harvest: a resumable ICO event listing crawler
//!
//! This crate crawls initial-coin-offering event listings from icodrops.com,
//! persists crawl state to a JSON file after each phase, enriches every event
//! with a traffic metric from an external data service, and emits a CSV report
//! once both phases are complete.

pub mod config;
pub mod crawler;
pub mod event;
pub mod normalize;
pub mod output;
pub mod page;
pub mod state;
pub mod traffic;

use thiserror::Error;

/// Main error type for ico-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Page error: {0}")]
    Page(#[from] page::PageError),

    #[error("Traffic error: {0}")]
    Traffic(#[from] traffic::TrafficError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Crawl state file {path} is corrupt: {reason}")]
    CorruptState { path: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I don't know how to crawl events from {0}")]
    UnknownSource(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors from the date normalizers
///
/// An unrecognized month name is a hard error here rather than a silently
/// invalid date; the rest of the event's already-parsed fields survive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized month name: {0:?}")]
    UnrecognizedMonth(String),

    #[error("no such date: {year:04}/{month:02}/{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Result type alias for ico-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_harvest, PhaseFailure, RunOutcome};
pub use event::{EventStatus, IcoEvent, Traffic};
pub use state::{CrawlFile, CrawlPhase, CrawlerStatus};
