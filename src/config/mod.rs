//! Configuration module for ico-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ico_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} up to {}", config.crawl.source, config.crawl.deadline);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig, TrafficConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
