//! Configuration module for finharvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default except the output folder, so a minimal file is:
//!
//! ```toml
//! [output]
//! folder = "./harvest"
//! ```
//!
//! # Example
//!
//! ```no_run
//! use finharvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FetchConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_start_url, validate};
