//! Output module for harvest records and run reports
//!
//! This module handles:
//! - Writing financial pages and documents as `.txt` records
//! - Reading those records back for downstream tools
//! - Rendering the end-of-run summary

mod persist;
mod reader;
mod summary;

pub use persist::{
    format_financial_record, format_page_record, safe_filename, Persister, DOCUMENTS_DIR,
    LISTED_PATTERNS, SEPARATOR_WIDTH,
};
pub use reader::{parse_harvest_record, read_harvest_header, HarvestHeader};
pub use summary::{print_summary, render_summary};
