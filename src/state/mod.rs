//! State module for tracking fetch progress
//!
//! # Components
//!
//! - `FetchState`: Tracks where a single URL is in its fetch/retry lifecycle

mod fetch_state;

pub use fetch_state::FetchState;
