//! Crawl frontier: FIFO work queue plus visited set
//!
//! The frontier handles:
//! - Breadth-first ordering of (URL, depth) entries
//! - Depth bounding at enqueue time
//! - De-duplication against both the queue and the visited set
//!
//! De-duplication keys are the stripped form of a URL (no fragment, no query
//! string), so `page?a=1` and `page#top` collapse to one entry. The entry
//! itself keeps the URL as it was pushed.

use crate::url::strip_url;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

/// FIFO queue of pending URLs with a crawl-lifetime visited set
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier bounded at `max_depth`
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Enqueues `url` at `depth`
    ///
    /// # Returns
    ///
    /// `true` if the entry was added. `false` if the depth exceeds the bound,
    /// or the URL was already visited or is already waiting in the queue.
    pub fn push(&mut self, url: &str, depth: u32) -> bool {
        if depth > self.max_depth {
            tracing::trace!("Discarding {} at depth {} (max {})", url, depth, self.max_depth);
            return false;
        }

        let key = strip_url(url);
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return false;
        }

        self.queued.insert(key);
        self.queue.push_back(FrontierEntry {
            url: url.to_string(),
            depth,
        });
        true
    }

    /// Dequeues the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(&strip_url(&entry.url));
        Some(entry)
    }

    /// Marks `url` visited
    ///
    /// # Returns
    ///
    /// `true` if this call claimed the URL, `false` if it was already visited.
    /// Check and insert happen in one step, so a URL can be claimed once.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(strip_url(url))
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(&strip_url(url))
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(&strip_url(url))
    }

    /// Visited URLs, in no particular order
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
