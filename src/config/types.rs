//! Core configuration types for a digest run
//!
//! This module contains the `DigestConfig` struct that defines which sources
//! are crawled and how the crawled feed is filtered, summarized and merged.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sources::NewsSource;

/// Main configuration struct for a digest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Enabled sources, deduplicated, in the order given
    pub(crate) sources: Vec<NewsSource>,
    pub(crate) headless: bool,
    /// Chrome profile directory; a fresh temporary one when `None`
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Filter items seen in earlier runs through the archive store
    pub(crate) archive_enabled: bool,
    pub(crate) archive_path: PathBuf,
    pub(crate) archive_retention_threshold: usize,
    pub(crate) archive_eviction_batch: usize,

    /// Upper bound on items in the final digest
    ///
    /// **INVARIANT:** at least `sources.len()` (checked in builder).
    pub(crate) max_feed_items: usize,

    /// Seed for crawl delays and the merge shuffle; OS entropy when `None`
    pub(crate) rng_seed: Option<u64>,

    /// Shell-style command line of the external summarizer
    pub(crate) summarizer_command: Option<String>,
    /// Shell-style command line of the external semantic deduper
    pub(crate) deduper_command: Option<String>,
}
