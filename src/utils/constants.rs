//! Shared configuration constants for newsdigest
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Maximum number of summaries in the merged feed
///
/// Keeps the daily briefing readable in one sitting. Must stay at or above
/// the number of enabled sources, otherwise the merge step starves a source.
pub const DEFAULT_MAX_FEED_ITEMS: usize = 15;

/// Archive size that triggers eviction of the oldest fingerprints
pub const DEFAULT_ARCHIVE_RETENTION_THRESHOLD: usize = 1000;

/// Number of oldest fingerprints removed per eviction pass
pub const DEFAULT_ARCHIVE_EVICTION_BATCH: usize = 100;

/// Default archive database file, relative to the working directory
pub const DEFAULT_ARCHIVE_PATH: &str = ".archive.sqlite";

/// PBS NewsHour "latest" timeline
pub const PBS_LISTING_URL: &str = "https://www.pbs.org/newshour/latest";

/// NPR news section front page
pub const NPR_LISTING_URL: &str = "https://www.npr.org/sections/news/";

/// UPI top news section front page
pub const UPI_LISTING_URL: &str = "https://www.upi.com/Top_News/";

/// PBS robots.txt asks for a 2 second crawl-delay; we wait 2-4 seconds.
pub const PBS_DELAY_BASE_MS: u64 = 2_000;
pub const PBS_DELAY_JITTER_MS: u64 = 2_000;

/// NPR and UPI publish no crawl-delay; wait 10-20 seconds between pages.
pub const SLOW_DELAY_BASE_MS: u64 = 10_000;
pub const SLOW_DELAY_JITTER_MS: u64 = 10_000;

/// Desktop Chrome user agent sent with every news page request
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
