//! Core types for per-source crawling.
//!
//! This module contains the fundamental types used throughout the crawl engine:
//! the error taxonomy, the outcome an extraction policy reports for one page,
//! and the feeds that crawling produces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::frontier::FrontierError;

/// Error type for crawl operations
///
/// Every variant is fatal for the run that produced it. The crawl engine
/// performs no retries; callers decide what to do with a failed run.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Frontier queue misuse (QueueFull / QueueEmpty)
    #[error("Frontier error: {0}")]
    Frontier(#[from] FrontierError),

    /// Extraction policy produced a malformed or fatal result
    #[error("Extraction failed for {source_name} at {url}: {reason}")]
    ExtractionFailure {
        source_name: String,
        url: String,
        reason: String,
    },

    /// Browser session or page operation failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// Invalid source set or settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source task panicked or was cancelled
    #[error("Source task failed: {0}")]
    TaskFailed(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Browser(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// One extracted news item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Either a full article or a summary lead
    pub text: String,
    /// Page the text was scraped from
    pub url: String,
    /// True for full articles that still need summarizing
    pub needs_summary: bool,
}

impl FeedItem {
    #[must_use]
    pub fn lead(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            needs_summary: false,
        }
    }

    #[must_use]
    pub fn article(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            needs_summary: true,
        }
    }
}

/// Items extracted for one source, in extraction order
pub type SourceFeed = Vec<FeedItem>;

/// Source name -> that source's feed. Only enabled sources appear as keys.
///
/// A `BTreeMap` gives every downstream stage the same stable source order.
pub type MultiSourceFeed = BTreeMap<String, SourceFeed>;

/// What an extraction policy made of one fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Listing page: enqueue these links on the same frontier
    FollowupLinks(Vec<String>),
    /// Detail page: one item for the source feed
    Item(FeedItem),
    /// Listing page that carries items inline as well as links to follow
    Listing {
        links: Vec<String>,
        items: Vec<FeedItem>,
    },
    /// Out of scope for the digest (features, quizzes, book reviews)
    Cancelled,
    /// Page did not have the expected shape; aborts the whole crawl
    Fatal(String),
}

impl ExtractionOutcome {
    /// Short label for log lines
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FollowupLinks(_) => "followup-links",
            Self::Item(_) => "item",
            Self::Listing { .. } => "listing",
            Self::Cancelled => "cancelled",
            Self::Fatal(_) => "fatal",
        }
    }
}
