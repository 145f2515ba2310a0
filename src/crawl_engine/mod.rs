//! Crawl Engine Module
//!
//! This module contains the concurrent crawl core: the per-source frontier
//! queue, the source crawl state machine, and the orchestrator that runs one
//! state machine per enabled source against a shared browser session.

// Sub-modules
pub mod crawl_delay;
pub mod crawl_types;
pub mod frontier;
pub mod orchestrator;
pub mod source_manager;

// Re-export crawl types
pub use crawl_types::{
    CrawlError, CrawlResult, ExtractionOutcome, FeedItem, MultiSourceFeed, SourceFeed,
};

// Re-export the frontier queue
pub use frontier::{FrontierError, FrontierQueue, INDEX_END, INDEX_START};

// Re-export orchestration types
pub use crawl_delay::CrawlDelay;
pub use orchestrator::CrawlOrchestrator;
pub use source_manager::{CrawlState, SourceCrawlManager};
