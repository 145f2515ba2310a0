pub mod archive;
pub mod browser;
pub mod browser_setup;
pub mod config;
pub mod crawl_engine;
pub mod digest;
pub mod merge;
pub mod sources;
pub mod utils;

pub use archive::{ArchiveError, ArchiveOptions, ArchiveStore};
pub use browser::{BrowserSession, ChromiumSession, PageHandle};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::DigestConfig;
pub use crawl_engine::{
    CrawlDelay, CrawlError, CrawlOrchestrator, CrawlResult, ExtractionOutcome, FeedItem,
    FrontierError, FrontierQueue, MultiSourceFeed, SourceCrawlManager, SourceFeed,
};
pub use digest::{DigestError, DigestPipeline, SummaryItem, render_digest, run_digest};
pub use merge::{MergeEngine, MergeError};
pub use sources::{ExtractionPolicy, NewsSource};
