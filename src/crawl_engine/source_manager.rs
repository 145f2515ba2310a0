//! Per-source crawl state machine
//!
//! One manager drives one source: it drains the source's frontier, waits the
//! politeness delay, navigates its page and hands the result to the source's
//! extraction policy. Listing pages grow the frontier; detail pages grow the
//! feed. The manager stops when the frontier is exhausted.
//!
//! ```text
//! Idle <- Fetching(url) -> Extracting(url) -> EnqueueMore | StoreItem | SkipSilently
//!                ^                                          |
//!                +------------------------------------------+
//! ```

use log::{debug, info, trace};
use rand::rngs::StdRng;
use std::sync::Arc;

use super::crawl_types::{CrawlError, CrawlResult, ExtractionOutcome, FeedItem, SourceFeed};
use super::frontier::FrontierQueue;
use crate::browser::PageHandle;
use crate::sources::ExtractionPolicy;

/// Where a source manager is in its loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// Frontier exhausted; the manager is finished
    Idle,
    /// About to wait and navigate to the URL
    Fetching(String),
    /// URL is loaded and ready for the extraction policy
    Extracting(String),
    /// Links to append to the frontier
    EnqueueMore(Vec<String>),
    /// Item to append to the feed
    StoreItem(FeedItem),
    /// Page was out of scope
    SkipSilently,
}

impl CrawlState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

pub struct SourceCrawlManager<P: PageHandle> {
    policy: Arc<dyn ExtractionPolicy>,
    page: P,
    frontier: FrontierQueue<String>,
    rng: StdRng,
    feed: SourceFeed,
    pages_visited: usize,
}

impl<P: PageHandle> SourceCrawlManager<P> {
    /// Manager whose frontier holds only the policy's listing URL
    ///
    /// # Errors
    ///
    /// Propagates a frontier error from seeding, which a fresh queue never raises.
    pub fn new(policy: Arc<dyn ExtractionPolicy>, page: P, rng: StdRng) -> CrawlResult<Self> {
        let mut frontier = FrontierQueue::new();
        frontier.enqueue(policy.listing_url().to_string())?;
        Ok(Self::with_frontier(policy, page, frontier, rng))
    }

    /// Manager over a frontier prepared by the caller
    #[must_use]
    pub fn with_frontier(
        policy: Arc<dyn ExtractionPolicy>,
        page: P,
        frontier: FrontierQueue<String>,
        rng: StdRng,
    ) -> Self {
        Self {
            policy,
            page,
            frontier,
            rng,
            feed: SourceFeed::new(),
            pages_visited: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.policy.name()
    }

    #[must_use]
    pub fn frontier(&self) -> &FrontierQueue<String> {
        &self.frontier
    }

    #[must_use]
    pub fn feed(&self) -> &SourceFeed {
        &self.feed
    }

    #[must_use]
    pub fn pages_visited(&self) -> usize {
        self.pages_visited
    }

    /// Dequeue the next URL, or go idle when there is none
    fn next_fetch(&mut self) -> CrawlResult<CrawlState> {
        if self.frontier.is_empty() {
            return Ok(CrawlState::Idle);
        }
        Ok(CrawlState::Fetching(self.frontier.dequeue()?))
    }

    /// Perform one transition
    ///
    /// # Errors
    ///
    /// Browser failures, frontier errors and `ExtractionFailure` for a fatal
    /// outcome. None of them are retried.
    pub async fn step(&mut self, state: CrawlState) -> CrawlResult<CrawlState> {
        match state {
            CrawlState::Idle => Ok(CrawlState::Idle),
            CrawlState::Fetching(url) => {
                let delay = self.policy.crawl_delay().sample(&mut self.rng);
                trace!("[{}] waiting {delay:?} before {url}", self.name());
                self.page.wait(delay).await;
                debug!("[{}] navigating to {url}", self.name());
                self.page.navigate(&url).await?;
                self.pages_visited += 1;
                Ok(CrawlState::Extracting(url))
            }
            CrawlState::Extracting(url) => {
                let is_listing = url == self.policy.listing_url();
                let outcome = self.policy.extract(&self.page, &url, is_listing).await?;
                debug!("[{}] {} -> {}", self.name(), url, outcome.kind());
                match outcome {
                    ExtractionOutcome::FollowupLinks(links) => Ok(CrawlState::EnqueueMore(links)),
                    ExtractionOutcome::Item(item) => Ok(CrawlState::StoreItem(item)),
                    ExtractionOutcome::Listing { links, items } => {
                        self.feed.extend(items);
                        Ok(CrawlState::EnqueueMore(links))
                    }
                    ExtractionOutcome::Cancelled => Ok(CrawlState::SkipSilently),
                    ExtractionOutcome::Fatal(reason) => Err(CrawlError::ExtractionFailure {
                        source_name: self.name().to_string(),
                        url,
                        reason,
                    }),
                }
            }
            CrawlState::EnqueueMore(links) => {
                for link in links {
                    self.frontier.enqueue(link)?;
                }
                self.next_fetch()
            }
            CrawlState::StoreItem(item) => {
                self.feed.push(item);
                self.next_fetch()
            }
            CrawlState::SkipSilently => self.next_fetch(),
        }
    }

    /// Drive the loop until the frontier is exhausted
    ///
    /// # Errors
    ///
    /// The first error any transition raises.
    pub async fn run(mut self) -> CrawlResult<SourceFeed> {
        info!("[{}] crawl started at {}", self.name(), self.policy.listing_url());
        let mut state = self.next_fetch()?;
        while !state.is_idle() {
            state = self.step(state).await?;
        }
        info!(
            "[{}] crawl finished: {} pages, {} items",
            self.name(),
            self.pages_visited,
            self.feed.len()
        );
        Ok(self.feed)
    }
}
