//! Concurrent crawl orchestration
//!
//! Coordinates one crawl run:
//! - one browser session, owned here for the whole run
//! - one page and one frontier per enabled source
//! - one spawned task per source, joined with all-or-nothing semantics
//!
//! Tasks share nothing but the session; each writes only its own feed, which
//! is keyed into the multi-source feed after it joins.

use ahash::AHashSet;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;

use super::crawl_types::{CrawlError, CrawlResult, MultiSourceFeed};
use super::source_manager::SourceCrawlManager;
use crate::browser::BrowserSession;
use crate::sources::ExtractionPolicy;

/// Runs every enabled source against one shared browser session
pub struct CrawlOrchestrator<B: BrowserSession> {
    session: B,
    seed: Option<u64>,
}

impl<B: BrowserSession> CrawlOrchestrator<B> {
    #[must_use]
    pub fn new(session: B) -> Self {
        Self {
            session,
            seed: None,
        }
    }

    /// Seed the per-source delay RNGs; source `i` gets `seed + i`
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng_for(&self, index: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Crawl all `sources` concurrently and collect their feeds
    ///
    /// The session is closed only after every source finished. If any source
    /// fails, the remaining tasks are aborted and the error is returned
    /// without closing the session; dropping it tears Chrome down.
    ///
    /// # Errors
    ///
    /// - `CrawlError::Config` for two sources with the same name
    /// - the first error raised by any source task
    /// - `CrawlError::TaskFailed` if a task panicked
    pub async fn run(self, sources: &[Arc<dyn ExtractionPolicy>]) -> CrawlResult<MultiSourceFeed> {
        let start_time = Instant::now();

        let mut seen = AHashSet::new();
        for policy in sources {
            if !seen.insert(policy.name()) {
                return Err(CrawlError::Config(format!(
                    "Source '{}' enabled more than once",
                    policy.name()
                )));
            }
        }

        // Pages first, so a failed allocation leaves nothing running.
        let mut managers = Vec::with_capacity(sources.len());
        for (index, policy) in sources.iter().enumerate() {
            let page = self.session.open_page().await?;
            let manager = SourceCrawlManager::new(Arc::clone(policy), page, self.rng_for(index))?;
            managers.push((policy.name().to_string(), manager));
        }

        let mut active_tasks = FuturesUnordered::new();
        let mut abort_handles: Vec<AbortHandle> = Vec::with_capacity(managers.len());
        for (name, manager) in managers {
            let task = tokio::spawn(async move {
                let result = manager.run().await;
                (name, result)
            });
            abort_handles.push(task.abort_handle());
            active_tasks.push(task);
        }
        info!("Crawling {} sources", abort_handles.len());

        let mut feed = MultiSourceFeed::new();
        while let Some(joined) = active_tasks.next().await {
            let failure = match joined {
                Ok((name, Ok(items))) => {
                    debug!("Source {name} completed with {} items", items.len());
                    feed.insert(name, items);
                    continue;
                }
                Ok((name, Err(e))) => {
                    error!("Source {name} failed: {e}");
                    e
                }
                Err(e) => {
                    error!("Source task panicked: {e}");
                    CrawlError::TaskFailed(e.to_string())
                }
            };
            for handle in &abort_handles {
                handle.abort();
            }
            return Err(failure);
        }

        self.session.close().await?;
        info!(
            "Crawl completed: {} sources, {} items in {:.1}s",
            feed.len(),
            feed.values().map(Vec::len).sum::<usize>(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(feed)
    }
}
