//! Post-crawl digest pipeline
//!
//! Turns a multi-source feed into the final briefing:
//! 1. drop items whose URL was archived by an earlier run
//! 2. summarize full articles
//! 3. remove semantic duplicates across sources
//! 4. cap and shuffle into one feed
//!
//! `run_digest` wires the crawl and the pipeline together for the binary.

pub mod collaborators;
pub mod render;

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::archive::{ArchiveError, ArchiveStore};
use crate::browser::ChromiumSession;
use crate::config::DigestConfig;
use crate::crawl_engine::{CrawlError, CrawlOrchestrator, MultiSourceFeed};
use crate::merge::{MergeEngine, MergeError};
use crate::sources::policies_for;

pub use collaborators::{Deduper, ExternalCommand, Passthrough, Summarizer, TextMultiFeed};
pub use render::render_digest;

/// Errors raised anywhere in a digest run
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Summarizer or deduper failed or broke its contract
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

/// One line of the final digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub text: String,
    pub url: String,
}

type SummaryMultiFeed = BTreeMap<String, Vec<SummaryItem>>;

fn text_lists(feed: &SummaryMultiFeed) -> TextMultiFeed {
    feed.iter()
        .map(|(source, items)| {
            (
                source.clone(),
                items.iter().map(|item| item.text.clone()).collect(),
            )
        })
        .collect()
}

pub struct DigestPipeline {
    archive: Option<ArchiveStore>,
    summarizer: Box<dyn Summarizer>,
    deduper: Box<dyn Deduper>,
    merger: MergeEngine,
    max_items: usize,
}

impl DigestPipeline {
    /// Pipeline without archive filtering and with passthrough collaborators
    #[must_use]
    pub fn new(max_items: usize) -> Self {
        Self {
            archive: None,
            summarizer: Box::new(Passthrough),
            deduper: Box::new(Passthrough),
            merger: MergeEngine::new(),
            max_items,
        }
    }

    #[must_use]
    pub fn with_archive(mut self, archive: ArchiveStore) -> Self {
        self.archive = Some(archive);
        self
    }

    #[must_use]
    pub fn with_summarizer(mut self, summarizer: impl Summarizer + 'static) -> Self {
        self.summarizer = Box::new(summarizer);
        self
    }

    #[must_use]
    pub fn with_deduper(mut self, deduper: impl Deduper + 'static) -> Self {
        self.deduper = Box::new(deduper);
        self
    }

    #[must_use]
    pub fn with_merge_engine(mut self, merger: MergeEngine) -> Self {
        self.merger = merger;
        self
    }

    /// Run every stage over `feed`
    pub async fn process(&mut self, feed: MultiSourceFeed) -> Result<Vec<SummaryItem>, DigestError> {
        let feed = self.filter_archived(feed).await?;
        let feed = self.summarize(feed).await?;
        let feed = self.dedupe(feed).await?;
        self.merge(feed)
    }

    /// Keep only items whose URL the archive has not seen
    async fn filter_archived(&self, mut feed: MultiSourceFeed) -> Result<MultiSourceFeed, DigestError> {
        let Some(archive) = &self.archive else {
            return Ok(feed);
        };
        info!("Filtering out already-seen articles");
        let urls: Vec<String> = feed
            .values()
            .flat_map(|items| items.iter().map(|item| item.url.clone()))
            .collect();
        let allowed = archive.run(urls).await?;
        for items in feed.values_mut() {
            items.retain(|item| allowed.contains(&item.url));
        }
        Ok(feed)
    }

    /// Replace full articles with summaries, keeping leads as they are
    async fn summarize(&self, feed: MultiSourceFeed) -> Result<SummaryMultiFeed, DigestError> {
        let articles: Vec<String> = feed
            .values()
            .flatten()
            .filter(|item| item.needs_summary)
            .map(|item| item.text.clone())
            .collect();

        let replies = if articles.is_empty() {
            Vec::new()
        } else {
            info!("Summarizing {} articles", articles.len());
            let expected = articles.len();
            let replies = self.summarizer.summarize(articles).await?;
            if replies.len() != expected {
                return Err(DigestError::Collaborator(format!(
                    "Summarizer returned {} summaries for {expected} articles",
                    replies.len()
                )));
            }
            replies
        };
        let mut summaries = replies.into_iter();

        let mut summarized = SummaryMultiFeed::new();
        for (source, items) in feed {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                let text = if item.needs_summary {
                    summaries.next().ok_or_else(|| {
                        DigestError::Collaborator("Summarizer reply ran short".to_string())
                    })?
                } else {
                    item.text
                };
                converted.push(SummaryItem { text, url: item.url });
            }
            summarized.insert(source, converted);
        }
        Ok(summarized)
    }

    /// Drop items whose text the deduper removed from their source's list
    async fn dedupe(&self, mut feed: SummaryMultiFeed) -> Result<SummaryMultiFeed, DigestError> {
        info!("Removing semantic duplicates across sources");
        let kept = self.deduper.dedupe(text_lists(&feed)).await?;
        for (source, items) in &mut feed {
            let survivors = kept.get(source);
            items.retain(|item| survivors.is_some_and(|texts| texts.contains(&item.text)));
        }
        Ok(feed)
    }

    /// Cap and shuffle, then give each text the URL of the first unused item
    /// carrying it, in source order
    fn merge(&mut self, feed: SummaryMultiFeed) -> Result<Vec<SummaryItem>, DigestError> {
        info!("Merging summaries into a single feed");
        let merged = self.merger.run(text_lists(&feed), self.max_items)?;
        let mut unused: Vec<SummaryItem> = feed.into_values().flatten().collect();
        let items = merged
            .into_iter()
            .filter_map(|text| {
                let pos = unused.iter().position(|item| item.text == text)?;
                Some(unused.remove(pos))
            })
            .collect();
        Ok(items)
    }
}

/// Crawl the configured sources and render the digest for today
///
/// # Errors
///
/// Any crawl, archive, collaborator or merge failure; nothing is retried.
pub async fn run_digest(config: &DigestConfig) -> Result<String, DigestError> {
    info!("Scraping news articles (may take a few minutes)");
    let session = ChromiumSession::launch(config.headless(), config.chrome_data_dir().cloned()).await?;
    let mut orchestrator = CrawlOrchestrator::new(session);
    if let Some(seed) = config.rng_seed() {
        orchestrator = orchestrator.with_seed(seed);
    }
    let feed = orchestrator.run(&policies_for(config.sources())).await?;

    let merger = match config.rng_seed() {
        Some(seed) => MergeEngine::seeded(seed),
        None => MergeEngine::new(),
    };
    let mut pipeline = DigestPipeline::new(config.max_feed_items()).with_merge_engine(merger);
    if config.archive_enabled() {
        let archive = ArchiveStore::open(config.archive_path(), config.archive_options()).await?;
        pipeline = pipeline.with_archive(archive);
    }
    if let Some(command) = config.summarizer_command() {
        pipeline = pipeline.with_summarizer(ExternalCommand::parse(command)?);
    }
    if let Some(command) = config.deduper_command() {
        pipeline = pipeline.with_deduper(ExternalCommand::parse(command)?);
    }

    let items = pipeline.process(feed).await?;
    Ok(render_digest(Local::now().date_naive(), &items))
}
