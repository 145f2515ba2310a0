//! Type-safe builder for `DigestConfig` using the typestate pattern
//!
//! The source set is the one required field: `build()` only exists once
//! `sources()` has been called. Every other setter works in any state.

use crate::sources::NewsSource;
use crate::utils::{
    DEFAULT_ARCHIVE_EVICTION_BATCH, DEFAULT_ARCHIVE_PATH, DEFAULT_ARCHIVE_RETENTION_THRESHOLD,
    DEFAULT_MAX_FEED_ITEMS,
};
use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::DigestConfig;

// Type states for the builder
pub struct WithSources;

pub struct DigestConfigBuilder<State = ()> {
    pub(crate) sources: Vec<NewsSource>,
    pub(crate) headless: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) archive_enabled: bool,
    pub(crate) archive_path: PathBuf,
    pub(crate) archive_retention_threshold: usize,
    pub(crate) archive_eviction_batch: usize,
    pub(crate) max_feed_items: usize,
    pub(crate) rng_seed: Option<u64>,
    pub(crate) summarizer_command: Option<String>,
    pub(crate) deduper_command: Option<String>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for DigestConfigBuilder<()> {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            headless: true,
            chrome_data_dir: None,
            archive_enabled: false,
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            archive_retention_threshold: DEFAULT_ARCHIVE_RETENTION_THRESHOLD,
            archive_eviction_batch: DEFAULT_ARCHIVE_EVICTION_BATCH,
            max_feed_items: DEFAULT_MAX_FEED_ITEMS,
            rng_seed: None,
            summarizer_command: None,
            deduper_command: None,
            _phantom: PhantomData,
        }
    }
}

impl DigestConfig {
    /// Create a builder for configuring a `DigestConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> DigestConfigBuilder<()> {
        DigestConfigBuilder::default()
    }
}

impl DigestConfigBuilder<()> {
    /// Sources to crawl; duplicates are rejected by `build()`
    pub fn sources(
        self,
        sources: impl IntoIterator<Item = NewsSource>,
    ) -> DigestConfigBuilder<WithSources> {
        DigestConfigBuilder {
            sources: sources.into_iter().collect(),
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            archive_enabled: self.archive_enabled,
            archive_path: self.archive_path,
            archive_retention_threshold: self.archive_retention_threshold,
            archive_eviction_batch: self.archive_eviction_batch,
            max_feed_items: self.max_feed_items,
            rng_seed: self.rng_seed,
            summarizer_command: self.summarizer_command,
            deduper_command: self.deduper_command,
            _phantom: PhantomData,
        }
    }
}

impl DigestConfigBuilder<WithSources> {
    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// - no sources selected
    /// - a source selected twice
    /// - `max_feed_items` smaller than the number of sources
    /// - an eviction batch of zero
    pub fn build(self) -> Result<DigestConfig> {
        if self.sources.is_empty() {
            return Err(anyhow!(
                "At least one source must be enabled, otherwise there is no news to get"
            ));
        }
        for (i, source) in self.sources.iter().enumerate() {
            if self.sources[..i].contains(source) {
                return Err(anyhow!("Source '{source}' is enabled more than once"));
            }
        }
        if self.max_feed_items < self.sources.len() {
            return Err(anyhow!(
                "max_feed_items ({}) must be at least the number of sources ({})",
                self.max_feed_items,
                self.sources.len()
            ));
        }
        if self.archive_eviction_batch == 0 {
            return Err(anyhow!("archive_eviction_batch must be at least 1"));
        }

        Ok(DigestConfig {
            sources: self.sources,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            archive_enabled: self.archive_enabled,
            archive_path: self.archive_path,
            archive_retention_threshold: self.archive_retention_threshold,
            archive_eviction_batch: self.archive_eviction_batch,
            max_feed_items: self.max_feed_items,
            rng_seed: self.rng_seed,
            summarizer_command: self.summarizer_command.filter(|c| !c.trim().is_empty()),
            deduper_command: self.deduper_command.filter(|c| !c.trim().is_empty()),
        })
    }
}

// Builder methods available at any state
impl<State> DigestConfigBuilder<State> {
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }

    /// Turn archive filtering on or off
    ///
    /// # Example
    /// ```rust
    /// # use newsdigest::config::DigestConfig;
    /// # use newsdigest::sources::NewsSource;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = DigestConfig::builder()
    ///     .sources([NewsSource::Pbs])
    ///     .archive(true)
    ///     .archive_path("./state/archive.sqlite")
    ///     .build()?;
    /// assert!(config.archive_enabled());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn archive(mut self, enabled: bool) -> Self {
        self.archive_enabled = enabled;
        self
    }

    #[must_use]
    pub fn archive_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_path = path.into();
        self
    }

    /// Record count above which the oldest archive entries are evicted
    #[must_use]
    pub fn archive_retention_threshold(mut self, threshold: usize) -> Self {
        self.archive_retention_threshold = threshold;
        self
    }

    #[must_use]
    pub fn archive_eviction_batch(mut self, batch: usize) -> Self {
        self.archive_eviction_batch = batch;
        self
    }

    #[must_use]
    pub fn max_feed_items(mut self, max: usize) -> Self {
        self.max_feed_items = max;
        self
    }

    /// Make crawl delays and the final shuffle reproducible
    #[must_use]
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// External summarizer, e.g. `python3 summarizer.py`
    ///
    /// The program reads a JSON array of article texts on stdin and writes a
    /// JSON array of summaries of the same length on stdout.
    #[must_use]
    pub fn summarizer_command(mut self, command: impl Into<String>) -> Self {
        self.summarizer_command = Some(command.into());
        self
    }

    /// External semantic deduper
    ///
    /// The program reads a JSON object of source name to text list on stdin
    /// and writes the same shape back with duplicates removed.
    #[must_use]
    pub fn deduper_command(mut self, command: impl Into<String>) -> Self {
        self.deduper_command = Some(command.into());
        self
    }
}
