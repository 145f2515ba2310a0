//! Getter methods for `DigestConfig`

use std::path::PathBuf;

use super::types::DigestConfig;
use crate::archive::ArchiveOptions;
use crate::sources::NewsSource;

impl DigestConfig {
    #[must_use]
    pub fn sources(&self) -> &[NewsSource] {
        &self.sources
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn archive_enabled(&self) -> bool {
        self.archive_enabled
    }

    #[must_use]
    pub fn archive_path(&self) -> &PathBuf {
        &self.archive_path
    }

    #[must_use]
    pub fn archive_retention_threshold(&self) -> usize {
        self.archive_retention_threshold
    }

    #[must_use]
    pub fn archive_eviction_batch(&self) -> usize {
        self.archive_eviction_batch
    }

    /// Retention settings in the shape the archive store takes
    #[must_use]
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            retention_threshold: self.archive_retention_threshold,
            eviction_batch: self.archive_eviction_batch,
        }
    }

    #[must_use]
    pub fn max_feed_items(&self) -> usize {
        self.max_feed_items
    }

    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    #[must_use]
    pub fn summarizer_command(&self) -> Option<&str> {
        self.summarizer_command.as_deref()
    }

    #[must_use]
    pub fn deduper_command(&self) -> Option<&str> {
        self.deduper_command.as_deref()
    }
}
