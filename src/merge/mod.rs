//! Merge per-source feeds into one bounded, shuffled feed
//!
//! Capping trims the longest source first so short sources keep everything
//! they have. Collation then shuffles, so the digest order carries no hint of
//! which source an item came from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Capping this far would have to starve at least one source
    #[error("Max feed length {max} is smaller than the number of sources ({sources})")]
    MaxBelowSourceCount { max: usize, sources: usize },
}

/// Total item count across sources
#[must_use]
pub fn total_length<K, T>(feed: &BTreeMap<K, Vec<T>>) -> usize {
    feed.values().map(Vec::len).sum()
}

/// Pop items from the longest source until at most `max` remain in total
///
/// Ties go to the first longest source in key order. Returns the removed
/// items in removal order.
pub fn cap_length<K: Ord, T>(feed: &mut BTreeMap<K, Vec<T>>, max: usize) -> Vec<T> {
    let mut removed = Vec::new();
    while total_length(feed) > max {
        let mut longest: Option<&mut Vec<T>> = None;
        for items in feed.values_mut() {
            if longest.as_ref().is_none_or(|l| items.len() > l.len()) {
                longest = Some(items);
            }
        }
        match longest.and_then(Vec::pop) {
            Some(item) => removed.push(item),
            None => break,
        }
    }
    removed
}

/// Shuffles `items` in place with the Durstenfeld variant of Fisher-Yates
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Capping and collation with an owned random source
#[derive(Debug, Clone)]
pub struct MergeEngine<R = StdRng> {
    rng: R,
}

impl MergeEngine<StdRng> {
    /// Engine seeded from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Engine that shuffles the same way on every run
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for MergeEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> MergeEngine<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Cap `feed` to `max` items and shuffle them into one sequence
    ///
    /// The output has `min(max, total input)` items, all taken from the input.
    ///
    /// # Errors
    ///
    /// `MergeError::MaxBelowSourceCount` when `max` is smaller than the number
    /// of sources.
    pub fn run<K: Ord, T>(
        &mut self,
        mut feed: BTreeMap<K, Vec<T>>,
        max: usize,
    ) -> Result<Vec<T>, MergeError> {
        if max < feed.len() {
            return Err(MergeError::MaxBelowSourceCount {
                max,
                sources: feed.len(),
            });
        }
        let removed = cap_length(&mut feed, max);
        debug!("Capped merged feed to {max}, dropping {} items", removed.len());
        Ok(self.random_collate(feed))
    }

    /// Concatenate sources in key order, then shuffle
    pub fn random_collate<K: Ord, T>(&mut self, feed: BTreeMap<K, Vec<T>>) -> Vec<T> {
        let mut merged: Vec<T> = feed.into_values().flatten().collect();
        shuffle(&mut merged, &mut self.rng);
        merged
    }
}
