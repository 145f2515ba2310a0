//! Test utilities shared by the newsdigest test suite
//!
//! `FakeSession` stands in for Chrome: every page serves canned script
//! results keyed by URL, and every navigation is recorded.

use async_trait::async_trait;
use newsdigest::browser::{BrowserSession, PageHandle};
use newsdigest::crawl_engine::{CrawlError, CrawlResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Script result served for each URL
pub type SiteMap = HashMap<String, Value>;

#[derive(Clone, Default)]
pub struct FakeSession {
    site: Arc<SiteMap>,
    navigations: Arc<Mutex<Vec<String>>>,
    pages_opened: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    real_waits: bool,
}

#[allow(dead_code)]
impl FakeSession {
    pub fn new(site: SiteMap) -> Self {
        Self {
            site: Arc::new(site),
            ..Self::default()
        }
    }

    /// Make `PageHandle::wait` actually sleep instead of returning at once
    pub fn with_real_waits(mut self) -> Self {
        self.real_waits = true;
        self
    }

    /// Every URL navigated to, across all pages, in order
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    /// Navigations whose URL starts with `prefix`
    pub fn navigations_under(&self, prefix: &str) -> Vec<String> {
        self.navigations()
            .into_iter()
            .filter(|url| url.starts_with(prefix))
            .collect()
    }

    pub fn pages_opened(&self) -> usize {
        self.pages_opened.load(Ordering::SeqCst)
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    async fn open_page(&self) -> CrawlResult<FakePage> {
        self.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakePage {
            site: Arc::clone(&self.site),
            navigations: Arc::clone(&self.navigations),
            current: Mutex::new(None),
            real_waits: self.real_waits,
        })
    }

    async fn close(self) -> CrawlResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    site: Arc<SiteMap>,
    navigations: Arc<Mutex<Vec<String>>>,
    current: Mutex<Option<String>>,
    real_waits: bool,
}

#[async_trait]
impl PageHandle for FakePage {
    async fn navigate(&self, url: &str) -> CrawlResult<()> {
        if url.contains("unreachable") {
            return Err(CrawlError::Browser(format!("net::ERR_NAME_NOT_RESOLVED at {url}")));
        }
        self.navigations.lock().unwrap().push(url.to_string());
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> CrawlResult<Option<Value>> {
        let current = self.current.lock().unwrap().clone();
        Ok(current
            .and_then(|url| self.site.get(&url).cloned())
            .filter(|value| !value.is_null()))
    }

    async fn wait(&self, duration: Duration) {
        if self.real_waits {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Build a `SiteMap` from `(url, json)` pairs
#[allow(dead_code)]
pub fn site(entries: impl IntoIterator<Item = (&'static str, Value)>) -> SiteMap {
    entries
        .into_iter()
        .map(|(url, value)| (url.to_string(), value))
        .collect()
}
