//! Browser collaborator contract
//!
//! The crawl engine never talks to Chrome directly. The orchestrator owns one
//! `BrowserSession` and lends each source manager its own `PageHandle`.

pub mod chromium;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

use crate::crawl_engine::CrawlResult;

pub use chromium::{ChromiumPage, ChromiumSession};

/// One browser process shared by all sources of a run
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: PageHandle + 'static;

    /// Allocate a fresh page (tab) for exclusive use by one source
    async fn open_page(&self) -> CrawlResult<Self::Page>;

    /// Close the browser and release its resources
    async fn close(self) -> CrawlResult<()>
    where
        Self: Sized;
}

/// A single page owned by one source manager
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Load `url` and wait for navigation to finish
    async fn navigate(&self, url: &str) -> CrawlResult<()>;

    /// Run `script` in the page; `None` when it evaluates to null/undefined
    async fn evaluate(&self, script: &str) -> CrawlResult<Option<serde_json::Value>>;

    /// Idle on this page for `duration`
    async fn wait(&self, duration: Duration);
}

/// Evaluate `script` and deserialize its result
///
/// A null result and a result of unexpected shape both come back as
/// `Ok(None)`; policies report either as a fatal outcome.
pub async fn evaluate_as<T: DeserializeOwned>(
    page: &dyn PageHandle,
    script: &str,
) -> CrawlResult<Option<T>> {
    let Some(value) = page.evaluate(script).await? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Script result had unexpected shape: {e}");
            Ok(None)
        }
    }
}
