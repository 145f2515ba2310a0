//! chromiumoxide implementation of the browser collaborator

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserSession, PageHandle};
use crate::browser_setup::launch_browser;
use crate::crawl_engine::{CrawlError, CrawlResult};

/// Chrome process plus the task driving its CDP connection
///
/// Dropping the session aborts the handler and removes the profile
/// directory; `Browser`'s own drop kills the Chrome process.
pub struct ChromiumSession {
    browser: Option<Browser>,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl ChromiumSession {
    /// Find or download Chrome and launch it
    ///
    /// A caller-supplied `chrome_data_dir` is left in place; the temporary
    /// profile used otherwise is removed with the session.
    pub async fn launch(headless: bool, chrome_data_dir: Option<PathBuf>) -> CrawlResult<Self> {
        let temporary_profile = chrome_data_dir.is_none();
        let (browser, handler, user_data_dir) = launch_browser(headless, chrome_data_dir).await?;
        info!("Browser session started (profile: {})", user_data_dir.display());
        Ok(Self {
            browser: Some(browser),
            handler,
            user_data_dir: temporary_profile.then_some(user_data_dir),
        })
    }

    /// Must run after the browser exited, otherwise Chrome may still hold files.
    fn cleanup_profile(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Removing browser profile: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!("Failed to remove browser profile {}: {e}", path.display());
            }
        }
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Page = ChromiumPage;

    async fn open_page(&self) -> CrawlResult<ChromiumPage> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| CrawlError::Browser("Browser session already closed".to_string()))?;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to open page: {e}")))?;
        Ok(ChromiumPage { page })
    }

    async fn close(mut self) -> CrawlResult<()> {
        if let Some(mut browser) = self.browser.take() {
            browser
                .close()
                .await
                .map_err(|e| CrawlError::Browser(format!("Failed to close browser: {e}")))?;
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }
        self.handler.abort();
        self.cleanup_profile();
        info!("Browser session closed");
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        drop(self.browser.take());
        if self.user_data_dir.is_some() {
            warn!("Browser session dropped without close(), cleaning up profile");
            self.cleanup_profile();
        }
    }
}

/// One Chrome tab
#[derive(Debug, Clone)]
pub struct ChromiumPage {
    page: Page,
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn navigate(&self, url: &str) -> CrawlResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to navigate to {url}: {e}")))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> CrawlResult<Option<serde_json::Value>> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| CrawlError::Browser(format!("Failed to evaluate script: {e}")))?;
        Ok(match result.value() {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(value.clone()),
        })
    }

    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
