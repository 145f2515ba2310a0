//! PBS NewsHour
//!
//! The timeline lists roughly ten recent posts. A post is either a broadcast
//! transcript, whose first paragraph is a usable lead, or a written article.
//! Wire-style articles open with `LOCATION (AP) — lead`; everything else is
//! sent on for summarizing in full.

use async_trait::async_trait;
use serde::Deserialize;

use super::ExtractionPolicy;
use super::js_scripts::{PBS_DETAIL_SCRIPT, PBS_LISTING_SCRIPT};
use super::text::{after_marker, contains_any, drop_last_sentence};
use crate::browser::{PageHandle, evaluate_as};
use crate::crawl_engine::{CrawlDelay, CrawlResult, ExtractionOutcome, FeedItem};
use crate::utils::constants::{PBS_DELAY_BASE_MS, PBS_DELAY_JITTER_MS, PBS_LISTING_URL};

/// Interviews, book talk and mini-docs rather than news
const OFF_TOPIC_MARKERS: [&str; 4] = ["new book", "new report", "special report", "series"];

/// Paragraphs that are navigation, not article text
const BOILERPLATE_PREFIXES: [&str; 2] = ["READ MORE", "Watch"];

#[derive(Debug, Clone)]
pub struct PbsPolicy {
    listing_url: String,
    delay: CrawlDelay,
}

impl Default for PbsPolicy {
    fn default() -> Self {
        Self::new(
            PBS_LISTING_URL,
            CrawlDelay::from_millis(PBS_DELAY_BASE_MS, PBS_DELAY_JITTER_MS),
        )
    }
}

impl PbsPolicy {
    #[must_use]
    pub fn new(listing_url: impl Into<String>, delay: CrawlDelay) -> Self {
        Self {
            listing_url: listing_url.into(),
            delay,
        }
    }
}

/// Raw shape returned by `PBS_DETAIL_SCRIPT`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PbsPage {
    Transcript {
        text: Option<String>,
        title: Option<String>,
    },
    Article {
        paragraphs: Vec<String>,
    },
}

/// Turn a scraped PBS post into an outcome
#[must_use]
pub fn interpret_post(page: PbsPage, url: &str) -> ExtractionOutcome {
    match page {
        PbsPage::Transcript { text, title } => {
            let Some(text) = text else {
                return ExtractionOutcome::Fatal("transcript has no lead paragraph".to_string());
            };
            if contains_any(&text, &OFF_TOPIC_MARKERS) {
                return ExtractionOutcome::Cancelled;
            }
            let Some(title) = title else {
                return ExtractionOutcome::Fatal("transcript page has no <title>".to_string());
            };
            // News Wrap leads read "In our news wrap Monday, ..."; other
            // transcripts end with a sentence introducing the segment.
            let lead = if title.starts_with("News Wrap") {
                text.replace("In our news wrap", "This")
            } else {
                drop_last_sentence(&text)
            };
            if lead.trim().is_empty() {
                return ExtractionOutcome::Cancelled;
            }
            ExtractionOutcome::Item(FeedItem::lead(lead, url))
        }
        PbsPage::Article { paragraphs } => {
            let Some(first) = paragraphs.first() else {
                return ExtractionOutcome::Fatal("article has no body paragraphs".to_string());
            };
            if let Some(lead) = after_marker(first, "—") {
                return ExtractionOutcome::Item(FeedItem::lead(lead.trim_start(), url));
            }
            let body = paragraphs
                .iter()
                .filter(|p| !BOILERPLATE_PREFIXES.iter().any(|b| p.starts_with(b)))
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            ExtractionOutcome::Item(FeedItem::article(body, url))
        }
    }
}

#[async_trait]
impl ExtractionPolicy for PbsPolicy {
    fn name(&self) -> &str {
        "pbs"
    }

    fn listing_url(&self) -> &str {
        &self.listing_url
    }

    fn crawl_delay(&self) -> CrawlDelay {
        self.delay
    }

    async fn extract(
        &self,
        page: &dyn PageHandle,
        url: &str,
        is_listing: bool,
    ) -> CrawlResult<ExtractionOutcome> {
        if is_listing {
            return Ok(match evaluate_as::<Vec<String>>(page, PBS_LISTING_SCRIPT).await? {
                Some(links) => ExtractionOutcome::FollowupLinks(links),
                None => ExtractionOutcome::Fatal("timeline returned no link list".to_string()),
            });
        }
        Ok(match evaluate_as::<PbsPage>(page, PBS_DETAIL_SCRIPT).await? {
            Some(post) => interpret_post(post, url),
            None => ExtractionOutcome::Fatal("post script returned null".to_string()),
        })
    }
}
