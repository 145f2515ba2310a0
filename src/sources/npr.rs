//! NPR News
//!
//! The news section links to full stories, which go to the summarizer whole.
//! Stories filed under a series or book review slug are skipped at listing
//! time.

use async_trait::async_trait;
use serde::Deserialize;

use super::ExtractionPolicy;
use super::js_scripts::{NPR_DETAIL_SCRIPT, NPR_LISTING_SCRIPT};
use crate::browser::{PageHandle, evaluate_as};
use crate::crawl_engine::{CrawlDelay, CrawlResult, ExtractionOutcome, FeedItem};
use crate::utils::constants::{NPR_LISTING_URL, SLOW_DELAY_BASE_MS, SLOW_DELAY_JITTER_MS};

const SKIPPED_SECTIONS: [&str; 2] = ["/series/", "/book-reviews/"];

#[derive(Debug, Clone)]
pub struct NprPolicy {
    listing_url: String,
    delay: CrawlDelay,
}

impl Default for NprPolicy {
    fn default() -> Self {
        Self::new(
            NPR_LISTING_URL,
            CrawlDelay::from_millis(SLOW_DELAY_BASE_MS, SLOW_DELAY_JITTER_MS),
        )
    }
}

impl NprPolicy {
    #[must_use]
    pub fn new(listing_url: impl Into<String>, delay: CrawlDelay) -> Self {
        Self {
            listing_url: listing_url.into(),
            delay,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NprListing {
    pub articles: Vec<String>,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NprStory {
    pub paragraphs: Vec<String>,
    pub headers: Vec<String>,
}

/// Article links whose index-aligned section slug is not skipped
#[must_use]
pub fn newsworthy_links(listing: NprListing) -> Vec<String> {
    listing
        .articles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| {
            listing
                .sections
                .get(*i)
                .is_none_or(|section| !SKIPPED_SECTIONS.iter().any(|s| section.contains(s)))
        })
        .map(|(_, href)| href)
        .collect()
}

/// Story body with the editor's note and inline headers removed
#[must_use]
pub fn story_body(story: &NprStory) -> Option<String> {
    if story.paragraphs.is_empty() {
        return None;
    }
    let skip = usize::from(story.paragraphs[0].starts_with("Editor's note"));
    let body = story.paragraphs[skip..]
        .iter()
        .filter(|p| !story.headers.contains(p))
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    Some(body)
}

#[async_trait]
impl ExtractionPolicy for NprPolicy {
    fn name(&self) -> &str {
        "npr"
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
            return Ok(match evaluate_as::<NprListing>(page, NPR_LISTING_SCRIPT).await? {
                Some(listing) => ExtractionOutcome::FollowupLinks(newsworthy_links(listing)),
                None => ExtractionOutcome::Fatal("news section returned no listing".to_string()),
            });
        }
        let story = evaluate_as::<NprStory>(page, NPR_DETAIL_SCRIPT).await?;
        Ok(match story.as_ref().and_then(story_body) {
            Some(body) => ExtractionOutcome::Item(FeedItem::article(body, url)),
            None => ExtractionOutcome::Fatal("story has no body paragraphs".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn series_and_book_reviews_are_skipped() {
        let listing = NprListing {
            articles: strings(&["https://n/a", "https://n/b", "https://n/c", "https://n/d"]),
            sections: strings(&[
                "https://www.npr.org/sections/politics/",
                "https://www.npr.org/series/1234/dispatches/",
                "https://www.npr.org/sections/book-reviews/",
            ]),
        };
        assert_eq!(
            newsworthy_links(listing),
            strings(&["https://n/a", "https://n/d"])
        );
    }

    #[test]
    fn story_body_drops_editors_note_and_headers() {
        let story = NprStory {
            paragraphs: strings(&[
                "Editor's note: this story contains graphic language.",
                "The court ruled on Friday.",
                "What happens next",
                "An appeal is expected.",
            ]),
            headers: strings(&["What happens next"]),
        };
        assert_eq!(
            story_body(&story).as_deref(),
            Some("The court ruled on Friday. An appeal is expected.")
        );
    }

    #[test]
    fn empty_story_has_no_body() {
        assert_eq!(story_body(&NprStory::default()), None);
    }
}
