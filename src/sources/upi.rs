//! UPI Top News
//!
//! The top news page shows a lead next to each headline row, so most items
//! come straight from the listing. Featured stories carry no lead and are
//! followed to their own page.

use async_trait::async_trait;
use serde::Deserialize;

use super::ExtractionPolicy;
use super::js_scripts::{UPI_DETAIL_SCRIPT, UPI_LISTING_SCRIPT};
use super::text::{after_marker, contains_any};
use crate::browser::{PageHandle, evaluate_as};
use crate::crawl_engine::{CrawlDelay, CrawlResult, ExtractionOutcome, FeedItem};
use crate::utils::constants::{SLOW_DELAY_BASE_MS, SLOW_DELAY_JITTER_MS, UPI_LISTING_URL};

/// Recurring features that are not news
const SKIPPED_TITLES: [&str; 2] = ["On This Day", "News Quiz"];

/// Dateline separator on listing summaries: `Oct. 16 (UPI) -- lead`
const SUMMARY_DATELINE: &str = ") -- ";

/// Dateline separator on story pages
const STORY_DATELINE: &str = "-- ";

#[derive(Debug, Clone)]
pub struct UpiPolicy {
    listing_url: String,
    delay: CrawlDelay,
}

impl Default for UpiPolicy {
    fn default() -> Self {
        Self::new(
            UPI_LISTING_URL,
            CrawlDelay::from_millis(SLOW_DELAY_BASE_MS, SLOW_DELAY_JITTER_MS),
        )
    }
}

impl UpiPolicy {
    #[must_use]
    pub fn new(listing_url: impl Into<String>, delay: CrawlDelay) -> Self {
        Self {
            listing_url: listing_url.into(),
            delay,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpiLink {
    pub title: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpiListing {
    pub summaries: Vec<String>,
    pub rows: Vec<UpiLink>,
    pub featured: Vec<UpiLink>,
}

fn is_news(link: &UpiLink) -> bool {
    !contains_any(&link.title, &SKIPPED_TITLES)
}

/// Inline items from the headline rows plus featured links to follow
#[must_use]
pub fn interpret_listing(listing: UpiListing) -> ExtractionOutcome {
    let items = listing
        .summaries
        .iter()
        .zip(&listing.rows)
        .filter(|(_, row)| is_news(row))
        .map(|(summary, row)| {
            let lead = after_marker(summary, SUMMARY_DATELINE).unwrap_or(summary);
            FeedItem::lead(lead, row.href.clone())
        })
        .collect();
    let links = listing
        .featured
        .into_iter()
        .filter(is_news)
        .map(|link| link.href)
        .collect();
    ExtractionOutcome::Listing { links, items }
}

/// Lead of a story page, dateline removed
#[must_use]
pub fn story_lead(text: &str) -> &str {
    after_marker(text, STORY_DATELINE).unwrap_or(text)
}

#[async_trait]
impl ExtractionPolicy for UpiPolicy {
    fn name(&self) -> &str {
        "upi"
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
            return Ok(match evaluate_as::<UpiListing>(page, UPI_LISTING_SCRIPT).await? {
                Some(listing) => interpret_listing(listing),
                None => ExtractionOutcome::Fatal("top news returned no listing".to_string()),
            });
        }
        Ok(match evaluate_as::<String>(page, UPI_DETAIL_SCRIPT).await? {
            Some(text) => ExtractionOutcome::Item(FeedItem::lead(story_lead(&text), url)),
            None => ExtractionOutcome::Fatal("story has no lead paragraph".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(title: &str, href: &str) -> UpiLink {
        UpiLink {
            title: title.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn listing_yields_inline_leads_and_featured_links() {
        let listing = UpiListing {
            summaries: vec![
                "Oct. 16 (UPI) -- Storms moved east overnight.".to_string(),
                "Today's trivia.".to_string(),
                "No dateline on this one.".to_string(),
            ],
            rows: vec![
                link("Storms move east", "https://upi/storms"),
                link("News Quiz: week in review", "https://upi/quiz"),
                link("Markets", "https://upi/markets"),
            ],
            featured: vec![
                link("Feature story", "https://upi/feature"),
                link("On This Day: Oct. 16", "https://upi/otd"),
            ],
        };
        assert_eq!(
            interpret_listing(listing),
            ExtractionOutcome::Listing {
                links: vec!["https://upi/feature".to_string()],
                items: vec![
                    FeedItem::lead("Storms moved east overnight.", "https://upi/storms"),
                    FeedItem::lead("No dateline on this one.", "https://upi/markets"),
                ],
            }
        );
    }

    #[test]
    fn surplus_summaries_without_rows_are_ignored() {
        let listing = UpiListing {
            summaries: vec!["One.".to_string(), "Two.".to_string()],
            rows: vec![link("First", "https://upi/1")],
            featured: vec![],
        };
        let ExtractionOutcome::Listing { items, links } = interpret_listing(listing) else {
            panic!("expected listing outcome");
        };
        assert_eq!(items, vec![FeedItem::lead("One.", "https://upi/1")]);
        assert!(links.is_empty());
    }

    #[test]
    fn story_lead_strips_dateline() {
        assert_eq!(
            story_lead("WASHINGTON, Oct. 16 (UPI) -- The bill passed."),
            "The bill passed."
        );
        assert_eq!(story_lead("Plain lead."), "Plain lead.");
    }
}
