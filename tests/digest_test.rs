//! Tests for the post-crawl digest pipeline with in-process collaborators

use async_trait::async_trait;
use newsdigest::archive::{ArchiveOptions, ArchiveStore};
use newsdigest::crawl_engine::{FeedItem, MultiSourceFeed};
use newsdigest::digest::{
    Deduper, DigestError, DigestPipeline, Summarizer, SummaryItem, TextMultiFeed,
};
use newsdigest::merge::{MergeEngine, MergeError};
use tempfile::TempDir;

/// Summary is the article's first word followed by "summary"
struct FirstWord;

#[async_trait]
impl Summarizer for FirstWord {
    async fn summarize(&self, articles: Vec<String>) -> Result<Vec<String>, DigestError> {
        Ok(articles
            .iter()
            .map(|a| format!("{} summary", a.split_whitespace().next().unwrap_or_default()))
            .collect())
    }
}

/// Drops one summary too many
struct ShortChanged;

#[async_trait]
impl Summarizer for ShortChanged {
    async fn summarize(&self, mut articles: Vec<String>) -> Result<Vec<String>, DigestError> {
        articles.pop();
        Ok(articles)
    }
}

/// Removes a fixed text wherever it appears outside `keep_in`
struct DropRepeat {
    text: &'static str,
    keep_in: &'static str,
}

#[async_trait]
impl Deduper for DropRepeat {
    async fn dedupe(&self, mut feed: TextMultiFeed) -> Result<TextMultiFeed, DigestError> {
        for (source, texts) in &mut feed {
            if source != self.keep_in {
                texts.retain(|t| t != self.text);
            }
        }
        Ok(feed)
    }
}

fn sample_feed() -> MultiSourceFeed {
    MultiSourceFeed::from([
        (
            "npr".to_string(),
            vec![
                FeedItem::article("Floods swept the valley overnight.", "https://npr.test/floods"),
                FeedItem::article("Markets closed higher on Friday.", "https://npr.test/markets"),
            ],
        ),
        (
            "upi".to_string(),
            vec![
                FeedItem::lead("Markets summary", "https://upi.test/markets"),
                FeedItem::lead("A museum reopened.", "https://upi.test/museum"),
            ],
        ),
    ])
}

fn by_url(mut items: Vec<SummaryItem>) -> Vec<SummaryItem> {
    items.sort_by(|a, b| a.url.cmp(&b.url));
    items
}

#[tokio::test]
async fn test_passthrough_pipeline_keeps_every_item() {
    let mut pipeline = DigestPipeline::new(15).with_merge_engine(MergeEngine::seeded(5));

    let items = pipeline.process(sample_feed()).await.unwrap();

    assert_eq!(items.len(), 4);
    let urls: Vec<String> = by_url(items).into_iter().map(|i| i.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://npr.test/floods",
            "https://npr.test/markets",
            "https://upi.test/markets",
            "https://upi.test/museum",
        ]
    );
}

#[tokio::test]
async fn test_only_full_articles_are_summarized() {
    let mut pipeline = DigestPipeline::new(15)
        .with_summarizer(FirstWord)
        .with_merge_engine(MergeEngine::seeded(5));

    let items = by_url(pipeline.process(sample_feed()).await.unwrap());

    let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Floods summary", "Markets summary", "Markets summary", "A museum reopened."]
    );
}

#[tokio::test]
async fn test_deduped_items_are_dropped_and_urls_follow_source_order() {
    let mut pipeline = DigestPipeline::new(15)
        .with_summarizer(FirstWord)
        .with_deduper(DropRepeat {
            text: "Markets summary",
            keep_in: "upi",
        })
        .with_merge_engine(MergeEngine::seeded(5));

    let items = by_url(pipeline.process(sample_feed()).await.unwrap());

    assert_eq!(
        items,
        vec![
            SummaryItem {
                text: "Floods summary".to_string(),
                url: "https://npr.test/floods".to_string(),
            },
            SummaryItem {
                text: "Markets summary".to_string(),
                url: "https://upi.test/markets".to_string(),
            },
            SummaryItem {
                text: "A museum reopened.".to_string(),
                url: "https://upi.test/museum".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_summarizer_length_mismatch_is_an_error() {
    let mut pipeline = DigestPipeline::new(15).with_summarizer(ShortChanged);

    let err = pipeline.process(sample_feed()).await.unwrap_err();

    assert!(matches!(err, DigestError::Collaborator(_)));
}

#[tokio::test]
async fn test_merge_caps_the_digest() {
    let mut pipeline = DigestPipeline::new(2).with_merge_engine(MergeEngine::seeded(5));

    let items = pipeline.process(sample_feed()).await.unwrap();

    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_max_below_source_count_surfaces_merge_error() {
    let mut pipeline = DigestPipeline::new(1);

    let err = pipeline.process(sample_feed()).await.unwrap_err();

    assert!(matches!(
        err,
        DigestError::Merge(MergeError::MaxBelowSourceCount { max: 1, sources: 2 })
    ));
}

#[tokio::test]
async fn test_archive_filters_urls_seen_in_earlier_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("archive.sqlite");

    let archive = ArchiveStore::open(&path, ArchiveOptions::default()).await.unwrap();
    archive
        .run(vec!["https://npr.test/floods".to_string()])
        .await
        .unwrap();

    let mut pipeline = DigestPipeline::new(15)
        .with_archive(archive.clone())
        .with_merge_engine(MergeEngine::seeded(5));
    let items = pipeline.process(sample_feed()).await.unwrap();

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.url != "https://npr.test/floods"));
    // Everything that made it through is now archived too.
    assert!(archive.contains("https://upi.test/museum").await.unwrap());

    let again = pipeline.process(sample_feed()).await.unwrap();
    assert!(again.is_empty());
}
