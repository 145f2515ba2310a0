//! Tests for the type-safe configuration builder pattern

use newsdigest::config::DigestConfig;
use newsdigest::sources::NewsSource;
use std::path::PathBuf;

#[test]
fn test_builder_requires_sources() {
    // This should not compile if uncommented - sources are required
    // let config = DigestConfig::builder().build();

    let config = DigestConfig::builder()
        .sources([NewsSource::Pbs, NewsSource::Upi])
        .build()
        .unwrap();

    assert_eq!(config.sources(), &[NewsSource::Pbs, NewsSource::Upi]);
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let config = DigestConfig::builder()
        .sources(NewsSource::ALL)
        .build()
        .unwrap();

    assert!(config.headless());
    assert_eq!(config.chrome_data_dir(), None);
    assert!(!config.archive_enabled());
    assert_eq!(config.archive_path(), &PathBuf::from(".archive.sqlite"));
    assert_eq!(config.archive_retention_threshold(), 1000);
    assert_eq!(config.archive_eviction_batch(), 100);
    assert_eq!(config.max_feed_items(), 15);
    assert_eq!(config.rng_seed(), None);
    assert_eq!(config.summarizer_command(), None);
    assert_eq!(config.deduper_command(), None);
}

#[test]
fn test_builder_with_all_optional_fields() {
    // Setters work before and after the source set is chosen.
    let config = DigestConfig::builder()
        .headless(false)
        .archive(true)
        .sources([NewsSource::Npr])
        .chrome_data_dir("/tmp/profile")
        .archive_path("/var/lib/newsdigest/archive.sqlite")
        .archive_retention_threshold(500)
        .archive_eviction_batch(50)
        .max_feed_items(10)
        .rng_seed(99)
        .summarizer_command("python3 summarize.py")
        .deduper_command("python3 dedupe.py")
        .build()
        .unwrap();

    assert!(!config.headless());
    assert_eq!(config.chrome_data_dir(), Some(&PathBuf::from("/tmp/profile")));
    assert!(config.archive_enabled());
    assert_eq!(
        config.archive_path(),
        &PathBuf::from("/var/lib/newsdigest/archive.sqlite")
    );
    let options = config.archive_options();
    assert_eq!(options.retention_threshold, 500);
    assert_eq!(options.eviction_batch, 50);
    assert_eq!(config.max_feed_items(), 10);
    assert_eq!(config.rng_seed(), Some(99));
    assert_eq!(config.summarizer_command(), Some("python3 summarize.py"));
    assert_eq!(config.deduper_command(), Some("python3 dedupe.py"));
}

#[test]
fn test_empty_source_set_is_rejected() {
    let err = DigestConfig::builder()
        .sources(Vec::new())
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("At least one source"));
}

#[test]
fn test_duplicate_source_is_rejected() {
    let result = DigestConfig::builder()
        .sources([NewsSource::Pbs, NewsSource::Npr, NewsSource::Pbs])
        .build();
    assert!(result.is_err());
}

#[test]
fn test_max_items_below_source_count_is_rejected() {
    let result = DigestConfig::builder()
        .sources(NewsSource::ALL)
        .max_feed_items(2)
        .build();
    assert!(result.is_err());

    let config = DigestConfig::builder()
        .sources(NewsSource::ALL)
        .max_feed_items(3)
        .build()
        .unwrap();
    assert_eq!(config.max_feed_items(), 3);
}

#[test]
fn test_zero_eviction_batch_is_rejected() {
    let result = DigestConfig::builder()
        .sources([NewsSource::Upi])
        .archive_eviction_batch(0)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_blank_collaborator_command_means_none() {
    let config = DigestConfig::builder()
        .sources([NewsSource::Upi])
        .summarizer_command("   ")
        .build()
        .unwrap();
    assert_eq!(config.summarizer_command(), None);
}
