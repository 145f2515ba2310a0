//! String helpers shared by the extraction policies

use fancy_regex::Regex;
use std::sync::LazyLock;

/// Sentence-ending punctuation (group 1) and the whitespace after it (group 2),
/// when a new sentence follows
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([.!?]["'”’)]?)(\s+)(?=["“'‘(]?[A-Z0-9])"#)
        .expect("sentence break pattern is valid")
});

/// Split `text` into sentences, trimmed, without empty pieces
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for caps in SENTENCE_BREAK.captures_iter(text).flatten() {
        let Some(gap) = caps.get(2) else { continue };
        sentences.push(&text[start..gap.start()]);
        start = gap.end();
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `text` minus its final sentence
#[must_use]
pub fn drop_last_sentence(text: &str) -> String {
    let mut sentences = split_sentences(text);
    sentences.pop();
    sentences.join(" ")
}

/// Text following the first occurrence of `marker`, if any
#[must_use]
pub fn after_marker<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.find(marker).map(|i| &text[i + marker.len()..])
}

/// Whether `text` contains any of `needles`
#[must_use]
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}
