//! Plain-text rendering of the final digest

use chrono::NaiveDate;
use std::fmt::Write;

use super::SummaryItem;

/// Render `items` as the daily briefing for `date`
///
/// Summaries are numbered in feed order; the sources list repeats the
/// numbering so each URL lines up with its summary.
#[must_use]
pub fn render_digest(date: NaiveDate, items: &[SummaryItem]) -> String {
    let mut text = format!("{}\n\nGood day. Your news briefing:\n\n", date.format("%a %b %d %Y"));
    for (i, item) in items.iter().enumerate() {
        let _ = write!(text, "{}. {}\n\n", i + 1, item.text);
    }
    text.push_str("Sources:\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, item.url);
    }
    text
}
