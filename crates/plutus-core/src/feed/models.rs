use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One article as listed by a news feed.
///
/// Every field is the raw string from the feed; nothing is validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub link: String,
    pub description: String,
    pub source_name: String,
    pub source_url: String,
    /// Publication date exactly as written in the feed
    pub published_date: String,
}

impl ArticleRecord {
    /// Parse the publication date (RFC 2822, then RFC 3339)
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_date.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Title without the trailing " - <source name>" that aggregators append.
    ///
    /// The suffix is only removed when the title actually ends with it.
    pub fn headline(&self) -> &str {
        let source = self.source_name.trim();
        if source.is_empty() {
            return &self.title;
        }

        self.title
            .strip_suffix(source)
            .and_then(|rest| rest.strip_suffix(" - "))
            .filter(|rest| !rest.trim().is_empty())
            .unwrap_or(self.title.as_str())
    }

    /// Description rendered from HTML to plain text
    pub fn description_text(&self, width: usize) -> String {
        html2text::from_read(self.description.as_bytes(), width)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_else(|_| self.description.clone())
    }
}

/// Sort newest first. Records whose date cannot be parsed keep their
/// relative order and go after every dated record.
pub fn sort_newest_first(records: &mut [ArticleRecord]) {
    // Reverse(None) orders after every Reverse(Some(_))
    records.sort_by_cached_key(|record| Reverse(record.published_at()));
}
