use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::Result;

/// Date format used both as the index key and inside storage keys.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One article listed in a daily index.
///
/// The upstream index carries many more fields; only these two matter here
/// and both may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexEntry {
    pub news_id: Option<String>,
    pub title: Option<String>,
}

impl IndexEntry {
    /// Reads an entry out of a loosely typed index item. Numeric ids are
    /// kept as their decimal text; any other non-string value is absent.
    pub fn from_value(item: &Value) -> Self {
        let field = |name: &str| match item.get(name) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            news_id: field("news_id"),
            title: item.get("title").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// The identifier, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.news_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("No Title")
    }
}

/// The decoded index document: a sequence of `date -> entries` mappings.
///
/// Only the first mapping is ever read, so everything else is kept as raw
/// JSON and never has to match a shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DailyIndex(Vec<Value>);

impl DailyIndex {
    pub fn from_json(body: &str) -> Result<Self> {
        let body = body.trim_start_matches('\u{feff}');
        Ok(serde_json::from_str(body)?)
    }

    /// Entries listed for `date` in the first mapping. Empty when the
    /// document is empty or the date is not present.
    pub fn entries_for(&self, date: NaiveDate) -> Vec<IndexEntry> {
        let key = date.format(DATE_FORMAT).to_string();
        self.0
            .first()
            .and_then(|days| days.get(&key))
            .and_then(Value::as_array)
            .map(|items| items.iter().map(IndexEntry::from_value).collect())
            .unwrap_or_default()
    }
}

/// Object key of a cleaned article: `<prefix>/<date>/<id>.html`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(prefix: &str, date: &str, id: &str) -> Self {
        Self(format!("{}/{}/{}.html", prefix, date, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happened to a single index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// Uploaded and accepted by the bookmarking service.
    Bookmarked { url: String },
    /// Upload failed; no notification was sent.
    UploadFailed { reason: String },
    /// Uploaded, but the bookmarking service rejected it.
    BookmarkFailed { url: String, reason: String },
    /// Fetching or cleaning the article failed.
    FetchFailed { reason: String },
    /// The entry had no identifier.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub bookmarked: usize,
    pub upload_failed: usize,
    pub bookmark_failed: usize,
    pub fetch_failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ArticleOutcome) {
        match outcome {
            ArticleOutcome::Bookmarked { .. } => self.bookmarked += 1,
            ArticleOutcome::UploadFailed { .. } => self.upload_failed += 1,
            ArticleOutcome::BookmarkFailed { .. } => self.bookmark_failed += 1,
            ArticleOutcome::FetchFailed { .. } => self.fetch_failed += 1,
            ArticleOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.bookmarked += other.bookmarked;
        self.upload_failed += other.upload_failed;
        self.bookmark_failed += other.bookmark_failed;
        self.fetch_failed += other.fetch_failed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.bookmarked + self.upload_failed + self.bookmark_failed + self.fetch_failed + self.skipped
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} articles: {} bookmarked, {} upload failures, {} bookmark failures, {} fetch failures, {} skipped",
            self.total(),
            self.bookmarked,
            self.upload_failed,
            self.bookmark_failed,
            self.fetch_failed,
            self.skipped
        )
    }
}
