use std::sync::Arc;

use chrono::NaiveDate;
use ne_core::types::DATE_FORMAT;
use ne_core::{ArticleOutcome, ArticleStore, Bookmarker, IndexEntry, Result, RunSummary};
use reqwest::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cleaner::Cleaner;
use crate::logging::Logger;
use crate::scrapers::{utils, FeedScraper};

/// Result of processing one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResult {
    /// The index had nothing for the run date.
    NoNews,
    Processed(RunSummary),
}

/// Result of a whole run over the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// A feed had no news for the run date; the run stopped there.
    NoNews,
    /// Every line of input was processed.
    Completed { feeds: usize, summary: RunSummary },
}

/// Fetch → clean → upload → bookmark, one article at a time.
pub struct Pipeline {
    scraper: FeedScraper,
    cleaner: Cleaner,
    store: Arc<dyn ArticleStore>,
    bookmarker: Arc<dyn Bookmarker>,
    date: NaiveDate,
}

impl Pipeline {
    pub fn new(
        client: Client,
        store: Arc<dyn ArticleStore>,
        bookmarker: Arc<dyn Bookmarker>,
        date: NaiveDate,
    ) -> Result<Self> {
        Ok(Self {
            scraper: FeedScraper::new(client),
            cleaner: Cleaner::news_easy()?,
            store,
            bookmarker,
            date,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Processes one feed URL per line until the input ends or a feed has
    /// no news for the run date.
    pub async fn run<R>(&self, reader: R) -> Result<RunStatus>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut feeds = 0;
        let mut summary = RunSummary::default();

        while let Some(line) = lines.next_line().await? {
            let feed_url = line.trim();
            if feed_url.is_empty() {
                continue;
            }

            match self.process_feed(feed_url).await? {
                FeedResult::NoNews => {
                    tracing::info!("No news for today.");
                    return Ok(RunStatus::NoNews);
                }
                FeedResult::Processed(feed_summary) => {
                    feeds += 1;
                    summary.merge(&feed_summary);
                }
            }
        }

        Ok(RunStatus::Completed { feeds, summary })
    }

    /// Fetches the index behind `feed_url` and processes today's entries.
    /// Index errors are returned; article errors are recorded in the summary.
    pub async fn process_feed(&self, feed_url: &str) -> Result<FeedResult> {
        let parsed = utils::parse_url(feed_url)?;
        let logger = Logger::new().with_prefix(format!("[{}]", parsed.host_str().unwrap_or("feed")));

        logger.debug(&format!("Fetching index {}", feed_url));
        let index = self.scraper.fetch_index(feed_url).await?;
        let entries = index.entries_for(self.date);
        if entries.is_empty() {
            return Ok(FeedResult::NoNews);
        }

        logger.info(&format!("{} entries for {}", entries.len(), self.date_key()));
        let mut summary = RunSummary::default();
        for (i, entry) in entries.iter().enumerate() {
            let outcome = self
                .process_entry(feed_url, entry, &logger.clone().with_prefix(format!("#{}", i)))
                .await;
            summary.record(&outcome);
        }

        logger.info(&summary.to_string());
        Ok(FeedResult::Processed(summary))
    }

    /// Runs one index entry through the pipeline. Never fails: every error
    /// is turned into an [`ArticleOutcome`].
    pub async fn process_entry(&self, feed_url: &str, entry: &IndexEntry, logger: &Logger) -> ArticleOutcome {
        let Some(id) = entry.id() else {
            logger.debug("Entry has no news_id, skipping");
            return ArticleOutcome::Skipped;
        };

        logger.info(entry.display_title());
        let content_url = utils::content_url(feed_url, id);
        logger.info(&format!("=> {}", content_url));

        let html = match self.scraper.fetch_article(&content_url).await {
            Ok(raw) => self.cleaner.clean(&raw),
            Err(e) => {
                logger.error(&format!("Failed to fetch {}: {}", content_url, e));
                return ArticleOutcome::FetchFailed { reason: e.to_string() };
            }
        };

        let url = match self.store.put_article(&self.date_key(), id, &html).await {
            Ok(url) => url,
            Err(e) => {
                logger.error(&format!("{} upload failed: {}", self.store.name(), e));
                return ArticleOutcome::UploadFailed { reason: e.to_string() };
            }
        };
        logger.info(&format!("Saved at {}", url));

        match self.bookmarker.add(&url, entry.title.as_deref()).await {
            Ok(()) => {
                logger.debug(&format!("Pushed to {}", self.bookmarker.name()));
                ArticleOutcome::Bookmarked { url }
            }
            Err(e) => {
                logger.warn(&e.to_string());
                ArticleOutcome::BookmarkFailed { url, reason: e.to_string() }
            }
        }
    }

    fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
