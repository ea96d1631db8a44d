use ne_core::{DailyIndex, Error, Result};
use reqwest::Client;
use url::Url;

/// Fetches the daily index and the article pages it points to.
#[derive(Debug, Clone)]
pub struct FeedScraper {
    client: Client,
}

impl FeedScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Downloads and decodes the index published at `feed_url`.
    pub async fn fetch_index(&self, feed_url: &str) -> Result<DailyIndex> {
        let response = self.client.get(feed_url).send().await?.error_for_status()?;
        let body = response.text().await?;
        DailyIndex::from_json(&body)
    }

    /// Downloads an article page. The body is always decoded as UTF-8,
    /// whatever charset the server announces.
    pub async fn fetch_article(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Common utilities for scrapers
pub mod utils {
    use super::*;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Content URL of article `id`: the feed URL without its last path
    /// segment, followed by `<id>/<id>.html`.
    pub fn content_url(base_url: &str, id: &str) -> String {
        let dir = base_url.rsplit_once('/').map_or(base_url, |(dir, _)| dir);
        format!("{}/{}/{}.html", dir, id, id)
    }
}
