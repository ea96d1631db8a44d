use async_trait::async_trait;
use crate::types::StorageKey;
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Name of the backend, for logging
    fn name(&self) -> &str;

    /// Key an article is stored under
    fn key_for(&self, date: &str, id: &str) -> StorageKey;

    /// Store cleaned HTML and return a signed retrieval URL
    async fn put_article(&self, date: &str, id: &str, html: &str) -> Result<String>;
}
