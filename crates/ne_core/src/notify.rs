use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait Bookmarker: Send + Sync {
    /// Name of the bookmarking service, for logging
    fn name(&self) -> &str;

    /// Submit a URL, with an optional title, to the service
    async fn add(&self, url: &str, title: Option<&str>) -> Result<()>;
}
