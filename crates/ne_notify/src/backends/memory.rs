use async_trait::async_trait;
use ne_core::{Bookmarker, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub url: String,
    pub title: Option<String>,
}

/// Records bookmarks instead of sending them. Backs `--dry-run`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookmarker {
    added: Arc<Mutex<Vec<Bookmark>>>,
}

impl MemoryBookmarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn bookmarks(&self) -> Vec<Bookmark> {
        self.added.lock().await.clone()
    }
}

#[async_trait]
impl Bookmarker for MemoryBookmarker {
    fn name(&self) -> &str {
        "memory"
    }

    async fn add(&self, url: &str, title: Option<&str>) -> Result<()> {
        tracing::info!("Would bookmark {} ({})", url, title.unwrap_or("No Title"));
        self.added.lock().await.push(Bookmark {
            url: url.to_string(),
            title: title.map(str::to_string),
        });
        Ok(())
    }
}
