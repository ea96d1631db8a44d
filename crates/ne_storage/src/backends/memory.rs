use async_trait::async_trait;
use ne_core::{ArticleStore, Result, StorageConfig, StorageKey};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const HTML_CONTENT_TYPE: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content_type: String,
    pub body: String,
}

/// Keeps uploaded articles in process memory. Used by `--storage memory`
/// and by the tests.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    config: StorageConfig,
    objects: Arc<RwLock<HashMap<StorageKey, StoredObject>>>,
}

impl MemoryStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &StorageKey) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<StorageKey> {
        let mut keys: Vec<_> = self.objects.read().await.keys().cloned().collect();
        keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        keys
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn key_for(&self, date: &str, id: &str) -> StorageKey {
        StorageKey::new(&self.config.prefix, date, id)
    }

    async fn put_article(&self, date: &str, id: &str, html: &str) -> Result<String> {
        let key = self.key_for(date, id);
        let url = format!("memory://{}/{}", self.config.bucket, key);
        self.objects.write().await.insert(
            key,
            StoredObject {
                content_type: HTML_CONTENT_TYPE.to_string(),
                body: html.to_string(),
            },
        );
        tracing::debug!("Stored {} in memory", url);
        Ok(url)
    }
}
