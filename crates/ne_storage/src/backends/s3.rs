use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use ne_core::{ArticleStore, Error, Result, StorageConfig, StorageKey};

use super::memory::HTML_CONTENT_TYPE;

/// Longest lifetime SigV4 allows for a presigned URL.
pub const MAX_PRESIGN_EXPIRY: Duration = Duration::from_secs(7 * 24 * 3600);

pub struct S3Store {
    client: Client,
    config: StorageConfig,
}

impl S3Store {
    /// Uses the standard AWS credential and region chain.
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Ok(Self::with_client(Client::new(&sdk_config), config))
    }

    pub fn with_client(client: Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    fn presign_expiry(&self) -> Duration {
        clamp_expiry(self.config.expiry)
    }
}

pub(crate) fn clamp_expiry(requested: Duration) -> Duration {
    if requested > MAX_PRESIGN_EXPIRY {
        tracing::warn!(
            "Requested URL expiry of {}h exceeds the presigning limit, using {}h",
            requested.as_secs() / 3600,
            MAX_PRESIGN_EXPIRY.as_secs() / 3600
        );
        MAX_PRESIGN_EXPIRY
    } else {
        requested
    }
}

#[async_trait]
impl ArticleStore for S3Store {
    fn name(&self) -> &str {
        "S3"
    }

    fn key_for(&self, date: &str, id: &str) -> StorageKey {
        StorageKey::new(&self.config.prefix, date, id)
    }

    async fn put_article(&self, date: &str, id: &str, html: &str) -> Result<String> {
        let key = self.key_for(date, id);

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key.as_str())
            .content_type(HTML_CONTENT_TYPE)
            .body(ByteStream::from(html.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| Error::Storage(format!("S3 upload of {} failed: {}", key, DisplayErrorContext(&e))))?;

        let presigning = PresigningConfig::expires_in(self.presign_expiry())
            .map_err(|e| Error::Storage(format!("Invalid presigning config: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key.as_str())
            .presigned(presigning)
            .await
            .map_err(|e| Error::Storage(format!("Presigning {} failed: {}", key, DisplayErrorContext(&e))))?;

        tracing::debug!("Stored s3://{}/{}", self.config.bucket, key);
        Ok(request.uri().to_string())
    }
}
