use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ne_core::{ArticleStore, Result, StorageConfig};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    S3,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "s3" => Ok(Self::S3),
            other => Err(format!("Unknown storage backend: {} (expected memory or s3)", other)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::S3 => f.write_str("s3"),
        }
    }
}

/// Builds the store selected on the command line.
pub async fn create_store(kind: StorageKind, config: StorageConfig) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new(config))),
        #[cfg(feature = "s3")]
        StorageKind::S3 => Ok(Arc::new(S3Store::new(config).await?)),
        #[cfg(not(feature = "s3"))]
        StorageKind::S3 => Err(ne_core::Error::Config(
            "S3 storage requested but ne_storage was built without the `s3` feature".to_string(),
        )),
    }
}
