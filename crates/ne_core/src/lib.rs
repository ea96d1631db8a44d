pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod types;

pub use config::{Config, InstapaperConfig, StorageConfig};
pub use error::{Error, Result};
pub use notify::Bookmarker;
pub use storage::ArticleStore;
pub use types::{ArticleOutcome, DailyIndex, IndexEntry, RunSummary, StorageKey};
