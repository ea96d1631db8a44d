use std::sync::Arc;

use ne_core::{Bookmarker, InstapaperConfig};
use reqwest::Client;

pub mod backends;

pub use backends::*;

/// Instapaper client, or a recorder when `dry_run` is set.
pub fn create_bookmarker(dry_run: bool, client: Client, config: &InstapaperConfig) -> Arc<dyn Bookmarker> {
    if dry_run {
        Arc::new(MemoryBookmarker::new())
    } else {
        Arc::new(InstapaperBookmarker::new(client, config))
    }
}
