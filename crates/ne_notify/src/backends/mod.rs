pub mod instapaper;
pub mod memory;

pub use instapaper::InstapaperBookmarker;
pub use memory::{Bookmark, MemoryBookmarker};
