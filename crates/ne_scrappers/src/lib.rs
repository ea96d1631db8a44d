pub mod cleaner;
pub mod logging;
pub mod pipeline;
pub mod scrapers;

pub use cleaner::{prettify, Cleaner};
pub use logging::{init_logging, Logger};
pub use pipeline::{FeedResult, Pipeline, RunStatus};
pub use scrapers::FeedScraper;
