use clap::Parser;
use chrono::{Local, NaiveDate};
use ne_core::{Config, Result};
use ne_scrappers::{init_logging, Pipeline, RunStatus};
use ne_storage::StorageKind;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{info, Level};

/// Reads feed URLs from stdin, one per line, and sends each of today's
/// articles, cleaned, to storage and then to Instapaper.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Where cleaned articles are uploaded: s3 or memory
    #[arg(long, default_value = "s3")]
    storage: StorageKind,
    /// Process the index for this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Record bookmarks instead of sending them to Instapaper
    #[arg(long)]
    dry_run: bool,
    /// Timeout for every HTTP request (e.g. 30s, 2m, 1h 15m). No timeout by default
    #[arg(long)]
    timeout: Option<humantime::Duration>,
    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env();
    let client = build_client(cli.timeout.map(Duration::from))?;

    let store = ne_storage::create_store(cli.storage, config.storage.clone()).await?;
    info!("💾 Storing articles in {} (bucket {}, prefix {})", store.name(), config.storage.bucket, config.storage.prefix);

    let bookmarker = ne_notify::create_bookmarker(cli.dry_run, client.clone(), &config.instapaper);
    info!("🔖 Bookmarking with {}", bookmarker.name());

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let pipeline = Pipeline::new(client, store, bookmarker, date)?;
    info!("📰 Looking for news of {}", pipeline.date());

    let stdin = BufReader::new(tokio::io::stdin());
    match pipeline.run(stdin).await? {
        RunStatus::NoNews => {}
        RunStatus::Completed { feeds, summary } => {
            info!("✅ Processed {} feeds, {}", feeds, summary);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });

    tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => std::process::exit(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeout_of(arg: &str) -> Option<Duration> {
        Cli::try_parse_from(["ne", "--timeout", arg]).unwrap().timeout.map(Duration::from)
    }

    #[test]
    fn test_timeout_durations() {
        assert_eq!(timeout_of("30s"), Some(Duration::from_secs(30)));
        assert_eq!(timeout_of("2m"), Some(Duration::from_secs(120)));
        assert_eq!(timeout_of("1h 15m"), Some(Duration::from_secs(4500)));
        assert!(Cli::try_parse_from(["ne", "--timeout", ""]).is_err());
        assert!(Cli::try_parse_from(["ne", "--timeout", "5x"]).is_err());
    }

    #[test]
    fn test_oversized_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["ne", "--timeout", "5124095576030432h"]).is_err());
        assert!(Cli::try_parse_from(["ne", "--timeout", "99999999999999999999s"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["ne"]).unwrap();
        assert_eq!(cli.storage, StorageKind::S3);
        assert!(cli.date.is_none());
        assert!(!cli.dry_run);
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "ne", "--storage", "memory", "--date", "2024-01-02", "--dry-run", "--timeout", "10s",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageKind::Memory);
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert!(cli.dry_run);
        assert_eq!(cli.timeout.map(Duration::from), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["ne", "--date", "02/01/2024"]).is_err());
    }

    #[test]
    fn test_build_client_with_timeout() {
        assert!(build_client(Some(Duration::from_secs(5))).is_ok());
        assert!(build_client(None).is_ok());
    }
}
