//! Runtime configuration.
//!
//! Everything the pipeline needs from the environment is read once into
//! [`Config`] and handed to the components that need it.
use std::env;
use std::time::Duration;

use secrecy::SecretString;

pub const DEFAULT_BUCKET: &str = "sample-bucket";
pub const DEFAULT_PREFIX: &str = "sample-prefix";
pub const DEFAULT_USERNAME: &str = "user";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_INSTAPAPER_URL: &str = "https://www.instapaper.com";

/// Lifetime requested for signed retrieval URLs (732 hours).
pub const DEFAULT_URL_EXPIRY: Duration = Duration::from_secs(3600 * 732);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub bucket: String,
    pub prefix: String,
    pub expiry: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            expiry: DEFAULT_URL_EXPIRY,
        }
    }
}

#[derive(Debug)]
pub struct InstapaperConfig {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
}

impl Default for InstapaperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_INSTAPAPER_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD.to_string()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Config {
    pub storage: StorageConfig,
    pub instapaper: InstapaperConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup, falling
    /// back to the defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Self {
            storage: StorageConfig {
                bucket: var("BUCKET_NAME", DEFAULT_BUCKET),
                prefix: var("BUCKET_PREFIX", DEFAULT_PREFIX),
                expiry: DEFAULT_URL_EXPIRY,
            },
            instapaper: InstapaperConfig {
                base_url: var("INSTAPAPER_URL", DEFAULT_INSTAPAPER_URL),
                username: var("INSTAPAPER_USERNAME", DEFAULT_USERNAME),
                password: SecretString::from(var("INSTAPAPER_PASSWORD", DEFAULT_PASSWORD)),
            },
        }
    }
}
