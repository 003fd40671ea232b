// src/crawl/config.rs
// =============================================================================
// Settings for one crawl.
//
// The CLI fills these in from its flags; tests build them directly with
// struct update syntax on top of `CrawlConfig::new(..)`.
// =============================================================================

use serde::{Serialize, Serializer};
use std::time::Duration;

/// Default visitation cap, same as the CLI's `--max-urls`
pub const DEFAULT_MAX_VISITED: usize = 50;
/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 2;
/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Default time workers get to acknowledge shutdown. Longer than the fetch
/// timeout so a page fetched right before the cap is reached still counts.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, Serialize)]
pub struct CrawlConfig {
    /// Where the crawl starts; a missing scheme defaults to https
    pub start_url: String,
    /// Maximum number of URLs to dequeue and process (0 = unlimited)
    pub max_visited: usize,
    /// Number of concurrent workers
    pub workers: usize,
    #[serde(serialize_with = "as_secs")]
    pub fetch_timeout: Duration,
    #[serde(serialize_with = "as_secs")]
    pub grace_period: Duration,
    /// Rewrite http:// links to https:// during normalization
    pub force_https: bool,
}

impl CrawlConfig {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_visited: DEFAULT_MAX_VISITED,
            workers: DEFAULT_WORKERS,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            grace_period: DEFAULT_GRACE_PERIOD,
            force_https: true,
        }
    }
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("example.com");
        assert_eq!(config.max_visited, 50);
        assert_eq!(config.workers, 2);
        assert!(config.grace_period > config.fetch_timeout);
        assert!(config.force_https);
    }

    #[test]
    fn test_durations_serialize_as_seconds() {
        let config = CrawlConfig {
            fetch_timeout: Duration::from_millis(1500),
            ..CrawlConfig::new("https://example.com")
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["fetch_timeout"], 1.5);
        assert_eq!(json["grace_period"], 12.0);
        assert_eq!(json["start_url"], "https://example.com");
    }
}
