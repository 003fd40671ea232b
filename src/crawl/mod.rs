// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a start URL over one shared frontier
// - A fixed-size pool of concurrent workers
// - Same-domain restriction (never leaves the start host)
// - Optional visitation cap
// - Graceful shutdown once the frontier runs dry, the cap is reached, or the
//   caller asks to stop
//
// Submodules:
// - frontier: the shared queue + seen set
// - worker: the per-task fetch/extract/enqueue loop
// - coordinator: lifecycle, termination detection, shutdown
// =============================================================================

mod config;
mod coordinator;
mod error;
mod frontier;
mod shutdown;
mod worker;

pub use config::CrawlConfig;
pub use coordinator::{Coordinator, CrawlOutcome, CrawlPhase, CrawlStats, StopReason};
pub use error::CrawlError;
pub use frontier::{Frontier, FrontierStats, Take};
pub use shutdown::ShutdownHandle;
pub use worker::Collaborators;

use crate::page::{HtmlLinkExtractor, HttpFetcher, SameDomainNormalizer};
use std::collections::BTreeSet;
use std::sync::Arc;

impl Collaborators {
    /// The real thing: reqwest fetcher, scraper extractor, same-domain rules.
    pub fn http(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::new()
            .map_err(|e| CrawlError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            extractor: Arc::new(HtmlLinkExtractor::default()),
            normalizer: Arc::new(SameDomainNormalizer::new(config.force_https)),
        })
    }
}

// Crawls a website and returns every internal URL that was fetched
//
// Parameters:
//   start_url: where to start (a missing scheme defaults to https)
//   max_visited: how many URLs to process at most (0 = no limit)
//   workers: how many pages to fetch concurrently
//
// Returns: the visited set, or a configuration error if `start_url` is unusable
pub async fn crawl(
    start_url: &str,
    max_visited: usize,
    workers: usize,
) -> Result<BTreeSet<String>, CrawlError> {
    let config = CrawlConfig {
        max_visited,
        workers,
        ..CrawlConfig::new(start_url)
    };
    let collaborators = Collaborators::http(&config)?;
    let outcome = Coordinator::new(config, collaborators).run().await?;
    Ok(outcome.visited)
}
