// src/crawl/error.rs
// =============================================================================
// Errors that end a crawl.
//
// Per-URL problems (fetch failures, unparseable pages) never show up here:
// workers log them and move on. Only two things stop a crawl with an error:
// - a bad configuration, caught before any worker starts
// - a worker task dying unexpectedly, which leaves the frontier in an
//   unknown state
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Invalid start URL or crawl settings; no crawl was started
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A worker panicked or was torn down mid-crawl
    #[error("worker fault: {0}")]
    WorkerFault(String),
}
