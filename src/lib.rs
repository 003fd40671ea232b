// src/lib.rs
// =============================================================================
// link-harvest collects every internal link of a website.
//
// Modules:
// - crawl: the concurrent breadth-first crawler (frontier, workers, coordinator)
// - page: fetching pages, extracting links, normalizing URLs
// - output: link files and crawl reports
//
// The binary in src/main.rs wires these to the command line.
// =============================================================================

pub mod crawl;
pub mod output;
pub mod page;

pub use crawl::{crawl, CrawlConfig, CrawlError, CrawlOutcome};
