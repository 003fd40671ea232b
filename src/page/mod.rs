// src/page/mod.rs
// =============================================================================
// Everything the crawler needs to know about a single page.
//
// Submodules:
// - fetch: Downloads a page under a timeout
// - links: Extracts raw hrefs from HTML
// - normalize: Turns raw hrefs into canonical same-domain URLs
//
// Each piece sits behind a small trait so the crawl core can be driven by
// in-memory fakes in tests.
// =============================================================================

mod fetch;
mod links;
pub mod normalize;

pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use links::{ExtractionError, HtmlLinkExtractor, LinkExtractor};
pub use normalize::{Normalizer, SameDomainNormalizer};
