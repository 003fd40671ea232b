// src/page/links.rs
// =============================================================================
// This module pulls raw link targets out of fetched HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, tolerating the broken markup found in the wild
// - Supports CSS selectors for finding elements
//
// The extractor returns hrefs exactly as written in the page (relative or
// absolute). Turning them into crawlable URLs is the normalizer's job.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use thiserror::Error;

/// Content that could not be treated as a page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The body contains NUL bytes, i.e. it is binary data served as text
    #[error("content looks like binary data")]
    Binary,
}

/// Parses fetched content into the set of raw href strings it links to.
pub trait LinkExtractor: Send + Sync {
    fn extract(&self, content: &str) -> Result<HashSet<String>, ExtractionError>;
}

/// Extracts the `href` of every `<a>` element.
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    anchors: Selector,
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        // "a[href]" is a constant, known-valid selector
        let anchors = Selector::parse("a[href]").unwrap();
        Self { anchors }
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, content: &str) -> Result<HashSet<String>, ExtractionError> {
        if content.contains('\0') {
            return Err(ExtractionError::Binary);
        }

        let document = Html::parse_document(content);
        let hrefs = document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(String::from)
            .collect();

        Ok(hrefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> HashSet<String> {
        HtmlLinkExtractor::default().extract(html).unwrap()
    }

    #[test]
    fn test_extracts_raw_hrefs() {
        let html = r#"
            <a href="https://www.rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract(html);
        assert_eq!(links.len(), 3);
        assert!(links.contains("/docs"));
        assert!(links.contains("../about"));
    }

    #[test]
    fn test_duplicate_hrefs_collapse() {
        let links = extract(r#"<a href="/a">A</a><p><a href="/a">again</a></p>"#);
        assert_eq!(links, HashSet::from(["/a".to_string()]));
    }

    #[test]
    fn test_anchors_without_href_are_ignored() {
        let links = extract(r#"<a name="top">Top</a><a href="  ">blank</a><link href="/style.css">"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_malformed_markup_still_yields_links() {
        let links = extract(r#"<div><a href="/x">unclosed <span><a href='/y'>"#);
        assert!(links.contains("/x"));
        assert!(links.contains("/y"));
    }

    #[test]
    fn test_binary_content_is_rejected() {
        let result = HtmlLinkExtractor::default().extract("PK\0\u{3}\u{4}");
        assert_eq!(result, Err(ExtractionError::Binary));
    }
}
