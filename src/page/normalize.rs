// src/page/normalize.rs
// =============================================================================
// This module turns raw href values into canonical crawl URLs.
//
// A discovered href goes through these steps:
// 1. Reject disallowed schemes up front (javascript:, mailto:)
// 2. Resolve it against the page it was found on
// 3. Keep only scheme://host[:port]/path (query and fragment are dropped)
// 4. Upgrade http to https (unless the crawl keeps schemes as-is)
// 5. Drop a trailing slash so "/docs" and "/docs/" are the same page
// 6. Reject blocklisted file extensions and hosts other than the start host
//
// The result is an opaque string key: two URLs are the same page exactly when
// their normalized strings are equal.
// =============================================================================

use url::Url;

// File extensions we never crawl (executables, archives, images, documents)
const BLOCKED_EXTENSIONS: [&str; 10] = [
    ".exe", ".pdf", ".png", ".jpg", ".jpeg", ".zip", ".gz", ".iso", ".bat", ".sh",
];

// Href prefixes that never point at a crawlable page
const BLOCKED_PREFIXES: [&str; 2] = ["javascript:", "mailto:"];

/// Canonicalizes a discovered reference, or rejects it.
///
/// Implementations must be pure: the same inputs always give the same answer.
pub trait Normalizer: Send + Sync {
    /// Returns the normalized absolute URL for `raw_href` found on `base_url`,
    /// or `None` when the href is invalid, disallowed, or leaves `start_domain`.
    fn normalize(&self, raw_href: &str, base_url: &str, start_domain: &str) -> Option<String>;
}

/// The normalizer used for real crawls: one host, http(s) only.
#[derive(Debug, Clone)]
pub struct SameDomainNormalizer {
    force_https: bool,
}

impl SameDomainNormalizer {
    pub fn new(force_https: bool) -> Self {
        Self { force_https }
    }
}

impl Default for SameDomainNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Normalizer for SameDomainNormalizer {
    fn normalize(&self, raw_href: &str, base_url: &str, start_domain: &str) -> Option<String> {
        let href = raw_href.trim();
        let lowered = href.to_ascii_lowercase();
        if BLOCKED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
            return None;
        }

        let base = Url::parse(base_url).ok()?;
        let mut url = base.join(href).ok()?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }
        if url.host_str().map_or(true, str::is_empty) {
            return None;
        }

        url.set_query(None);
        url.set_fragment(None);
        if self.force_https && url.scheme() == "http" {
            url.set_scheme("https").ok()?;
        }

        let path = url.path().to_ascii_lowercase();
        if BLOCKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            return None;
        }

        if authority(&url)? != start_domain {
            return None;
        }

        let mut normalized = url.to_string();
        if normalized.ends_with('/') {
            normalized.pop();
        }
        Some(normalized)
    }
}

// Attaches a scheme to scheme-less input like "example.com/docs"
//
// Returns: the input untouched if it already names a scheme
pub fn with_scheme(input: &str) -> String {
    let input = input.trim();
    // Only a "://" ahead of the path, query or fragment names a scheme;
    // "example.com/login?next=https://..." does not have one
    let has_scheme = match (input.find("://"), input.find(['/', '?', '#'])) {
        (Some(scheme_end), Some(rest_start)) => scheme_end < rest_start,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if has_scheme {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

// Extracts the crawl domain ("host" or "host:port") from a URL string
//
// The https upgrade is applied first when requested, so the domain of
// "http://example.com:80" and "https://example.com" compare the same way
// discovered links will.
pub fn start_domain(url: &str, force_https: bool) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    if force_https && parsed.scheme() == "http" {
        parsed.set_scheme("https").ok()?;
    }
    authority(&parsed)
}

// The url crate drops default ports (80 for http, 443 for https), so
// "host:port" only appears for non-default ports.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(href: &str) -> Option<String> {
        SameDomainNormalizer::default().normalize(href, "https://example.com/blog", "example.com")
    }

    #[test]
    fn test_relative_link_is_resolved() {
        assert_eq!(normalize("/a"), Some("https://example.com/a".to_string()));
        assert_eq!(normalize("post"), Some("https://example.com/post".to_string()));
    }

    #[test]
    fn test_query_and_fragment_are_stripped() {
        assert_eq!(
            normalize("/a?page=2#comments"),
            Some("https://example.com/a".to_string())
        );
    }

    #[test]
    fn test_http_is_upgraded_and_trailing_slash_dropped() {
        assert_eq!(
            normalize("http://example.com/docs/"),
            Some("https://example.com/docs".to_string())
        );
        assert_eq!(normalize("/"), Some("https://example.com".to_string()));
    }

    #[test]
    fn test_keep_scheme_leaves_http_alone() {
        let normalizer = SameDomainNormalizer::new(false);
        assert_eq!(
            normalizer.normalize("/a", "http://127.0.0.1:8080", "127.0.0.1:8080"),
            Some("http://127.0.0.1:8080/a".to_string())
        );
    }

    #[test]
    fn test_disallowed_schemes_are_rejected() {
        assert_eq!(normalize("mailto:foo@x.com"), None);
        assert_eq!(normalize("JavaScript:void(0)"), None);
        assert_eq!(normalize("tel:+123456"), None);
        assert_eq!(normalize("ftp://example.com/file"), None);
    }

    #[test]
    fn test_blocklisted_extensions_are_rejected() {
        assert_eq!(normalize("/setup.EXE"), None);
        assert_eq!(normalize("/paper.pdf?download=1"), None);
        assert_eq!(normalize("/images/logo.png"), None);
        assert_eq!(normalize("/install.sh"), None);
        assert_eq!(normalize("/shop"), Some("https://example.com/shop".to_string()));
    }

    #[test]
    fn test_other_hosts_are_rejected() {
        assert_eq!(normalize("https://other.com/x"), None);
        assert_eq!(normalize("https://blog.example.com/x"), None);
        assert_eq!(normalize("https://example.com:8443/x"), None);
    }

    #[test]
    fn test_with_scheme() {
        assert_eq!(with_scheme("example.com"), "https://example.com");
        assert_eq!(with_scheme(" http://example.com "), "http://example.com");
    }

    #[test]
    fn test_with_scheme_ignores_urls_in_the_query() {
        let input = with_scheme("example.com/login?next=https://example.com/home");
        assert_eq!(input, "https://example.com/login?next=https://example.com/home");
        assert_eq!(start_domain(&input, true), Some("example.com".to_string()));

        assert_eq!(
            with_scheme("example.com#https://other.com"),
            "https://example.com#https://other.com"
        );
    }

    #[test]
    fn test_start_domain_keeps_explicit_port() {
        assert_eq!(
            start_domain("http://localhost:3000/", false),
            Some("localhost:3000".to_string())
        );
        assert_eq!(
            start_domain("http://Example.COM/", true),
            Some("example.com".to_string())
        );
        assert_eq!(start_domain("not a url", true), None);
    }
}
