// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below *is* the CLI. Every field becomes
// an argument, and the doc comments become the --help text.
// =============================================================================

use clap::Parser;
use link_harvest::crawl::CrawlConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "link-harvest",
    version,
    about = "Crawl a website and collect all of its internal links",
    long_about = "link-harvest crawls a website breadth-first with a pool of concurrent workers, \
                  stays on the starting host, and writes every page it visited to \
                  <output-dir>/<domain>_internal_links.txt."
)]
pub struct Cli {
    /// Website to crawl (e.g., https://example.com or just example.com)
    pub url: String,

    /// The max number of URLs to collect. Use 0 to set it as infinite.
    #[arg(long, default_value_t = 50)]
    pub max_urls: usize,

    /// Number of pages fetched concurrently
    #[arg(short, long, default_value_t = 2)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Seconds workers get to finish in-flight pages when the crawl stops
    #[arg(long, default_value_t = 12)]
    pub grace: u64,

    /// Directory the link file is written to
    #[arg(long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Do not rewrite http:// links to https://
    #[arg(long)]
    pub keep_scheme: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every fetch and worker event (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_visited: self.max_urls,
            workers: self.workers,
            fetch_timeout: Duration::from_secs(self.timeout),
            grace_period: Duration::from_secs(self.grace),
            force_https: !self.keep_scheme,
            ..CrawlConfig::new(self.url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_crawl_config() {
        let cli = Cli::parse_from(["link-harvest", "example.com"]);
        let config = cli.crawl_config();
        assert_eq!(config.start_url, "example.com");
        assert_eq!(config.max_visited, 50);
        assert_eq!(config.workers, 2);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert!(config.force_https);
        assert_eq!(cli.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "link-harvest",
            "http://localhost:8000",
            "--max-urls",
            "0",
            "-w",
            "8",
            "--keep-scheme",
            "--json",
        ]);
        let config = cli.crawl_config();
        assert_eq!(config.max_visited, 0);
        assert_eq!(config.workers, 8);
        assert!(!config.force_https);
        assert!(cli.json);
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
