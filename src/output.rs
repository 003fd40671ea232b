// src/output.rs
// =============================================================================
// This module turns a finished crawl into something a person can use.
//
// Two outputs:
// - A text file named after the crawled domain, one URL per line
//   (e.g. outputs/example.com_internal_links.txt)
// - A summary on stdout, either as a human-readable table or as JSON
// =============================================================================

use crate::crawl::{CrawlConfig, CrawlOutcome, CrawlStats, StopReason};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Everything we know about a finished crawl, ready for JSON output.
#[derive(Debug, Serialize)]
pub struct CrawlReport<'a> {
    pub config: &'a CrawlConfig,
    pub start_url: &'a str,
    pub domain: &'a str,
    pub stats: &'a CrawlStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<&'a Path>,
    pub links: &'a BTreeSet<String>,
}

impl<'a> CrawlReport<'a> {
    pub fn new(config: &'a CrawlConfig, outcome: &'a CrawlOutcome, output_file: Option<&'a Path>) -> Self {
        Self {
            config,
            start_url: &outcome.start_url,
            domain: &outcome.domain,
            stats: &outcome.stats,
            output_file,
            links: &outcome.visited,
        }
    }
}

// The file name for a domain's link list
//
// Ports are kept but ':' is replaced, since it is not allowed in file names
// on every platform.
pub fn output_file_name(domain: &str) -> String {
    format!("{}_internal_links.txt", domain.replace(':', "_"))
}

// Writes the visited URLs to <dir>/<domain>_internal_links.txt
//
// Returns: the path of the written file
pub fn write_links(dir: &Path, domain: &str, links: &BTreeSet<String>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    let path = dir.join(output_file_name(domain));
    let file = File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for link in links {
        writeln!(writer, "{}", link.trim())?;
    }
    writer
        .flush()
        .with_context(|| format!("cannot write {}", path.display()))?;

    Ok(path)
}

// Prints the report either as a table or JSON
pub fn print_report(report: &CrawlReport<'_>, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &CrawlReport<'_>) {
    println!("{:<6} {}", "#", "URL");
    println!("{}", "=".repeat(80));
    for (index, link) in report.links.iter().enumerate() {
        println!("{:<6} {}", index + 1, link);
    }
    println!();

    let stats = report.stats;
    println!("📊 Summary for {}:", report.domain);
    println!("   ✅ Visited: {}", stats.visited);
    println!("   🔗 Discovered: {}", stats.discovered);
    println!("   📥 Processed: {}", stats.visits);
    println!("   🛑 Stopped: {}", describe_stop(stats));
    println!("   ⏱️  Time: {:.2}s", stats.elapsed_seconds);
    if let Some(path) = report.output_file {
        println!("   📄 Saved to: {}", path.display());
    }
}

fn describe_stop(stats: &CrawlStats) -> &'static str {
    match stats.stop_reason {
        StopReason::Exhausted => "no more links to follow",
        StopReason::CapReached => "visitation cap reached",
        StopReason::Cancelled => "cancelled",
    }
}
