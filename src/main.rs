// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG wins over --verbose)
// 3. Run the crawl, stopping early on Ctrl-C
// 4. Write the link file and print the report
// 5. Exit with proper code (0 = pages found, 1 = nothing crawled, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use link_harvest::crawl::{Collaborators, Coordinator};
use link_harvest::output::{self, CrawlReport};
use log::{info, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = cli.crawl_config();
    if !cli.json {
        println!("🔍 Crawling website: {}", config.start_url);
    }

    let collaborators = Collaborators::http(&config)?;
    let mut coordinator = Coordinator::new(config.clone(), collaborators);

    let shutdown = coordinator.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing in-flight pages");
            shutdown.cancel();
        }
    });

    let outcome = coordinator.run().await.context("crawl failed")?;

    if outcome.visited.is_empty() {
        eprintln!("⚠️  No pages could be crawled from {}", outcome.start_url);
        return Ok(1);
    }

    let path = output::write_links(&cli.output_dir, &outcome.domain, &outcome.visited)?;
    info!("wrote {} link(s) to {}", outcome.visited.len(), path.display());

    let report = CrawlReport::new(&config, &outcome, Some(path.as_path()));
    output::print_report(&report, cli.json)?;

    Ok(0)
}
