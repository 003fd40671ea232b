// src/crawl/coordinator.rs
// =============================================================================
// The coordinator owns one crawl from start to finish.
//
// Lifecycle:
//   Idle -> Seeding -> Running -> Draining -> Terminated
//
// - Seeding: validate the start URL and put it in a fresh frontier
// - Running: spawn the worker pool and wait for the first worker to stop
// - Draining: the first exit means the crawl is over (the frontier is
//   quiescent or the cap is used up), or the caller asked us to stop.
//   Cancel everyone, give them a grace period to acknowledge, then abort
//   whoever is still running.
// - Terminated: hand the visited set back to the caller
//
// One coordinator means one frontier: independent crawls never share state.
// =============================================================================

use super::config::CrawlConfig;
use super::error::CrawlError;
use super::frontier::Frontier;
use super::shutdown::ShutdownHandle;
use super::worker::{Collaborators, Worker, WorkerExit};
use crate::page::normalize;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Idle,
    Seeding,
    Running,
    Draining,
    Terminated,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlPhase::Idle => "idle",
            CrawlPhase::Seeding => "seeding",
            CrawlPhase::Running => "running",
            CrawlPhase::Draining => "draining",
            CrawlPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Why the crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every reachable page was processed
    Exhausted,
    /// The visitation cap was used up
    CapReached,
    /// The caller requested shutdown
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    /// URLs dequeued and processed (what the cap counts)
    pub visits: usize,
    /// URLs ever admitted to the frontier
    pub discovered: usize,
    /// URLs whose fetch and extraction completed
    pub visited: usize,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The normalized start URL
    pub start_url: String,
    /// The host (and port, if any) the crawl stayed on
    pub domain: String,
    pub visited: BTreeSet<String>,
    pub stats: CrawlStats,
}

pub struct Coordinator {
    config: CrawlConfig,
    collaborators: Collaborators,
    shutdown: ShutdownHandle,
    phase: CrawlPhase,
}

impl Coordinator {
    pub fn new(config: CrawlConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            shutdown: ShutdownHandle::new(),
            phase: CrawlPhase::Idle,
        }
    }

    /// A handle the caller can use to stop the crawl early (e.g. on Ctrl-C).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    fn enter(&mut self, phase: CrawlPhase) {
        debug!("crawl phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs the crawl to completion. A coordinator runs once: its shutdown
    /// handle stays cancelled afterwards, so a second call is rejected.
    pub async fn run(&mut self) -> Result<CrawlOutcome, CrawlError> {
        if self.phase != CrawlPhase::Idle {
            return Err(CrawlError::Configuration(format!(
                "coordinator already ran (phase: {})",
                self.phase
            )));
        }

        let result = self.execute().await;
        if self.phase != CrawlPhase::Terminated {
            self.enter(CrawlPhase::Terminated);
        }
        result
    }

    async fn execute(&mut self) -> Result<CrawlOutcome, CrawlError> {
        let started = Instant::now();
        self.enter(CrawlPhase::Seeding);

        if self.config.workers == 0 {
            return Err(CrawlError::Configuration(
                "worker count must be at least 1".to_string(),
            ));
        }
        let (start_url, domain) = self.seed_url()?;

        let frontier = Arc::new(Frontier::new(self.config.max_visited));
        frontier.offer(start_url.clone()).await;
        info!(
            "crawling {} with {} worker(s), cap {}",
            start_url,
            self.config.workers,
            describe_cap(self.config.max_visited)
        );

        self.enter(CrawlPhase::Running);
        let start_domain: Arc<str> = Arc::from(domain.as_str());
        let mut workers = FuturesUnordered::new();
        let mut abort_handles = Vec::with_capacity(self.config.workers);
        for id in 0..self.config.workers {
            let worker = Worker {
                id,
                frontier: Arc::clone(&frontier),
                shutdown: self.shutdown.clone(),
                collaborators: self.collaborators.clone(),
                start_domain: Arc::clone(&start_domain),
                fetch_timeout: self.config.fetch_timeout,
            };
            let handle = tokio::spawn(worker.run());
            abort_handles.push(handle.abort_handle());
            workers.push(handle);
        }

        // Any single worker exit ends the Running phase: Exhausted means all
        // workers are idle, CapReached means no new work may start
        let mut fault = None;
        let stop_reason = tokio::select! {
            first = workers.next() => match first {
                Some(Ok(WorkerExit::CapReached)) => StopReason::CapReached,
                Some(Ok(WorkerExit::Exhausted)) | None => StopReason::Exhausted,
                Some(Ok(WorkerExit::Cancelled)) => StopReason::Cancelled,
                Some(Err(e)) => {
                    fault = Some(e.to_string());
                    StopReason::Cancelled
                }
            },
            _ = self.shutdown.cancelled() => StopReason::Cancelled,
        };

        self.enter(CrawlPhase::Draining);
        self.shutdown.cancel();

        let grace_period = self.config.grace_period;
        let drain = async {
            while let Some(result) = workers.next().await {
                if let Err(e) = result {
                    fault.get_or_insert_with(|| e.to_string());
                }
            }
        };
        if tokio::time::timeout(grace_period, drain).await.is_err() {
            warn!(
                "workers did not stop within {:?}; abandoning in-flight fetches",
                grace_period
            );
            for handle in &abort_handles {
                handle.abort();
            }
        }

        self.enter(CrawlPhase::Terminated);
        if let Some(fault) = fault {
            return Err(CrawlError::WorkerFault(fault));
        }

        let frontier_stats = frontier.stats().await;
        let visited = frontier.visited().await;
        let stats = CrawlStats {
            visits: frontier_stats.visits,
            discovered: frontier_stats.seen,
            visited: visited.len(),
            stop_reason,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        };
        info!(
            "crawl finished ({:?}): {} page(s) visited, {} discovered",
            stats.stop_reason, stats.visited, stats.discovered
        );

        Ok(CrawlOutcome {
            start_url,
            domain,
            visited,
            stats,
        })
    }

    // Normalizes the start URL with the same rules as discovered links
    //
    // Returns: (normalized start URL, start domain)
    fn seed_url(&self) -> Result<(String, String), CrawlError> {
        let candidate = normalize::with_scheme(&self.config.start_url);
        let invalid = || {
            CrawlError::Configuration(format!("invalid start URL: {}", self.config.start_url))
        };

        let domain = normalize::start_domain(&candidate, self.config.force_https).ok_or_else(invalid)?;
        let start_url = self
            .collaborators
            .normalizer
            .normalize(&candidate, &candidate, &domain)
            .ok_or_else(invalid)?;
        Ok((start_url, domain))
    }
}

fn describe_cap(max_visited: usize) -> String {
    if max_visited == 0 {
        "unlimited".to_string()
    } else {
        max_visited.to_string()
    }
}
