// src/crawl/worker.rs
// =============================================================================
// One member of the worker pool.
//
// Each worker runs the same loop:
// 1. Stop if the crawl has been cancelled
// 2. Ask the frontier for a URL
// 3. Fetch it, extract its links, normalize them, offer them back
// 4. Tell the frontier the URL is done, and go around again
//
// When the frontier is momentarily empty the worker sleeps until a peer
// offers something new (or until the crawl is cancelled). It exits for good
// once the frontier reports quiescence or the visitation cap.
//
// Failures for a single URL (timeout, bad status, non-HTML, binary body) are
// logged and dropped. They never stop the worker.
// =============================================================================

use super::frontier::{Frontier, Take};
use super::shutdown::ShutdownHandle;
use crate::page::{Fetcher, LinkExtractor, Normalizer};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// The external services a worker calls for every page.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub normalizer: Arc<dyn Normalizer>,
}

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    Exhausted,
    CapReached,
    Cancelled,
}

pub struct Worker {
    pub id: usize,
    pub frontier: Arc<Frontier>,
    pub shutdown: ShutdownHandle,
    pub collaborators: Collaborators,
    pub start_domain: Arc<str>,
    pub fetch_timeout: Duration,
}

impl Worker {
    pub async fn run(self) -> WorkerExit {
        debug!("worker {} starting", self.id);

        let exit = loop {
            let url = {
                let changed = self.frontier.changed();
                tokio::pin!(changed);
                // Registered before the checks below, so neither a new URL nor
                // a cancellation can be missed while we decide to wait
                changed.as_mut().enable();

                if self.shutdown.is_cancelled() {
                    break WorkerExit::Cancelled;
                }

                match self.frontier.take().await {
                    Take::Ready(url) => url,
                    Take::Empty => {
                        tokio::select! {
                            _ = &mut changed => {}
                            _ = self.shutdown.cancelled() => {}
                        }
                        continue;
                    }
                    Take::Exhausted => break WorkerExit::Exhausted,
                    Take::CapReached => break WorkerExit::CapReached,
                }
            };

            // `changed` is dropped by now: a busy worker must not swallow
            // wakeups meant for idle peers
            self.visit(url).await;
        };

        debug!("worker {} stopping: {:?}", self.id, exit);
        exit
    }

    // Processes one dequeued URL and settles it with the frontier
    async fn visit(&self, url: String) {
        debug!("worker {}: fetching {}", self.id, url);

        let content = match self.collaborators.fetcher.fetch(&url, self.fetch_timeout).await {
            Ok(content) => content,
            Err(e) => {
                warn!("worker {}: failed to fetch {}: {}", self.id, url, e);
                self.frontier.settle(url, false).await;
                return;
            }
        };

        let hrefs = match self.collaborators.extractor.extract(&content) {
            Ok(hrefs) => hrefs,
            Err(e) => {
                warn!("worker {}: could not read {}: {}", self.id, url, e);
                self.frontier.settle(url, false).await;
                return;
            }
        };

        // Links found after the crawl stopped growing would never be fetched.
        // `offer` refuses them past the cap anyway; this skips normalizing them
        if self.shutdown.is_cancelled() || self.frontier.cap_reached().await {
            debug!(
                "worker {}: discarding {} link(s) from {}",
                self.id,
                hrefs.len(),
                url
            );
        } else {
            for href in &hrefs {
                let Some(link) = self
                    .collaborators
                    .normalizer
                    .normalize(href, &url, &self.start_domain)
                else {
                    continue;
                };
                if self.frontier.offer(link.clone()).await {
                    info!("[*] Link: {}", link);
                }
            }
        }

        self.frontier.settle(url, true).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{FetchError, HtmlLinkExtractor, SameDomainNormalizer};
    use async_trait::async_trait;

    // Serves one fixed page for every URL
    struct OnePage(&'static str);

    #[async_trait]
    impl Fetcher for OnePage {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<String, FetchError> {
            Ok(self.0.to_string())
        }
    }

    struct AlwaysTimesOut;

    #[async_trait]
    impl Fetcher for AlwaysTimesOut {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<String, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    // Requests shutdown while its page is in flight
    struct CancelsMidFetch {
        shutdown: ShutdownHandle,
        page: &'static str,
    }

    #[async_trait]
    impl Fetcher for CancelsMidFetch {
        async fn fetch(&self, _url: &str, _timeout: Duration) -> Result<String, FetchError> {
            self.shutdown.cancel();
            Ok(self.page.to_string())
        }
    }

    fn worker(fetcher: Arc<dyn Fetcher>, frontier: Arc<Frontier>, shutdown: ShutdownHandle) -> Worker {
        Worker {
            id: 0,
            frontier,
            shutdown,
            collaborators: Collaborators {
                fetcher,
                extractor: Arc::new(HtmlLinkExtractor::default()),
                normalizer: Arc::new(SameDomainNormalizer::default()),
            },
            start_domain: Arc::from("example.com"),
            fetch_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_single_worker_drains_frontier() {
        let page = r#"<a href="/a">A</a><a href="/b">B</a><a href="https://other.com/">x</a>"#;
        let frontier = Arc::new(Frontier::new(0));
        frontier.offer("https://example.com").await;

        let exit = worker(Arc::new(OnePage(page)), Arc::clone(&frontier), ShutdownHandle::new())
            .run()
            .await;

        assert_eq!(exit, WorkerExit::Exhausted);
        let visited = frontier.visited().await;
        assert_eq!(visited.len(), 3);
        assert!(visited.contains("https://example.com/b"));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_visited() {
        let frontier = Arc::new(Frontier::new(0));
        frontier.offer("https://example.com").await;

        let exit = worker(Arc::new(AlwaysTimesOut), Arc::clone(&frontier), ShutdownHandle::new())
            .run()
            .await;

        assert_eq!(exit, WorkerExit::Exhausted);
        assert!(frontier.visited().await.is_empty());
        assert_eq!(frontier.stats().await.visits, 1);
    }

    #[tokio::test]
    async fn test_cancelled_worker_exits_without_taking_work() {
        let frontier = Arc::new(Frontier::new(0));
        frontier.offer("https://example.com").await;
        let shutdown = ShutdownHandle::new();
        shutdown.cancel();

        let exit = worker(Arc::new(OnePage("")), Arc::clone(&frontier), shutdown)
            .run()
            .await;

        assert_eq!(exit, WorkerExit::Cancelled);
        assert_eq!(frontier.stats().await.visits, 0);
    }

    #[tokio::test]
    async fn test_links_are_discarded_once_cap_is_reached() {
        let page = r#"<a href="/a">A</a>"#;
        let frontier = Arc::new(Frontier::new(1));
        frontier.offer("https://example.com").await;

        let exit = worker(Arc::new(OnePage(page)), Arc::clone(&frontier), ShutdownHandle::new())
            .run()
            .await;

        assert_eq!(exit, WorkerExit::CapReached);
        let stats = frontier.stats().await;
        assert_eq!(stats.seen, 1);
        assert_eq!(stats.visited, 1);
    }

    #[tokio::test]
    async fn test_links_are_discarded_when_cancelled_mid_fetch() {
        let frontier = Arc::new(Frontier::new(0));
        frontier.offer("https://example.com").await;
        let shutdown = ShutdownHandle::new();
        let fetcher = CancelsMidFetch {
            shutdown: shutdown.clone(),
            page: r#"<a href="/a">A</a><a href="/b">B</a>"#,
        };

        let exit = worker(Arc::new(fetcher), Arc::clone(&frontier), shutdown)
            .run()
            .await;

        assert_eq!(exit, WorkerExit::Cancelled);
        let stats = frontier.stats().await;
        assert_eq!(stats.seen, 1);
        assert_eq!(stats.visited, 1);
        assert!(frontier.visited().await.contains("https://example.com"));
    }
}
