// src/crawl/frontier.rs
// =============================================================================
// The frontier is the crawl's shared work queue.
//
// It holds, behind a single lock:
// - the FIFO queue of URLs waiting to be fetched
// - the seen set: every URL ever admitted (pending, in flight or done)
// - the visited set: URLs whose fetch and extraction completed
// - the visit counter, compared against the visitation cap
// - the number of URLs currently being processed by workers
//
// Keeping all of it under one lock is what makes the two key operations
// atomic: `offer` checks and inserts in one step (no URL is ever admitted
// twice), and `take` can tell "nothing right now" apart from "nothing ever
// again" because it sees the queue and the in-flight count together.
//
// Rust concepts:
// - tokio::sync::Mutex: an async-aware lock, shared by all workers via Arc
// - tokio::sync::Notify: wakes workers that are waiting for new URLs
// =============================================================================

use std::collections::{BTreeSet, HashSet, VecDeque};
use tokio::sync::futures::Notified;
use tokio::sync::{Mutex, Notify};

/// What a worker gets back when it asks for work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Take {
    /// A URL to process; the worker must `settle` it when done
    Ready(String),
    /// Nothing queued, but other workers are still processing pages
    Empty,
    /// Nothing queued and nothing in flight: the crawl is quiescent
    Exhausted,
    /// The visitation cap has been used up
    CapReached,
}

/// Counters describing the frontier at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierStats {
    pub seen: usize,
    pub pending: usize,
    pub visits: usize,
    pub visited: usize,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    visited: HashSet<String>,
    visits: usize,
    in_flight: usize,
}

impl State {
    fn cap_reached(&self, cap: usize) -> bool {
        cap > 0 && self.visits >= cap
    }
}

#[derive(Debug)]
pub struct Frontier {
    state: Mutex<State>,
    wakeup: Notify,
    // 0 means unbounded
    cap: usize,
}

impl Frontier {
    pub fn new(cap: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            wakeup: Notify::new(),
            cap,
        }
    }

    // Admits a URL if it has never been seen before
    //
    // Returns: true if the URL was newly queued, false if it was already known
    // or the visitation cap is used up (it could never be fetched)
    pub async fn offer(&self, url: impl Into<String>) -> bool {
        let url = url.into();
        let admitted = {
            let mut state = self.state.lock().await;
            if state.cap_reached(self.cap) {
                false
            } else if state.seen.insert(url.clone()) {
                state.queue.push_back(url);
                true
            } else {
                false
            }
        };

        if admitted {
            self.wakeup.notify_one();
        }
        admitted
    }

    // Hands out the next URL, counting it against the cap
    pub async fn take(&self) -> Take {
        let mut state = self.state.lock().await;
        if state.cap_reached(self.cap) {
            return Take::CapReached;
        }

        match state.queue.pop_front() {
            Some(url) => {
                state.visits += 1;
                state.in_flight += 1;
                Take::Ready(url)
            }
            None if state.in_flight == 0 => Take::Exhausted,
            None => Take::Empty,
        }
    }

    // Marks a URL handed out by `take` as finished
    //
    // `fetched` is false when the page could not be fetched or parsed; such
    // URLs stay seen (never retried) but are not reported as visited.
    pub async fn settle(&self, url: String, fetched: bool) {
        let wake_everyone = {
            let mut state = self.state.lock().await;
            state.in_flight = state.in_flight.saturating_sub(1);
            if fetched {
                state.visited.insert(url);
            }
            (state.in_flight == 0 && state.queue.is_empty()) || state.cap_reached(self.cap)
        };

        // Idle workers must re-check so they can observe Exhausted/CapReached
        if wake_everyone {
            self.wakeup.notify_waiters();
        }
    }

    /// A future that resolves on the next frontier change. Enable it before
    /// calling `take` so a wakeup between the two is not lost.
    pub fn changed(&self) -> Notified<'_> {
        self.wakeup.notified()
    }

    pub async fn cap_reached(&self) -> bool {
        self.state.lock().await.cap_reached(self.cap)
    }

    pub async fn stats(&self) -> FrontierStats {
        let state = self.state.lock().await;
        FrontierStats {
            seen: state.seen.len(),
            pending: state.queue.len(),
            visits: state.visits,
            visited: state.visited.len(),
        }
    }

    /// A sorted copy of the visited set.
    pub async fn visited(&self) -> BTreeSet<String> {
        self.state.lock().await.visited.iter().cloned().collect()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why count visits in `take` rather than in `settle`?
//    - The cap limits how much work is started, not how much finishes
//    - Counting at dequeue time means no more than `cap` fetches ever begin,
//      even when many workers race for the last slot
//
// 2. Why does `offer` check the cap too?
//    - A worker can pass its own cap check, then lose the last slot to a
//      peer while it normalizes; the check has to sit under the same lock
//      as the insert
//
// 3. Why notify_one in `offer` but notify_waiters in `settle`?
//    - One new URL is work for exactly one idle worker
//    - Quiescence (or the cap) is news for every idle worker: they all need
//      to wake up and exit
// -----------------------------------------------------------------------------
