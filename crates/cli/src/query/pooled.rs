//! Pool-backed matcher facade.
//!
//! Mirrors the synchronous [`Matcher`](super::matcher::Matcher) surface,
//! except `find_matches` hands the accumulated sources to a pool worker
//! and returns a ticket. Comment stripping happens worker-side, inside the
//! hosted matcher; this facade only deduplicates raw texts.
//!
//! Unlike the sync flavor, `matched_results` replaces its result wholesale
//! on every resolution: callers see the latest resolved set, not a stable
//! reference. Before the first resolution it fails.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::Receiver;

use crate::error::{Error, Result};

use super::pool::{MatchSet, WorkerPool};

type ResultSlot = Arc<Mutex<Option<Arc<MatchSet>>>>;

fn store(slot: &ResultSlot, matched: MatchSet) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(matched));
}

/// A pending `find_matches` resolution.
///
/// Exactly one message arrives: the worker's reply, or an error if the
/// worker died or the pool shut down underneath it.
#[must_use = "a ticket that is never waited leaves results unresolved"]
#[derive(Debug)]
pub struct MatchTicket {
    rx: Receiver<Result<MatchSet>>,
    slot: ResultSlot,
}

impl MatchTicket {
    /// Block until the scan resolves, publishing the result to the
    /// matcher that issued this ticket.
    pub fn wait(self) -> Result<()> {
        let matched = self.rx.recv().map_err(|_| Error::WorkerLost)??;
        store(&self.slot, matched);
        Ok(())
    }

    /// Non-blocking variant: consumes the ticket when the reply is in,
    /// otherwise hands it back.
    pub fn try_wait(self) -> std::result::Result<Result<()>, MatchTicket> {
        match self.rx.try_recv() {
            Ok(reply) => Ok(reply.map(|matched| store(&self.slot, matched))),
            Err(crossbeam_channel::TryRecvError::Empty) => Err(self),
            Err(crossbeam_channel::TryRecvError::Disconnected) => Ok(Err(Error::WorkerLost)),
        }
    }
}

/// Matcher whose scans run on the worker pool.
pub struct PooledMatcher {
    pool: Arc<WorkerPool>,
    sources: BTreeSet<String>,
    results: ResultSlot,
}

impl PooledMatcher {
    pub(crate) fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            pool,
            sources: BTreeSet::new(),
            results: Arc::new(Mutex::new(None)),
        }
    }

    /// Store a raw source text, deduplicated.
    pub fn add_source(&mut self, text: &str) {
        self.sources.insert(text.to_string());
    }

    /// Submit the current source set to the pool.
    pub fn find_matches(&mut self) -> MatchTicket {
        let sources: Vec<String> = self.sources.iter().cloned().collect();
        MatchTicket {
            rx: self.pool.submit(sources),
            slot: Arc::clone(&self.results),
        }
    }

    /// The latest resolved matched set.
    ///
    /// Fails with [`Error::ResultsNotReady`] until a ticket from this
    /// matcher has resolved.
    pub fn matched_results(&self) -> Result<Arc<MatchSet>> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::ResultsNotReady)
    }
}

impl std::fmt::Debug for PooledMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledMatcher")
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "pooled_tests.rs"]
mod tests;
