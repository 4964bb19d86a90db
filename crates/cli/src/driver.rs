// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The line-oriented driver.
//!
//! Reads input lines, resolves each to an extension, applies the selected
//! filter, and echoes kept lines to stdout. Output preserves input order:
//! verdicts queue in arrival order and line i is emitted only after line
//! i-1, while pool work for later lines runs ahead of emission. A counting
//! semaphore caps how many lines' sources are held in memory at once.
//!
//! Per-line failures (unresolvable root, bad manifest, unreadable files)
//! are logged as warnings and filter the line; they never abort the batch.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::{Condvar, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::extension::Resolver;
use crate::filters::{Filter, PendingMatch, Verdict};

/// Ceiling on concurrently held extension sources.
pub const IO_CEILING: usize = 500;

/// Counting semaphore bounding in-flight extension reads.
pub(crate) struct IoGate {
    permits: Mutex<usize>,
    available: Condvar,
}

impl IoGate {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            permits: Mutex::new(capacity.max(1)),
            available: Condvar::new(),
        }
    }

    pub(crate) fn acquire(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    pub(crate) fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    pub(crate) fn release(&self) {
        let mut permits = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *permits += 1;
        self.available.notify_one();
    }
}

/// Driver knobs.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Counting-semaphore capacity for concurrent extension reads.
    pub io_ceiling: usize,
    /// Silence missing-addon warnings (`IGNORE_MISSING_ADDON`).
    pub ignore_missing: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            io_ceiling: IO_CEILING,
            ignore_missing: false,
        }
    }
}

/// One in-flight input line.
struct Entry {
    line: String,
    /// Resolved extension root, when one was found; kept lines echo this
    /// (or the raw line for rootless keeps, e.g. user-count by id).
    display: Option<String>,
    decision: Decision,
}

enum Decision {
    Ready(Result<bool>),
    Pending(PendingMatch),
}

impl Entry {
    /// Settle a pending decision if its scan already resolved. Returns
    /// whether the entry can be emitted without blocking.
    fn poll_decision(&mut self) -> bool {
        if let Decision::Pending(pending) = &mut self.decision {
            match pending.poll() {
                Some(result) => self.decision = Decision::Ready(result),
                None => return false,
            }
        }
        true
    }
}

/// Streams input lines through a filter, in order.
pub struct Driver {
    filter: Box<dyn Filter>,
    resolver: Resolver,
    gate: IoGate,
    ignore_missing: bool,
}

impl Driver {
    pub fn new(filter: Box<dyn Filter>, resolver: Resolver, config: DriverConfig) -> Self {
        Self {
            filter,
            resolver,
            gate: IoGate::new(config.io_ceiling),
            ignore_missing: config.ignore_missing,
        }
    }

    /// Run the batch: read every line, emit kept ones in input order.
    pub fn run(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<()> {
        let mut inflight: VecDeque<Entry> = VecDeque::new();
        for line in input.lines() {
            let line = line.map_err(|e| Error::Io {
                path: PathBuf::from("<stdin>"),
                source: e,
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.admit(&mut inflight, output)?;
            inflight.push_back(self.evaluate(line));
        }
        while let Some(entry) = inflight.pop_front() {
            self.emit(entry, output)?;
        }
        Ok(())
    }

    /// Resolve and filter one line. Never fails; failures become a
    /// filtered line with the error recorded for ordered logging.
    fn evaluate(&self, line: &str) -> Entry {
        let input = self.resolver.resolve(line);
        let display = input.root().ok().map(|p| p.display().to_string());
        let decision = match self.filter.apply(&input) {
            Ok(Verdict::Keep) => Decision::Ready(Ok(true)),
            Ok(Verdict::Drop) => Decision::Ready(Ok(false)),
            Ok(Verdict::Pending(pending)) => Decision::Pending(pending),
            Err(err) => Decision::Ready(Err(err)),
        };
        Entry {
            line: line.to_string(),
            display,
            decision,
        }
    }

    /// Take an I/O permit, emitting decided front entries while waiting.
    fn admit(&self, inflight: &mut VecDeque<Entry>, output: &mut dyn Write) -> Result<()> {
        loop {
            self.drain_ready(inflight, output)?;
            if self.gate.try_acquire() {
                return Ok(());
            }
            // Gate saturated: the front entry necessarily holds a permit,
            // so settle it (blocking) to free one.
            match inflight.pop_front() {
                Some(entry) => self.emit(entry, output)?,
                None => {
                    self.gate.acquire();
                    return Ok(());
                }
            }
        }
    }

    /// Emit front entries whose decisions are already in.
    fn drain_ready(&self, inflight: &mut VecDeque<Entry>, output: &mut dyn Write) -> Result<()> {
        while inflight.front_mut().is_some_and(Entry::poll_decision) {
            if let Some(entry) = inflight.pop_front() {
                self.emit(entry, output)?;
            }
        }
        Ok(())
    }

    /// Settle (blocking if pending), write the kept line, release the
    /// entry's I/O permit.
    fn emit(&self, entry: Entry, output: &mut dyn Write) -> Result<()> {
        let settled = match entry.decision {
            Decision::Ready(result) => result,
            Decision::Pending(pending) => pending.resolve(),
        };
        let keep = match settled {
            Ok(keep) => keep,
            Err(err) => {
                self.warn_line(&entry.line, &err);
                false
            }
        };
        if keep {
            let shown = entry.display.as_deref().unwrap_or(&entry.line);
            writeln!(output, "{shown}").map_err(|e| Error::Io {
                path: PathBuf::from("<stdout>"),
                source: e,
            })?;
            output.flush().map_err(|e| Error::Io {
                path: PathBuf::from("<stdout>"),
                source: e,
            })?;
        }
        self.gate.release();
        Ok(())
    }

    fn warn_line(&self, line: &str, err: &Error) {
        if self.ignore_missing && matches!(err, Error::UnknownAddon { .. }) {
            tracing::debug!(line, %err, "line filtered");
        } else {
            tracing::warn!(line, %err, "line filtered");
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
