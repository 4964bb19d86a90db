// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool for parallel matching.
//!
//! Workers are OS threads spawned lazily up to a ceiling, each holding a
//! shared immutable snapshot of the compiled queries and a serial mailbox.
//! Submission is FIFO-dispatched: an idle worker is always reused before a
//! new one is spawned, and tasks queue when the pool is saturated.
//! Completion order is whatever the workers produce; callers that need
//! ordering re-serialize on their side.

use std::collections::{BTreeSet, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{Error, Result};

use super::compiler::CompiledQuery;
use super::matcher::Matcher;

/// Matched query names delivered by a worker.
pub(crate) type MatchSet = BTreeSet<String>;

/// One unit of pool work: source texts in, matched names out.
struct Task {
    sources: Vec<String>,
    reply: Sender<Result<MatchSet>>,
}

enum WorkerMsg {
    Run(Task),
    Stop,
}

struct WorkerHandle {
    id: usize,
    mailbox: Sender<WorkerMsg>,
    thread: std::thread::JoinHandle<()>,
}

#[derive(Default)]
struct PoolState {
    workers: Vec<WorkerHandle>,
    idle: VecDeque<usize>,
    pending: VecDeque<Task>,
    next_id: usize,
    shut_down: bool,
}

/// Bounded pool of matcher-hosting workers.
pub struct WorkerPool {
    state: Arc<Mutex<PoolState>>,
    snapshot: Arc<[CompiledQuery]>,
    max_workers: usize,
}

fn lock(state: &Mutex<PoolState>) -> MutexGuard<'_, PoolState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl WorkerPool {
    /// Create an empty pool; workers spawn on demand up to `max_workers`.
    pub(crate) fn new(snapshot: Arc<[CompiledQuery]>, max_workers: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState::default())),
            snapshot,
            max_workers: max_workers.max(1),
        }
    }

    /// Queue a task and dispatch as far as workers allow.
    ///
    /// The returned channel yields exactly one message: the matched set, or
    /// an error if the worker died. After shutdown, tasks fail immediately.
    pub(crate) fn submit(&self, sources: Vec<String>) -> Receiver<Result<MatchSet>> {
        let (reply, rx) = crossbeam_channel::bounded(1);
        let mut state = lock(&self.state);
        if state.shut_down {
            let _ = reply.send(Err(Error::WorkerLost));
            return rx;
        }
        state.pending.push_back(Task { sources, reply });
        self.dispatch(&mut state);
        rx
    }

    /// Dispatch loop: while a task is pending and a worker is obtainable,
    /// pair them up. Must be called with the state lock held.
    fn dispatch(&self, state: &mut PoolState) {
        while !state.pending.is_empty() {
            let id = match self.obtain_worker(state) {
                Some(id) => id,
                None => break,
            };
            let Some(task) = state.pending.pop_front() else {
                state.idle.push_back(id);
                break;
            };
            let delivered = state
                .workers
                .iter()
                .find(|w| w.id == id)
                .map(|w| w.mailbox.send(WorkerMsg::Run(task)));
            match delivered {
                Some(Ok(())) => {}
                Some(Err(send_err)) => {
                    // Mailbox gone: the thread is dead. Fail the task and
                    // retire the worker.
                    if let WorkerMsg::Run(task) = send_err.into_inner() {
                        let _ = task.reply.send(Err(Error::WorkerLost));
                    }
                    state.workers.retain(|w| w.id != id);
                }
                None => {}
            }
        }
    }

    /// Idle worker if any, else a fresh spawn while below the ceiling.
    fn obtain_worker(&self, state: &mut PoolState) -> Option<usize> {
        if let Some(id) = state.idle.pop_front() {
            return Some(id);
        }
        if state.workers.len() < self.max_workers {
            return Some(self.spawn_worker(state));
        }
        None
    }

    fn spawn_worker(&self, state: &mut PoolState) -> usize {
        let id = state.next_id;
        state.next_id += 1;
        let (mailbox, inbox) = crossbeam_channel::unbounded();
        let snapshot = Arc::clone(&self.snapshot);
        let shared = Arc::clone(&self.state);
        let thread = std::thread::spawn(move || worker_loop(id, inbox, snapshot, shared));
        tracing::debug!(worker = id, total = state.workers.len() + 1, "worker spawned");
        state.workers.push(WorkerHandle {
            id,
            mailbox,
            thread,
        });
        id
    }

    /// Stop accepting work, fail queued tasks, and join every worker.
    pub fn shutdown(&self) {
        let workers = {
            let mut state = lock(&self.state);
            if state.shut_down {
                return;
            }
            state.shut_down = true;
            for task in state.pending.drain(..) {
                let _ = task.reply.send(Err(Error::WorkerLost));
            }
            state.idle.clear();
            std::mem::take(&mut state.workers)
        };
        for worker in &workers {
            let _ = worker.mailbox.send(WorkerMsg::Stop);
        }
        for worker in workers {
            let _ = worker.thread.join();
        }
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        lock(&self.state).workers.len()
    }

    /// Number of workers parked on the idle queue.
    pub fn idle_count(&self) -> usize {
        lock(&self.state).idle.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.max_workers)
            .field("workers", &self.worker_count())
            .field("idle", &self.idle_count())
            .finish()
    }
}

fn worker_loop(
    id: usize,
    inbox: Receiver<WorkerMsg>,
    snapshot: Arc<[CompiledQuery]>,
    shared: Arc<Mutex<PoolState>>,
) {
    while let Ok(msg) = inbox.recv() {
        let task = match msg {
            WorkerMsg::Run(task) => task,
            WorkerMsg::Stop => break,
        };
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_task(&snapshot, &task.sources)));
        match outcome {
            Ok(matched) => {
                let _ = task.reply.send(Ok(matched));
                finish_task(id, &shared);
            }
            Err(_) => {
                tracing::warn!(worker = id, "worker task panicked; retiring worker");
                let _ = task.reply.send(Err(Error::WorkerLost));
                retire(id, &shared);
                break;
            }
        }
    }
}

/// Host a fresh matcher over the snapshot for one task.
fn run_task(queries: &[CompiledQuery], sources: &[String]) -> MatchSet {
    let mut matcher = Matcher::new(queries);
    for source in sources {
        matcher.add_source(source);
    }
    matcher.find_matches();
    matcher.matched_results().clone()
}

/// Re-enter the dispatcher after a completed task: take the next pending
/// task if one is queued, otherwise park on the idle queue.
fn finish_task(id: usize, shared: &Mutex<PoolState>) {
    let mut state = lock(shared);
    if state.shut_down {
        return;
    }
    match state.pending.pop_front() {
        Some(task) => {
            let delivered = state
                .workers
                .iter()
                .find(|w| w.id == id)
                .map(|w| w.mailbox.send(WorkerMsg::Run(task)));
            if let Some(Err(send_err)) = delivered {
                if let WorkerMsg::Run(task) = send_err.into_inner() {
                    let _ = task.reply.send(Err(Error::WorkerLost));
                }
            }
        }
        None => state.idle.push_back(id),
    }
}

/// Drop a crashed worker from the roster; it is not re-idled, and a later
/// submission may spawn a replacement up to the ceiling.
fn retire(id: usize, shared: &Mutex<PoolState>) {
    let mut state = lock(shared);
    state.workers.retain(|w| w.id != id);
    state.idle.retain(|&idle_id| idle_id != id);
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
