// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Query compilation: dotted API names to conditions of lexical patterns.
//!
//! A query like `storage.local.get` compiles to an ordered list of
//! conditions. Each condition is a conjunction of patterns; the query is
//! considered referenced when any condition has all of its patterns match.
//! Besides the literal occurrence, conditions cover one-, two-, and
//! three-part aliasing (`let s = chrome.storage; ... s.local.get(...)`)
//! without tracking alias identity: an assignment-looking site and a
//! dereference-looking site are matched independently. Deeper alias chains
//! are deliberately not covered to limit noise.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Error, Result};

use super::fragments::{any, body, dot, host_dot, rhs};
use super::matcher::Matcher;
use super::pool::WorkerPool;
use super::pooled::PooledMatcher;

/// A compiled lexical pattern, interned by source string.
///
/// `id` is the interning index; matchers memoize per-scan verdicts by it,
/// so patterns shared across queries (common prefixes) are evaluated once.
#[derive(Debug)]
pub struct CompiledPattern {
    id: usize,
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Interning map from pattern source string to compiled pattern.
///
/// Insertion is idempotent; a hit returns the existing instance. Owned by
/// the compiler and never shared across threads (workers get the compiled
/// queries, not the cache).
#[derive(Debug, Default)]
pub(crate) struct PatternCache {
    by_source: HashMap<String, Arc<CompiledPattern>>,
}

impl PatternCache {
    fn intern(&mut self, source: String) -> Result<Arc<CompiledPattern>> {
        if let Some(existing) = self.by_source.get(&source) {
            return Ok(Arc::clone(existing));
        }
        let pattern = Arc::new(CompiledPattern {
            id: self.by_source.len(),
            regex: Regex::new(&source)?,
            source: source.clone(),
        });
        self.by_source.insert(source, Arc::clone(&pattern));
        Ok(pattern)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.by_source.len()
    }
}

/// A conjunction of patterns that together imply a query occurs.
#[derive(Debug, Clone)]
pub struct Condition(Vec<Arc<CompiledPattern>>);

impl Condition {
    pub fn patterns(&self) -> &[Arc<CompiledPattern>] {
        &self.0
    }
}

/// An ordered list of alternative conditions for one query.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    name: String,
    conditions: Vec<Condition>,
}

impl CompiledQuery {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Compiles queries and vends matchers over them.
///
/// Queries are added up front; matchers share the compiled set. Once a
/// pooled matcher has been vended the query set is frozen, because workers
/// hold a snapshot that must not drift from what matchers advertise.
#[derive(Debug, Default)]
pub struct QueryCompiler {
    queries: Vec<CompiledQuery>,
    names: HashSet<String>,
    cache: PatternCache,
    pool: Option<Arc<WorkerPool>>,
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a query. Duplicates are ignored with a warning.
    ///
    /// Fails with [`Error::QueriesFrozen`] once a pooled matcher exists.
    pub fn add_query(&mut self, query: &str) -> Result<()> {
        if self.pool.is_some() {
            return Err(Error::QueriesFrozen);
        }
        if self.names.contains(query) {
            tracing::warn!(query, "duplicate query ignored");
            return Ok(());
        }
        let compiled = compile_query(&mut self.cache, query)?;
        self.names.insert(query.to_string());
        self.queries.push(compiled);
        Ok(())
    }

    /// Registered queries, in insertion order.
    pub fn queries(&self) -> &[CompiledQuery] {
        &self.queries
    }

    /// Vend a synchronous matcher borrowing this compiler's query set.
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.queries)
    }

    /// Vend a matcher whose scans run on the worker pool.
    ///
    /// The pool is created on first call with `max_workers` as its worker
    /// ceiling and a snapshot of the compiled queries; later calls reuse it
    /// (their `max_workers` is ignored).
    pub fn pooled_matcher(&mut self, max_workers: NonZeroUsize) -> PooledMatcher {
        let pool = match &self.pool {
            Some(pool) => Arc::clone(pool),
            None => {
                let snapshot: Arc<[CompiledQuery]> = self.queries.clone().into();
                let pool = Arc::new(WorkerPool::new(snapshot, max_workers.get()));
                self.pool = Some(Arc::clone(&pool));
                pool
            }
        };
        PooledMatcher::new(pool)
    }

    /// Tear down the worker pool, if one was created. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}

/// Compile one dotted query into its conditions.
fn compile_query(cache: &mut PatternCache, query: &str) -> Result<CompiledQuery> {
    let parts: Vec<&str> = query.split('.').collect();
    let n = parts.len();
    let has_root = matches!(parts[0], "browser" | "chrome");

    let mut conditions = Vec::new();

    // Literal occurrence, always.
    conditions.push(Condition(vec![cache.intern(any(&body(&parts)))?]));

    // First part aliased: an assignment-looking `chrome.p1` plus a
    // dereference of the remainder off any alias. Skipped for queries that
    // name the root themselves: `alias = chrome.browser; alias.api` must
    // not satisfy `browser.api`.
    if n >= 2 && !has_root {
        conditions.push(Condition(vec![
            cache.intern(rhs(&format!("{}{}", host_dot(), body(&parts[..1]))))?,
            cache.intern(dot(&body(&parts[1..])))?,
        ]));
    }

    // First two / first three parts aliased. Nothing deeper is emitted.
    if n >= 3 {
        conditions.push(Condition(vec![
            cache.intern(rhs(&body(&parts[..2])))?,
            cache.intern(dot(&body(&parts[2..])))?,
        ]));
    }
    if n >= 4 {
        conditions.push(Condition(vec![
            cache.intern(rhs(&body(&parts[..3])))?,
            cache.intern(dot(&body(&parts[3..])))?,
        ]));
    }

    Ok(CompiledQuery {
        name: query.to_string(),
        conditions,
    })
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
