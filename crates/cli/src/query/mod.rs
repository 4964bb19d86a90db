// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The API query engine.
//!
//! Compiles dotted API names (`tabs.create`, `storage.local.get`) into
//! conditions of lexical patterns, and matches them against piles of
//! script sources — directly via [`Matcher`], or on a worker pool via
//! [`PooledMatcher`].

mod compiler;
mod fragments;
mod matcher;
mod pool;
mod pooled;

pub use compiler::{CompiledPattern, CompiledQuery, Condition, QueryCompiler};
pub use matcher::Matcher;
pub use pool::WorkerPool;
pub use pooled::{MatchTicket, PooledMatcher};
