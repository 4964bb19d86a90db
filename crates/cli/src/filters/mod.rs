// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Filter flavors over extension inputs.
//!
//! A filter decides, per input line, whether the extension passes. The
//! shallow filters (permissions, manifest, user-count) decide immediately;
//! the api filter hands its work to the engine's worker pool and decides
//! when the scan resolves.

mod api;
mod manifest_keys;
mod permissions;
mod user_count;

pub use api::ApiFilter;
pub use manifest_keys::ManifestFilter;
pub use permissions::PermissionsFilter;
pub use user_count::UserCountFilter;

use crate::error::Result;
use crate::extension::ExtensionInput;
use crate::query::{MatchTicket, PooledMatcher};

/// A filter's per-line decision.
#[derive(Debug)]
pub enum Verdict {
    Keep,
    Drop,
    /// Decision pending on a worker-pool scan.
    Pending(PendingMatch),
}

/// An api-filter scan in flight.
#[derive(Debug)]
pub struct PendingMatch {
    matcher: PooledMatcher,
    ticket: Option<MatchTicket>,
}

impl PendingMatch {
    pub(crate) fn new(matcher: PooledMatcher, ticket: MatchTicket) -> Self {
        Self {
            matcher,
            ticket: Some(ticket),
        }
    }

    fn keep(&self) -> Result<bool> {
        Ok(!self.matcher.matched_results()?.is_empty())
    }

    /// Block until the scan resolves; `true` means keep the line.
    pub fn resolve(mut self) -> Result<bool> {
        match self.ticket.take() {
            Some(ticket) => {
                ticket.wait()?;
                self.keep()
            }
            None => self.keep(),
        }
    }

    /// Non-blocking check: `Some` once the scan has resolved.
    pub fn poll(&mut self) -> Option<Result<bool>> {
        let ticket = self.ticket.take()?;
        match ticket.try_wait() {
            Ok(Ok(())) => Some(self.keep()),
            Ok(Err(err)) => Some(Err(err)),
            Err(unresolved) => {
                self.ticket = Some(unresolved);
                None
            }
        }
    }
}

/// One filter flavor.
///
/// Object-safe so the driver can hold whichever flavor the CLI selected.
pub trait Filter: Send + Sync {
    /// Flavor name as spelled on the command line.
    fn name(&self) -> &'static str;

    /// Decide one input line.
    ///
    /// Per-line failures (unresolvable root, bad manifest) are returned as
    /// errors; the driver logs them and filters the line.
    fn apply(&self, ext: &ExtensionInput) -> Result<Verdict>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
