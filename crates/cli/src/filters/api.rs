//! The api filter: extensions referencing any of the given APIs.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::error::Result;
use crate::extension::ExtensionInput;
use crate::query::QueryCompiler;

use super::{Filter, PendingMatch, Verdict};

/// Filters extensions by referenced extension-platform APIs.
///
/// Each line gets a fresh pooled matcher fed with the extension's scripts;
/// the verdict resolves when a worker finishes the scan, so filter work
/// for later lines runs ahead of emission.
pub struct ApiFilter {
    compiler: Mutex<QueryCompiler>,
    pool_size: NonZeroUsize,
}

impl ApiFilter {
    pub fn new(queries: &[String], pool_size: NonZeroUsize) -> Result<Self> {
        let mut compiler = QueryCompiler::new();
        for query in queries {
            compiler.add_query(query)?;
        }
        Ok(Self {
            compiler: Mutex::new(compiler),
            pool_size,
        })
    }

    /// Tear down the worker pool.
    pub fn shutdown(&self) {
        if let Ok(mut compiler) = self.compiler.lock() {
            compiler.shutdown();
        }
    }
}

impl Filter for ApiFilter {
    fn name(&self) -> &'static str {
        "api"
    }

    fn apply(&self, ext: &ExtensionInput) -> Result<Verdict> {
        let sources = ext.scripts()?;
        let mut matcher = match self.compiler.lock() {
            Ok(mut compiler) => compiler.pooled_matcher(self.pool_size),
            Err(poisoned) => poisoned.into_inner().pooled_matcher(self.pool_size),
        };
        for source in &sources {
            matcher.add_source(source);
        }
        let ticket = matcher.find_matches();
        Ok(Verdict::Pending(PendingMatch::new(matcher, ticket)))
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
