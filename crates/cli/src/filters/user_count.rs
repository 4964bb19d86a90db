//! The user-count filter: AMO average daily users threshold.

use crate::error::{Error, Result};
use crate::extension::ExtensionInput;

use super::{Filter, Verdict};

/// Keeps extensions whose AMO record reports at least `min_users` average
/// daily users. The filter refuses to start without metadata (see the CLI
/// layer); lines without a record fall under the driver's missing-addon
/// rules.
pub struct UserCountFilter {
    min_users: u64,
}

impl UserCountFilter {
    pub fn new(min_users: u64) -> Self {
        Self { min_users }
    }
}

impl Filter for UserCountFilter {
    fn name(&self) -> &'static str {
        "user-count"
    }

    fn apply(&self, ext: &ExtensionInput) -> Result<Verdict> {
        let record = ext.record().ok_or_else(|| Error::UnknownAddon {
            line: ext.line().to_string(),
        })?;
        Ok(if record.average_daily_users >= self.min_users {
            Verdict::Keep
        } else {
            Verdict::Drop
        })
    }
}

#[cfg(test)]
#[path = "user_count_tests.rs"]
mod tests;
