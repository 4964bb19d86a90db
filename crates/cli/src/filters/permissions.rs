//! The permissions filter: manifest permission membership.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::extension::ExtensionInput;

use super::{Filter, Verdict};

/// Keeps extensions whose manifest requests any of the wanted permissions,
/// across `permissions`, `optional_permissions`, and `host_permissions`.
pub struct PermissionsFilter {
    wanted: BTreeSet<String>,
}

impl PermissionsFilter {
    pub fn new(wanted: &[String]) -> Self {
        Self {
            wanted: wanted.iter().cloned().collect(),
        }
    }
}

impl Filter for PermissionsFilter {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn apply(&self, ext: &ExtensionInput) -> Result<Verdict> {
        let granted = ext.manifest()?.permissions();
        let hit = self.wanted.iter().any(|p| granted.contains(p));
        Ok(if hit { Verdict::Keep } else { Verdict::Drop })
    }
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
