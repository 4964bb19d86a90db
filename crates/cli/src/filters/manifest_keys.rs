//! The manifest filter: dotted key presence.

use crate::error::Result;
use crate::extension::ExtensionInput;

use super::{Filter, Verdict};

/// Keeps extensions whose manifest contains every requested dotted key
/// path (e.g. `background.service_worker`).
pub struct ManifestFilter {
    keys: Vec<String>,
}

impl ManifestFilter {
    pub fn new(keys: &[String]) -> Self {
        Self {
            keys: keys.to_vec(),
        }
    }
}

impl Filter for ManifestFilter {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn apply(&self, ext: &ExtensionInput) -> Result<Verdict> {
        let manifest = ext.manifest()?;
        let hit = self.keys.iter().all(|key| manifest.has_key(key));
        Ok(if hit { Verdict::Keep } else { Verdict::Drop })
    }
}

#[cfg(test)]
#[path = "manifest_keys_tests.rs"]
mod tests;
