//! Extension manifest loading.
//!
//! The manifest is kept as raw JSON: the permission filter needs the three
//! permission arrays and the manifest filter needs arbitrary dotted key
//! lookups, so a full typed model would only get in the way.

use std::collections::BTreeSet;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// A parsed `manifest.json`.
#[derive(Debug, Clone)]
pub struct Manifest {
    raw: Value,
}

impl Manifest {
    /// Load `manifest.json` from an extension root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("manifest.json");
        let bytes = std::fs::read(&path).map_err(|e| Error::Io {
            path: path.clone(),
            source: e,
        })?;
        // Some store manifests ship with a UTF-8 BOM.
        let text = String::from_utf8_lossy(&bytes);
        let raw: Value =
            serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| {
                Error::Manifest {
                    path,
                    message: e.to_string(),
                }
            })?;
        Ok(Self { raw })
    }

    #[cfg(test)]
    pub(crate) fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Union of `permissions`, `optional_permissions`, and
    /// `host_permissions` string entries.
    pub fn permissions(&self) -> BTreeSet<String> {
        let mut all = BTreeSet::new();
        for key in ["permissions", "optional_permissions", "host_permissions"] {
            if let Some(Value::Array(entries)) = self.raw.get(key) {
                all.extend(
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string),
                );
            }
        }
        all
    }

    /// Whether a dotted key path (e.g. `background.service_worker`) is
    /// present in the manifest object tree. Only objects are traversed.
    pub fn has_key(&self, dotted: &str) -> bool {
        let mut node = &self.raw;
        for part in dotted.split('.') {
            match node.get(part) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
