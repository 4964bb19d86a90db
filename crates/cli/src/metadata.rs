//! AMO metadata loading.
//!
//! `AMO_METADATA_JSON` points at a dump of addon records used to resolve
//! id-shaped input lines to corpus directories and to answer the
//! user-count filter. The dump is a JSON array; records are indexed by
//! numeric id, guid, and slug.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable naming the metadata dump.
pub const METADATA_ENV: &str = "AMO_METADATA_JSON";

/// One addon record from the AMO dump.
#[derive(Debug, Clone, Deserialize)]
pub struct AddonRecord {
    pub id: u64,
    pub guid: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub average_daily_users: u64,
    /// Corpus directory of the addon, relative to the corpus root.
    #[serde(default)]
    pub path: Option<String>,
}

/// Indexed AMO metadata.
#[derive(Debug, Default)]
pub struct AmoMetadata {
    by_key: HashMap<String, Arc<AddonRecord>>,
}

/// Remediation instructions embedded in fatal metadata errors.
fn remediation(env_value: Option<&str>) -> String {
    let target = env_value.unwrap_or("amo-metadata.json");
    format!(
        "fetch a fresh dump and point {METADATA_ENV} at it, e.g.:\n  \
         curl -sSL 'https://addons.mozilla.org/api/v5/addons/search/?app=firefox&sort=users&format=json' -o '{target}'"
    )
}

impl AmoMetadata {
    /// Load and index a metadata dump.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::Metadata {
            message: format!("cannot read {}: {e}", path.display()),
            hint: remediation(path.to_str()),
        })?;
        let records: Vec<AddonRecord> =
            serde_json::from_slice(&bytes).map_err(|e| Error::Metadata {
                message: format!("cannot parse {}: {e}", path.display()),
                hint: remediation(path.to_str()),
            })?;
        Ok(Self::index(records))
    }

    /// Load from `AMO_METADATA_JSON`; `None` when the variable is unset.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var_os(METADATA_ENV) {
            Some(path) => Self::load(Path::new(&path)).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`from_env`](Self::from_env), but missing metadata is fatal.
    /// Used by the user-count filter, which cannot run without it.
    pub fn require_from_env() -> Result<Self> {
        Self::from_env()?.ok_or_else(|| Error::Metadata {
            message: format!("{METADATA_ENV} is not set"),
            hint: remediation(None),
        })
    }

    fn index(records: Vec<AddonRecord>) -> Self {
        let mut by_key = HashMap::with_capacity(records.len() * 3);
        for record in records {
            let record = Arc::new(record);
            by_key.insert(record.id.to_string(), Arc::clone(&record));
            by_key.insert(record.guid.clone(), Arc::clone(&record));
            if let Some(slug) = &record.slug {
                by_key.insert(slug.clone(), Arc::clone(&record));
            }
        }
        Self { by_key }
    }

    /// Look up a record by numeric id, guid, or slug.
    pub fn lookup(&self, key: &str) -> Option<Arc<AddonRecord>> {
        self.by_key.get(key).cloned()
    }
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
